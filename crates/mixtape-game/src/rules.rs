//! The turn-based rules: seeding, dealing, drawing, playing, win detection.

use mixtape_protocol::{Card, GameState, PlayerId};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::GameError;

/// Cards dealt to each member at game start.
pub const HAND_SIZE: usize = 3;

/// What an accepted `playerMove` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The mover's hand emptied; the game is over and the turn stops.
    Won(PlayerId),
    /// Play continues; the turn passed to the next member in join order.
    TurnAdvanced,
}

/// Records a joining member's cards: the hand slot is filled with the
/// contributed cards and the shared pool grows by the same cards.
pub fn seed_hand(state: &mut GameState, player: &PlayerId, cards: Vec<Card>) {
    state.all_cards.extend(cards.iter().cloned());
    state.player_cards_data.insert(player.clone(), cards);
}

/// Transitions pending → active: picks the first member as current player,
/// draws the initial top card, and deals every member a fresh hand.
///
/// Each member's hand is an independent sample of the shared pool — a copy
/// of `allCards` is shuffled per member and cut to [`HAND_SIZE`], so the
/// same card can land in two hands at once. The pool itself is never
/// consumed.
pub fn start(
    state: &mut GameState,
    members: &[PlayerId],
    rng: &mut impl Rng,
) -> Result<(), GameError> {
    let first = members.first().ok_or(GameError::NoMembers)?;
    if state.all_cards.is_empty() {
        return Err(GameError::EmptyPool);
    }

    state.current_player = Some(first.clone());
    state.top_card = state.all_cards.choose(rng).cloned();

    for member in members {
        let mut deal = state.all_cards.clone();
        deal.shuffle(rng);
        deal.truncate(HAND_SIZE);
        state.player_cards_data.insert(member.clone(), deal);
    }
    Ok(())
}

/// Draws one card uniformly from the shared pool into the acting member's
/// hand and passes the turn.
///
/// Deliberately not gated on turn ownership: any member may draw at any
/// time, but the draw still advances the turn pointer.
pub fn pull_card(
    state: &mut GameState,
    player: &PlayerId,
    members: &[PlayerId],
    rng: &mut impl Rng,
) -> Result<(), GameError> {
    if state.winner.is_some() {
        return Err(GameError::GameOver);
    }
    let card = state
        .all_cards
        .choose(rng)
        .cloned()
        .ok_or(GameError::EmptyPool)?;
    let hand = state
        .player_cards_data
        .get_mut(player)
        .ok_or_else(|| GameError::UnknownPlayer(player.clone()))?;
    hand.push(card);
    advance_turn(state, members);
    Ok(())
}

/// Plays `card` from the acting member's hand onto the table.
///
/// Rejected without mutation when the mover does not hold the turn or when
/// no hand entry matches the card's id. On success exactly one matching
/// occurrence leaves the hand, the card becomes the top card, and either a
/// winner is declared (empty hand) or the turn advances.
pub fn play_card(
    state: &mut GameState,
    player: &PlayerId,
    card: Card,
    members: &[PlayerId],
) -> Result<MoveOutcome, GameError> {
    if state.winner.is_some() {
        return Err(GameError::GameOver);
    }
    if state.current_player.as_ref() != Some(player) {
        return Err(GameError::NotYourTurn);
    }
    let hand = state
        .player_cards_data
        .get_mut(player)
        .ok_or_else(|| GameError::UnknownPlayer(player.clone()))?;
    let pos = hand
        .iter()
        .position(|c| c.id == card.id)
        .ok_or_else(|| GameError::CardNotInHand(card.id.clone()))?;
    hand.remove(pos);
    state.top_card = Some(card);

    if let Some(winner) = check_win(state, members) {
        state.winner = Some(winner.clone());
        return Ok(MoveOutcome::Won(winner));
    }
    advance_turn(state, members);
    Ok(MoveOutcome::TurnAdvanced)
}

/// Scans hands in member join order and returns the first empty one.
///
/// Under the one-removal-per-move rule at most one hand can empty per
/// move; the ordering only matters defensively.
pub fn check_win(state: &GameState, members: &[PlayerId]) -> Option<PlayerId> {
    members
        .iter()
        .find(|m| {
            state
                .player_cards_data
                .get(*m)
                .is_some_and(|hand| hand.is_empty())
        })
        .cloned()
}

/// Removes a departing member's hand; if they held the turn it passes to
/// the first remaining member.
pub fn remove_member(state: &mut GameState, player: &PlayerId, remaining: &[PlayerId]) {
    state.player_cards_data.remove(player);
    if state.current_player.as_ref() == Some(player) {
        state.current_player = remaining.first().cloned();
    }
}

/// Whether the game has reached its terminal state.
pub fn is_finished(state: &GameState) -> bool {
    state.winner.is_some()
}

/// Round-robin over the member list as it is *now*; if the current player
/// is no longer listed the turn falls back to the first member.
fn advance_turn(state: &mut GameState, members: &[PlayerId]) {
    let Some(next) = (match state
        .current_player
        .as_ref()
        .and_then(|cur| members.iter().position(|m| m == cur))
    {
        Some(idx) => members.get((idx + 1) % members.len()),
        None => members.first(),
    }) else {
        state.current_player = None;
        return;
    };
    state.current_player = Some(next.clone());
}
