//! Error type for rejected game transitions.

use mixtape_protocol::PlayerId;

/// Why a transition was refused. The state is untouched in every case.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A `playerMove` from a connection that does not hold the turn.
    #[error("It's not your turn.")]
    NotYourTurn,

    /// The played card names no entry in the mover's hand.
    #[error("card {0} is not in your hand")]
    CardNotInHand(String),

    /// A draw was requested but no cards were ever contributed.
    #[error("the room has no cards to draw from")]
    EmptyPool,

    /// The acting connection has no hand in this game.
    #[error("player {0} has no hand in this game")]
    UnknownPlayer(PlayerId),

    /// The game already has a winner; state is terminal.
    #[error("the game is already over")]
    GameOver,

    /// A start was requested for a room with no members.
    #[error("cannot start a game without players")]
    NoMembers,
}
