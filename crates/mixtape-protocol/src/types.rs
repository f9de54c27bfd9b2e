//! Identity types, the card record, and the game-state snapshot.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a connected player.
///
/// Assigned by the gateway when the connection is accepted and announced to
/// the client in a `connected` message. Opaque to the game core — it is only
/// ever compared and used as a map key.
///
/// `#[serde(transparent)]` keeps the wire form a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Borrows the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A unique identifier for a room (one game session).
///
/// Short (6 characters) so players can read it out loud to each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Borrows the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A song card as supplied by the client at join time.
///
/// The core never interprets the musical fields; only `id` matters for
/// matching a played card against the mover's hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub genre: String,
    pub year: u32,
    /// Playtime in minutes.
    pub playtime: u32,
}

/// The authoritative, room-scoped game state.
///
/// Created empty when the room is created, populated incrementally as
/// members join and once fully at game start. Serialized in full as the
/// payload of `startGame` / `updateGameState` broadcasts, so field names
/// here are wire names.
///
/// `allCards` is a shared reservoir, not a depleting deck: draws never
/// remove from it, so the same card can be drawn repeatedly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Each member's hand, keyed by connection identifier. An empty hand
    /// means that member has won.
    pub player_cards_data: HashMap<PlayerId, Vec<Card>>,
    /// Union pool of every card contributed at join time.
    pub all_cards: Vec<Card>,
    /// The member whose turn it is; `None` before game start.
    pub current_player: Option<PlayerId>,
    /// The single card exposed at the center of the table.
    pub top_card: Option<Card>,
    /// Terminal once set; no further mutation is accepted.
    pub winner: Option<PlayerId>,
}

/// Who should receive an outbound message.
///
/// Room actors return `(Recipient, ServerMessage)` pairs and the dispatch
/// layer routes each one. Never serialized — routing is server-internal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every subscribed member of the room.
    All,
    /// One specific connection.
    Player(PlayerId),
    /// Everyone except the named connection.
    AllExcept(PlayerId),
}
