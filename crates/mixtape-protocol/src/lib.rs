//! Wire protocol for the Mixtape match server.
//!
//! This crate defines everything that travels between a game client and the
//! server: identity types, the song-card record, the authoritative
//! [`GameState`] snapshot, and the tagged [`ClientMessage`] /
//! [`ServerMessage`] catalogs.
//!
//! Every message on the wire is a single JSON object with a `"type"` tag
//! naming the event and the payload fields inlined alongside it:
//!
//! ```text
//! { "type": "playerMove", "roomId": "k3x9p2", "connectionId": "...", ... }
//! ```
//!
//! The protocol layer knows nothing about connections or rooms — it only
//! fixes the shapes both sides agree on.

mod messages;
mod types;

pub use messages::{ClientMessage, ServerMessage};
pub use types::{Card, GameState, PlayerId, Recipient, RoomId};
