//! Room lifecycle for the Mixtape match server.
//!
//! Each room runs as an isolated Tokio task (actor model) that exclusively
//! owns its membership list and [`GameState`](mixtape_protocol::GameState).
//! All mutation flows through the room's command channel, so operations on
//! one room are serialized without locks and rooms never contend with each
//! other.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates/destroys rooms, the process-wide id map
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`CleanupScheduler`] — cancellable deferred destruction of
//!   non-viable rooms
//! - [`RoomError`] — what can go wrong at this layer

mod cleanup;
mod error;
mod registry;
mod room;

pub use cleanup::{CleanupScheduler, DEFAULT_CLEANUP_DELAY};
pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{LeaveReport, PlayerSender, RoomHandle, RoomSnapshot};
