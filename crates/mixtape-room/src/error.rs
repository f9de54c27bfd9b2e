//! Error types for the room layer.

use mixtape_protocol::RoomId;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No live room is registered under this identifier.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room's command channel is closed — the actor is gone or
    /// shutting down.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
