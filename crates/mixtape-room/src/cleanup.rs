//! Cancellable deferred destruction of non-viable rooms.
//!
//! A room becomes non-viable when a game is won or membership drops below
//! two. Rather than destroying it immediately, callers schedule a timer
//! here; if the room recovers (a new member joins) before the timer fires,
//! the timer is cancelled and the room lives on. When a timer does fire,
//! the room is removed from the registry and its actor broadcasts
//! `roomClosed` on the way out.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use mixtape_protocol::RoomId;
use tokio::task::JoinHandle;

use crate::RoomRegistry;

/// How long a non-viable room lingers before destruction.
pub const DEFAULT_CLEANUP_DELAY: Duration = Duration::from_secs(30);

/// Owns the pending destruction timers, keyed by room id.
pub struct CleanupScheduler {
    registry: Arc<RoomRegistry>,
    delay: Duration,
    pending: DashMap<RoomId, JoinHandle<()>>,
}

impl CleanupScheduler {
    /// Scheduler with the standard 30-second delay.
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self::with_delay(registry, DEFAULT_CLEANUP_DELAY)
    }

    /// Scheduler with a caller-chosen delay (tests use short ones).
    pub fn with_delay(registry: Arc<RoomRegistry>, delay: Duration) -> Self {
        Self {
            registry,
            delay,
            pending: DashMap::new(),
        }
    }

    /// Schedules `room_id` for destruction after the configured delay.
    ///
    /// Re-scheduling replaces any timer already pending for the room, so
    /// the clock restarts from the latest non-viability event.
    pub fn schedule(self: &Arc<Self>, room_id: RoomId) {
        let scheduler = Arc::clone(self);
        let task_room = room_id.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(scheduler.delay).await;
            scheduler.pending.remove(&task_room);
            tracing::info!(room_id = %task_room, "cleanup timer fired");
            scheduler.registry.remove_room(&task_room).await;
        });

        tracing::debug!(%room_id, delay = ?self.delay, "cleanup scheduled");
        if let Some(previous) = self.pending.insert(room_id, task) {
            previous.abort();
        }
    }

    /// Cancels a pending timer, if any. Called when the room becomes
    /// viable again before destruction.
    pub fn cancel(&self, room_id: &RoomId) {
        if let Some((_, task)) = self.pending.remove(room_id) {
            task.abort();
            tracing::debug!(%room_id, "cleanup cancelled");
        }
    }

    /// Whether a destruction timer is currently pending for the room.
    pub fn is_scheduled(&self, room_id: &RoomId) -> bool {
        self.pending.contains_key(room_id)
    }
}
