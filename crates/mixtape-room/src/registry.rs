//! Process-wide registry mapping room ids to running room actors.
//!
//! Constructed once at startup and shared behind an `Arc`; no ambient
//! globals. The map is a `DashMap`, so lookups from the gateway, the HTTP
//! endpoints, and cleanup timers never contend on a single lock.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mixtape_protocol::{PlayerId, RoomId};
use rand::Rng;
use rand::distr::Alphanumeric;

use crate::room::{RoomHandle, RoomSnapshot, spawn_room};
use crate::RoomError;

/// Length of generated room identifiers.
const ROOM_ID_LEN: usize = 6;

/// Command channel size for room actors.
const CHANNEL_SIZE: usize = 64;

/// Owns every live room in the process.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomHandle>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    /// Creates a room owned by `owner` and returns its fresh id.
    ///
    /// Ids are short random strings; a collision with a live room just
    /// regenerates. Must be called from within a Tokio runtime (spawns the
    /// room's actor task).
    pub fn create_room(&self, owner: PlayerId) -> RoomId {
        loop {
            let id = new_room_id();
            match self.rooms.entry(id.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    let handle = spawn_room(id.clone(), owner.clone(), CHANNEL_SIZE);
                    slot.insert(handle);
                    tracing::info!(room_id = %id, %owner, "room created");
                    return id;
                }
            }
        }
    }

    /// Appends `player` to an existing room's membership.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        let handle = self
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        handle.add_member(player).await
    }

    /// Pure lookup; callers treat `None` as a hard stop.
    pub fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms.get(room_id).map(|entry| entry.value().clone())
    }

    /// Deletes the room and shuts its actor down. Idempotent — a missing
    /// id is a no-op.
    pub async fn remove_room(&self, room_id: &RoomId) {
        if let Some((_, handle)) = self.rooms.remove(room_id) {
            let _ = handle.shutdown().await;
            tracing::info!(%room_id, "room destroyed");
        }
    }

    /// Cloned handles to every live room (the disconnect sweep walks
    /// these without holding any map guard across awaits).
    pub fn handles(&self) -> Vec<RoomHandle> {
        self.rooms.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

/// Short random room id, lowercase so it reads well in a URL.
fn new_room_id() -> RoomId {
    let id: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ROOM_ID_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    RoomId(id)
}
