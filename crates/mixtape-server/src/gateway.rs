//! The Session Gateway: the boundary between the websocket transport and
//! the game logic.
//!
//! Each accepted connection gets its own Tokio task. The flow is:
//!   1. Accept the websocket, assign a fresh connection id
//!   2. Announce the id to the client (`connected`)
//!   3. Loop: decode inbound frames → dispatch to room actors
//!   4. On close, defensively sweep the connection out of every room
//!
//! Outbound traffic flows through one unbounded channel per connection; a
//! dedicated writer task owns the socket sink, so room actors can fan out
//! broadcasts without ever blocking on the network.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use mixtape_protocol::{ClientMessage, PlayerId, ServerMessage};
use mixtape_room::{CleanupScheduler, PlayerSender, RoomRegistry};
use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};

/// Length of generated connection identifiers.
const PLAYER_ID_LEN: usize = 16;

/// Accepts connections and dispatches every inbound message to the room
/// layer. Holds the registry and the cleanup scheduler — the only two
/// pieces of process-wide state.
pub struct Gateway {
    registry: Arc<RoomRegistry>,
    cleanup: Arc<CleanupScheduler>,
}

impl Gateway {
    pub fn new(registry: Arc<RoomRegistry>, cleanup: Arc<CleanupScheduler>) -> Self {
        Self { registry, cleanup }
    }

    /// Runs the accept loop. One handler task per connection; a failed
    /// accept is logged and the loop keeps serving.
    pub async fn run(self: Arc<Self>, listener: TcpListener) -> std::io::Result<()> {
        tracing::info!(addr = %listener.local_addr()?, "gateway listening");

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    let gateway = Arc::clone(&self);
                    tokio::spawn(async move {
                        if let Err(e) = gateway.handle_connection(stream).await {
                            tracing::debug!(%addr, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }

    /// Handles a single connection from accept to close.
    async fn handle_connection(
        self: Arc<Self>,
        stream: TcpStream,
    ) -> Result<(), tungstenite::Error> {
        let ws = tokio_tungstenite::accept_async(stream).await?;
        let player = new_player_id();
        tracing::debug!(%player, "connection accepted");

        let (mut write, mut read) = ws.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

        // Writer task: owns the sink, drains the outbound channel. Ends
        // when every sender (ours and any room actor's) is gone.
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                let text = match serde_json::to_string(&msg) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to encode outbound message");
                        continue;
                    }
                };
                if write.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        });

        let _ = tx.send(ServerMessage::Connected {
            player_id: player.clone(),
        });

        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    self.handle_frame(&player, &tx, text.as_bytes()).await;
                }
                Ok(Message::Binary(data)) => {
                    self.handle_frame(&player, &tx, &data).await;
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {} // ping/pong are handled by tungstenite
                Err(e) => {
                    tracing::debug!(%player, error = %e, "recv error");
                    break;
                }
            }
        }

        tracing::debug!(%player, "connection closed");
        self.sweep_disconnect(&player).await;
        Ok(())
    }

    /// Decodes one inbound frame. Malformed payloads are logged and
    /// dropped — never fatal to the connection or other rooms.
    async fn handle_frame(&self, player: &PlayerId, tx: &PlayerSender, raw: &[u8]) {
        match serde_json::from_slice::<ClientMessage>(raw) {
            Ok(msg) => self.dispatch(player, tx, msg).await,
            Err(e) => {
                tracing::debug!(%player, error = %e, "dropping malformed message");
            }
        }
    }

    async fn dispatch(&self, player: &PlayerId, tx: &PlayerSender, msg: ClientMessage) {
        match msg {
            ClientMessage::JoinRoom {
                room_id,
                cards,
                connection_id,
            } => {
                let Some(handle) = self.registry.get(&room_id) else {
                    room_not_found(tx);
                    return;
                };
                if handle
                    .subscribe(connection_id, cards, tx.clone())
                    .await
                    .is_err()
                {
                    room_not_found(tx);
                }
            }

            ClientMessage::GetRoomInfo { room_id } => {
                let Some(handle) = self.registry.get(&room_id) else {
                    room_not_found(tx);
                    return;
                };
                match handle.info().await {
                    Ok(snapshot) => {
                        let _ = tx.send(ServerMessage::RoomInfo {
                            room_players: snapshot.members,
                            room_owner: snapshot.owner,
                        });
                    }
                    Err(_) => room_not_found(tx),
                }
            }

            ClientMessage::GameStart { room_id } => {
                // The catalog carries no connectionId here: the caller is
                // the connection itself, and the actor enforces that only
                // the owner may start.
                let Some(handle) = self.registry.get(&room_id) else {
                    room_not_found(tx);
                    return;
                };
                let _ = handle.start(player.clone()).await;
            }

            ClientMessage::PullCard {
                room_id,
                connection_id,
            } => {
                let Some(handle) = self.registry.get(&room_id) else {
                    room_not_found(tx);
                    return;
                };
                let _ = handle.pull_card(connection_id).await;
            }

            ClientMessage::PlayerMove {
                room_id,
                connection_id,
                selected_player_card,
            } => {
                let Some(handle) = self.registry.get(&room_id) else {
                    room_not_found(tx);
                    return;
                };
                match handle
                    .player_move(connection_id, selected_player_card)
                    .await
                {
                    // A win makes the room non-viable: queue destruction.
                    Ok(true) => self.cleanup.schedule(room_id),
                    Ok(false) => {}
                    Err(_) => room_not_found(tx),
                }
            }

            ClientMessage::LeaveRoom {
                room_id,
                connection_id,
            } => {
                let Some(handle) = self.registry.get(&room_id) else {
                    room_not_found(tx);
                    return;
                };
                if let Ok(report) = handle.leave(connection_id).await {
                    if report.was_member && report.members_left < 2 {
                        self.cleanup.schedule(room_id);
                    }
                }
            }
        }
    }

    /// Applies `leaveRoom` semantics across every room that still lists
    /// the connection. The gateway cannot assume the client sent
    /// `leaveRoom` before the transport dropped.
    async fn sweep_disconnect(&self, player: &PlayerId) {
        for handle in self.registry.handles() {
            match handle.leave(player.clone()).await {
                Ok(report) if report.was_member => {
                    tracing::debug!(
                        %player,
                        room_id = %handle.room_id(),
                        "swept disconnected player out of room"
                    );
                    if report.members_left < 2 {
                        self.cleanup.schedule(handle.room_id().clone());
                    }
                }
                _ => {}
            }
        }
    }
}

fn room_not_found(tx: &PlayerSender) {
    let _ = tx.send(ServerMessage::Error {
        reason: "Room not found".to_string(),
    });
}

/// Fresh opaque connection identifier.
fn new_player_id() -> PlayerId {
    let id: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(PLAYER_ID_LEN)
        .map(char::from)
        .collect();
    PlayerId(id)
}
