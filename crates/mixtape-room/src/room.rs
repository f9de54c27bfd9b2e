//! Room actor: an isolated Tokio task that owns one game session.
//!
//! The actor is the only code that touches a room's members, owner, started
//! flag, and game state. Everything else talks to it through a
//! [`RoomHandle`], which serializes operations over an mpsc channel —
//! one message is fully handled before the next is looked at.

use std::collections::HashMap;

use mixtape_game::{
    GameError, MoveOutcome, play_card, pull_card, remove_member, seed_hand, start,
};
use mixtape_protocol::{Card, GameState, PlayerId, Recipient, RoomId, ServerMessage};
use tokio::sync::{mpsc, oneshot};

use crate::RoomError;

/// Channel sender for delivering outbound messages to one connection.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Broadcast shown to a collapsing room before cleanup is scheduled.
const RESET_MESSAGE: &str = "Not enough players to continue";

/// A membership snapshot: what `joinRoom` / `getRoomInfo` callers see.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    /// Members in join order.
    pub members: Vec<PlayerId>,
    /// The creating connection; only the owner may start the game.
    pub owner: PlayerId,
    /// Whether `gameStart` has been accepted.
    pub started: bool,
    /// Set once a member has won; terminal.
    pub winner: Option<PlayerId>,
}

/// What a leave (or disconnect sweep) changed.
#[derive(Debug, Clone, Copy)]
pub struct LeaveReport {
    /// Whether the connection was actually a member of this room.
    pub was_member: bool,
    /// Members remaining after the removal.
    pub members_left: usize,
}

/// Commands sent to a room actor through its channel.
///
/// Variants with a `oneshot::Sender` are request/reply; the rest are
/// fire-and-forget — the actor answers the player over their subscribed
/// outbound channel instead.
pub(crate) enum RoomCommand {
    /// Append a member (HTTP join). Idempotent for repeat joins.
    AddMember {
        player: PlayerId,
        reply: oneshot::Sender<RoomSnapshot>,
    },

    /// Enter the broadcast group and seed the pool (ws `joinRoom`).
    Subscribe {
        player: PlayerId,
        cards: Vec<Card>,
        sender: PlayerSender,
    },

    /// Read-only membership snapshot.
    Info {
        reply: oneshot::Sender<RoomSnapshot>,
    },

    /// Deal hands and begin play. Only honored for the owner.
    Start { player: PlayerId },

    /// Draw one card from the pool.
    PullCard { player: PlayerId },

    /// Play a card. Replies `true` when the move produced a winner.
    PlayerMove {
        player: PlayerId,
        card: Card,
        reply: oneshot::Sender<bool>,
    },

    /// Remove a member and rebalance the turn.
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<LeaveReport>,
    },

    /// Broadcast `roomClosed` and stop the actor.
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's unique id.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Appends a member, returning the resulting membership snapshot.
    pub async fn add_member(&self, player: PlayerId) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::AddMember {
            player,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Joins the broadcast group, seeding the pool with `cards`.
    pub async fn subscribe(
        &self,
        player: PlayerId,
        cards: Vec<Card>,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Subscribe {
            player,
            cards,
            sender,
        })
        .await
    }

    /// Requests the current membership snapshot.
    pub async fn info(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Info { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Asks the room to start the game on behalf of `player`.
    pub async fn start(&self, player: PlayerId) -> Result<(), RoomError> {
        self.send(RoomCommand::Start { player }).await
    }

    /// Draws a card for `player`.
    pub async fn pull_card(&self, player: PlayerId) -> Result<(), RoomError> {
        self.send(RoomCommand::PullCard { player }).await
    }

    /// Plays a card for `player`. Returns `true` when the move won the
    /// game — the caller is expected to schedule cleanup.
    pub async fn player_move(&self, player: PlayerId, card: Card) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::PlayerMove {
            player,
            card,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Removes `player` from the room.
    pub async fn leave(&self, player: PlayerId) -> Result<LeaveReport, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Leave {
            player,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    owner: PlayerId,
    /// Join order; drives the turn rotation.
    members: Vec<PlayerId>,
    started: bool,
    game: GameState,
    /// Per-connection outbound channels for subscribed members.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::debug!(room_id = %self.room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::AddMember { player, reply } => {
                    self.handle_add_member(player);
                    let _ = reply.send(self.snapshot());
                }
                RoomCommand::Subscribe {
                    player,
                    cards,
                    sender,
                } => {
                    self.handle_subscribe(player, cards, sender);
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                RoomCommand::Start { player } => {
                    self.handle_start(player);
                }
                RoomCommand::PullCard { player } => {
                    self.handle_pull(player);
                }
                RoomCommand::PlayerMove {
                    player,
                    card,
                    reply,
                } => {
                    let won = self.handle_move(player, card);
                    let _ = reply.send(won);
                }
                RoomCommand::Leave { player, reply } => {
                    let report = self.handle_leave(player);
                    let _ = reply.send(report);
                }
                RoomCommand::Shutdown => {
                    self.dispatch(vec![(Recipient::All, ServerMessage::RoomClosed)]);
                    break;
                }
            }
        }

        tracing::debug!(room_id = %self.room_id, "room actor stopped");
    }

    fn handle_add_member(&mut self, player: PlayerId) {
        // Repeat joins are tolerated but do not duplicate the member —
        // a double entry would corrupt the turn rotation.
        if !self.members.contains(&player) {
            self.members.push(player.clone());
            tracing::info!(
                room_id = %self.room_id,
                %player,
                players = self.members.len(),
                "member joined"
            );
        }
    }

    fn handle_subscribe(&mut self, player: PlayerId, cards: Vec<Card>, sender: PlayerSender) {
        seed_hand(&mut self.game, &player, cards);
        self.senders.insert(player.clone(), sender);
        tracing::info!(
            room_id = %self.room_id,
            %player,
            pool = self.game.all_cards.len(),
            "player subscribed"
        );

        self.dispatch(vec![
            (
                Recipient::Player(player),
                ServerMessage::JoinedRoom {
                    room_players: self.members.clone(),
                    room_owner: self.owner.clone(),
                },
            ),
            (
                Recipient::All,
                ServerMessage::PlayerJoined {
                    room_players: self.members.clone(),
                    room_owner: self.owner.clone(),
                },
            ),
        ]);
    }

    fn handle_start(&mut self, player: PlayerId) {
        if player != self.owner {
            self.refuse(player, "only the room owner can start the game");
            return;
        }
        if self.started {
            self.refuse(player, "the game has already started");
            return;
        }

        match start(&mut self.game, &self.members, &mut rand::rng()) {
            Ok(()) => {
                self.started = true;
                tracing::info!(
                    room_id = %self.room_id,
                    players = self.members.len(),
                    "game started"
                );
                self.dispatch(vec![(
                    Recipient::All,
                    ServerMessage::StartGame {
                        game_state: self.game.clone(),
                    },
                )]);
            }
            Err(e) => self.refuse(player, &e.to_string()),
        }
    }

    fn handle_pull(&mut self, player: PlayerId) {
        match pull_card(&mut self.game, &player, &self.members, &mut rand::rng()) {
            Ok(()) => self.broadcast_state(),
            Err(e) => self.refuse(player, &e.to_string()),
        }
    }

    fn handle_move(&mut self, player: PlayerId, card: Card) -> bool {
        match play_card(&mut self.game, &player, card, &self.members) {
            Ok(MoveOutcome::Won(winner)) => {
                tracing::info!(room_id = %self.room_id, %winner, "game won");
                self.dispatch(vec![(
                    Recipient::All,
                    ServerMessage::GameWon {
                        winner,
                        player_cards_data: self.game.player_cards_data.clone(),
                    },
                )]);
                true
            }
            Ok(MoveOutcome::TurnAdvanced) => {
                self.broadcast_state();
                false
            }
            Err(e @ (GameError::NotYourTurn | GameError::CardNotInHand(_))) => {
                tracing::debug!(room_id = %self.room_id, %player, error = %e, "invalid move");
                self.dispatch(vec![(
                    Recipient::Player(player),
                    ServerMessage::InvalidMove {
                        reason: e.to_string(),
                    },
                )]);
                false
            }
            Err(e) => {
                self.refuse(player, &e.to_string());
                false
            }
        }
    }

    fn handle_leave(&mut self, player: PlayerId) -> LeaveReport {
        // Always drop the outbound channel first: the disconnect sweep
        // must purge subscribers that never completed membership.
        self.senders.remove(&player);

        let Some(pos) = self.members.iter().position(|m| *m == player) else {
            return LeaveReport {
                was_member: false,
                members_left: self.members.len(),
            };
        };
        self.members.remove(pos);

        if self.started && self.game.player_cards_data.contains_key(&player) {
            remove_member(&mut self.game, &player, &self.members);
        }

        tracing::info!(
            room_id = %self.room_id,
            %player,
            players = self.members.len(),
            "player left"
        );

        let mut out = vec![(
            Recipient::AllExcept(player.clone()),
            ServerMessage::PlayerLeft {
                room_players: self.members.clone(),
                left_player: player,
                game_state: self.game.clone(),
            },
        )];
        if self.members.len() < 2 {
            out.push((
                Recipient::All,
                ServerMessage::ResetGame {
                    message: RESET_MESSAGE.to_string(),
                },
            ));
        } else if self.started {
            out.push((
                Recipient::All,
                ServerMessage::UpdateGameState {
                    game_state: self.game.clone(),
                },
            ));
        }
        self.dispatch(out);

        LeaveReport {
            was_member: true,
            members_left: self.members.len(),
        }
    }

    /// Unicast an `error` reply to a single player.
    fn refuse(&self, player: PlayerId, reason: &str) {
        self.dispatch(vec![(
            Recipient::Player(player),
            ServerMessage::Error {
                reason: reason.to_string(),
            },
        )]);
    }

    fn broadcast_state(&self) {
        self.dispatch(vec![(
            Recipient::All,
            ServerMessage::UpdateGameState {
                game_state: self.game.clone(),
            },
        )]);
    }

    /// Dispatches outbound messages to the correct recipients.
    fn dispatch(&self, msgs: Vec<(Recipient, ServerMessage)>) {
        for (recipient, msg) in msgs {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(msg.clone());
                    }
                }
                Recipient::Player(pid) => {
                    if let Some(sender) = self.senders.get(&pid) {
                        let _ = sender.send(msg);
                    }
                }
                Recipient::AllExcept(excluded) => {
                    for (pid, sender) in &self.senders {
                        if *pid != excluded {
                            let _ = sender.send(msg.clone());
                        }
                    }
                }
            }
        }
    }

    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            members: self.members.clone(),
            owner: self.owner.clone(),
            started: self.started,
            winner: self.game.winner.clone(),
        }
    }
}

/// Spawns a new room actor with `owner` as its first member and returns a
/// handle to communicate with it.
pub(crate) fn spawn_room(room_id: RoomId, owner: PlayerId, channel_size: usize) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        room_id: room_id.clone(),
        owner: owner.clone(),
        members: vec![owner],
        started: false,
        game: GameState::default(),
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
