//! The message catalog: everything a client may send and everything the
//! server may emit.
//!
//! Both enums are internally tagged (`#[serde(tag = "type")]`) so each wire
//! message is a flat JSON object whose `"type"` field names the event. An
//! unknown tag or a missing payload field fails deserialization at the
//! boundary, before any game logic runs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Card, GameState, PlayerId, RoomId};

/// Client → server messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Enter a room's broadcast group and seed the shared pool with the
    /// joining member's cards.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: RoomId,
        cards: Vec<Card>,
        connection_id: PlayerId,
    },

    /// Request a one-off membership snapshot (reply goes to the requester
    /// only).
    #[serde(rename_all = "camelCase")]
    GetRoomInfo { room_id: RoomId },

    /// Deal hands and begin play. Only honored for the room owner.
    #[serde(rename_all = "camelCase")]
    GameStart { room_id: RoomId },

    /// Draw one card from the shared pool and pass the turn.
    #[serde(rename_all = "camelCase")]
    PullCard {
        room_id: RoomId,
        connection_id: PlayerId,
    },

    /// Play a card from the hand onto the center of the table.
    #[serde(rename_all = "camelCase")]
    PlayerMove {
        room_id: RoomId,
        connection_id: PlayerId,
        selected_player_card: Card,
    },

    /// Leave the room voluntarily.
    #[serde(rename_all = "camelCase")]
    LeaveRoom {
        room_id: RoomId,
        connection_id: PlayerId,
    },
}

/// Server → client messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent once when the connection is accepted; tells the client the
    /// identifier it must carry in subsequent payloads.
    #[serde(rename_all = "camelCase")]
    Connected { player_id: PlayerId },

    /// Reply to the joining connection only.
    #[serde(rename_all = "camelCase")]
    JoinedRoom {
        room_players: Vec<PlayerId>,
        room_owner: PlayerId,
    },

    /// Broadcast to the room whenever membership grows.
    #[serde(rename_all = "camelCase")]
    PlayerJoined {
        room_players: Vec<PlayerId>,
        room_owner: PlayerId,
    },

    /// Reply to a `getRoomInfo` request (requester only).
    #[serde(rename_all = "camelCase")]
    RoomInfo {
        room_players: Vec<PlayerId>,
        room_owner: PlayerId,
    },

    /// The game began; carries the freshly dealt state.
    #[serde(rename_all = "camelCase")]
    StartGame { game_state: GameState },

    /// The authoritative state after any accepted mutation.
    #[serde(rename_all = "camelCase")]
    UpdateGameState { game_state: GameState },

    /// A member emptied their hand.
    #[serde(rename_all = "camelCase")]
    GameWon {
        winner: PlayerId,
        player_cards_data: HashMap<PlayerId, Vec<Card>>,
    },

    /// A member left; sent to everyone still in the room.
    #[serde(rename_all = "camelCase")]
    PlayerLeft {
        room_players: Vec<PlayerId>,
        left_player: PlayerId,
        game_state: GameState,
    },

    /// The room dropped below the minimum player count.
    ResetGame { message: String },

    /// The room was destroyed by the cleanup scheduler.
    RoomClosed,

    /// A rejected `playerMove`; sent to the offender only.
    InvalidMove { reason: String },

    /// Any other per-message failure; sent to the offender only.
    Error { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> Card {
        Card {
            id: id.into(),
            name: "Kill Bill".into(),
            artist: "SZA".into(),
            genre: "R&B".into(),
            year: 2022,
            playtime: 4,
        }
    }

    #[test]
    fn join_room_wire_shape() {
        let msg = ClientMessage::JoinRoom {
            room_id: RoomId::from("k3x9p2"),
            cards: vec![card("1")],
            connection_id: PlayerId::from("p1"),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "joinRoom");
        assert_eq!(json["roomId"], "k3x9p2");
        assert_eq!(json["connectionId"], "p1");
        assert_eq!(json["cards"][0]["id"], "1");
    }

    #[test]
    fn player_move_wire_shape() {
        let msg = ClientMessage::PlayerMove {
            room_id: RoomId::from("k3x9p2"),
            connection_id: PlayerId::from("p1"),
            selected_player_card: card("3"),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "playerMove");
        assert_eq!(json["selectedPlayerCard"]["id"], "3");
    }

    #[test]
    fn client_message_round_trips() {
        let msgs = vec![
            ClientMessage::GetRoomInfo {
                room_id: RoomId::from("r"),
            },
            ClientMessage::GameStart {
                room_id: RoomId::from("r"),
            },
            ClientMessage::PullCard {
                room_id: RoomId::from("r"),
                connection_id: PlayerId::from("p"),
            },
            ClientMessage::LeaveRoom {
                room_id: RoomId::from("r"),
                connection_id: PlayerId::from("p"),
            },
        ];
        for msg in msgs {
            let bytes = serde_json::to_vec(&msg).unwrap();
            let back: ClientMessage = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(msg, back);
        }
    }

    #[test]
    fn server_tags_are_camel_case_event_names() {
        let cases: Vec<(ServerMessage, &str)> = vec![
            (
                ServerMessage::Connected {
                    player_id: PlayerId::from("p"),
                },
                "connected",
            ),
            (
                ServerMessage::StartGame {
                    game_state: GameState::default(),
                },
                "startGame",
            ),
            (
                ServerMessage::UpdateGameState {
                    game_state: GameState::default(),
                },
                "updateGameState",
            ),
            (
                ServerMessage::ResetGame {
                    message: "Not enough players to continue".into(),
                },
                "resetGame",
            ),
            (ServerMessage::RoomClosed, "roomClosed"),
            (
                ServerMessage::InvalidMove {
                    reason: "It's not your turn.".into(),
                },
                "invalidMove",
            ),
            (
                ServerMessage::Error {
                    reason: "Room not found".into(),
                },
                "error",
            ),
        ];
        for (msg, tag) in cases {
            let json = serde_json::to_value(&msg).unwrap();
            assert_eq!(json["type"], tag, "wrong tag for {msg:?}");
        }
    }

    #[test]
    fn game_won_carries_hands() {
        let mut hands = HashMap::new();
        hands.insert(PlayerId::from("p1"), vec![]);
        hands.insert(PlayerId::from("p2"), vec![card("2")]);
        let msg = ServerMessage::GameWon {
            winner: PlayerId::from("p1"),
            player_cards_data: hands,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "gameWon");
        assert_eq!(json["winner"], "p1");
        assert_eq!(json["playerCardsData"]["p2"][0]["id"], "2");
    }

    #[test]
    fn unknown_event_tag_is_rejected() {
        let raw = r#"{"type": "teleport", "roomId": "k3x9p2"}"#;
        let result: Result<ClientMessage, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn missing_payload_field_is_rejected() {
        // pullCard without a connectionId must fail at the boundary.
        let raw = r#"{"type": "pullCard", "roomId": "k3x9p2"}"#;
        let result: Result<ClientMessage, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }
}
