//! Pure state transitions for the Mixtape card match.
//!
//! This crate holds the rules and nothing else: every function takes the
//! current [`GameState`](mixtape_protocol::GameState), a command's worth of
//! input, and a caller-supplied rng, and mutates the state synchronously.
//! No transport, no tasks, no clocks — the room actor drives these
//! transitions and turns their outcomes into broadcasts, which keeps the
//! rules unit-testable with a seeded rng.

mod error;
mod rules;

pub use error::GameError;
pub use rules::{
    HAND_SIZE, MoveOutcome, check_win, is_finished, play_card, pull_card, remove_member,
    seed_hand, start,
};
