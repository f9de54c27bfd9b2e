//! The Mixtape match server.
//!
//! Ties the layers together: the websocket Session Gateway ([`gateway`]),
//! the short-lived HTTP room endpoints ([`http`]), env-driven
//! configuration ([`config`]), and tracing setup ([`telemetry`]). The
//! `mixtape-server` binary wires these up; tests drive them directly on
//! ephemeral ports.

pub mod config;
pub mod gateway;
pub mod http;
pub mod telemetry;
