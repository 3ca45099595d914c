//! Room-scoped WebSocket chat relay.
//!
//! Clients connect over `/ws`, join a named room, and exchange chat
//! messages and typing indicators with the other occupants of that room.
//! Everyone in a room sees a live roster of who is present, and a durable
//! per-room message log lets late joiners fetch recent history over HTTP.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry point
pub use ui::run_server;
