//! Duel Engine - Asynchronous rock-paper-scissors duels for chat workspaces
//!
//! Participants challenge each other in a channel, submit moves privately in
//! any order, and the engine announces the result once both have moved.
//! Transport specifics live behind the `EventSource` and `Notifier` ports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
