//! Duel domain module.
//!
//! Move vocabulary, outcome resolution, participants and the session
//! aggregate that records moves until a duel resolves.

mod aggregate;
mod errors;
mod moves;
mod participant;

pub use aggregate::{Session, Verdict};
pub use errors::DuelError;
pub use moves::{resolve, Move, Outcome};
pub use participant::Participant;
