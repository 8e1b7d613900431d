//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `duel` - Moves, outcomes and the duel session aggregate

pub mod duel;
pub mod foundation;
