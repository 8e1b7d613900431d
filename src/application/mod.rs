//! Application layer - Registry, engine and background services.
//!
//! This layer orchestrates domain operations and coordinates between ports.

mod dispatcher;
mod engine;
mod registry;
mod sweeper;

pub use dispatcher::{DispatcherConfig, EventDispatcher};
pub use engine::{DuelEngine, Submission};
pub use registry::{EngagementPolicy, RecordedMove, SessionRegistry, StartedSession};
pub use sweeper::{SessionSweeper, SweeperConfig};
