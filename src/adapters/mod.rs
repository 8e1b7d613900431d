//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to external systems:
//! - `events` - Inbound event sources (in-memory channel, console)
//! - `notifier` - Notification delivery (tracing log, recording)

pub mod events;
pub mod notifier;

pub use events::{ChannelEventSource, ConsoleEventSource};
pub use notifier::{RecordingNotifier, TracingNotifier};
