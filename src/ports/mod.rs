//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the messaging transport. Adapters implement these ports.
//!
//! - `EventSource` - Inbound challenge and move commands
//! - `Notifier` - Outbound rendered notifications to channels and participants

mod event_source;
mod notifier;

pub use event_source::{EventSource, EventSourceError, InboundEvent};
pub use notifier::{NotificationKind, NotificationParams, Notifier, NotifierError};
