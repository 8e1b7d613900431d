//! Notifier adapters.
//!
//! - `TracingNotifier` - Logs notifications (local runs)
//! - `RecordingNotifier` - Captures notifications (tests)

mod logging;
mod recording;

pub use logging::TracingNotifier;
pub use recording::{Destination, RecordingNotifier, SentNotification};
