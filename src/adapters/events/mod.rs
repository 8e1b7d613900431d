//! Event source adapters.
//!
//! - `ChannelEventSource` - mpsc-fed source for tests and embedding
//! - `ConsoleEventSource` - line commands from stdin or any async reader

mod console;
mod in_memory;

pub use console::{parse_command, ConsoleEventSource};
pub use in_memory::ChannelEventSource;
