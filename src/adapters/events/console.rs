//! Line-oriented event source for playing duels from a terminal.
//!
//! # Commands
//!
//! ```text
//! start <channel> <challenger> [challengee]
//! move <participant> <text>
//! ```
//!
//! Participants get `@<id>` as their handle. Blank lines, `#` comments and
//! unrecognised commands are skipped with a warning.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::domain::duel::Participant;
use crate::domain::foundation::{ChannelId, ParticipantId, ValidationError};
use crate::ports::{EventSource, EventSourceError, InboundEvent};

/// Reads commands line by line from any async reader.
pub struct ConsoleEventSource<R> {
    lines: Lines<R>,
}

impl ConsoleEventSource<BufReader<Stdin>> {
    /// Source reading from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleEventSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for ConsoleEventSource<R> {
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, EventSourceError> {
        while let Some(line) = self.lines.next_line().await? {
            match parse_command(&line) {
                Ok(Some(event)) => return Ok(Some(event)),
                Ok(None) => continue,
                Err(reason) => tracing::warn!(line = %line.trim(), "Ignoring command: {}", reason),
            }
        }
        Ok(None)
    }
}

fn participant(id: &str) -> Result<Participant, ValidationError> {
    Participant::new(id, format!("@{}", id), id)
}

/// Parse one console line. `Ok(None)` means nothing to do.
pub fn parse_command(line: &str) -> Result<Option<InboundEvent>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    match (command.as_str(), args.as_slice()) {
        ("start", [channel, challenger, rest @ ..]) if rest.len() <= 1 => {
            let channel = ChannelId::new(*channel).map_err(|e| e.to_string())?;
            let challenger = participant(challenger).map_err(|e| e.to_string())?;
            let challengee = rest
                .first()
                .map(|id| participant(id))
                .transpose()
                .map_err(|e| e.to_string())?;
            Ok(Some(InboundEvent::Start {
                channel,
                challenger,
                challengee,
            }))
        }
        ("move", [who, text @ ..]) if !text.is_empty() => Ok(Some(InboundEvent::Move {
            participant_id: ParticipantId::new(*who).map_err(|e| e.to_string())?,
            raw_text: text.join(" "),
        })),
        ("start", _) => Err("usage: start <channel> <challenger> [challengee]".to_string()),
        ("move", _) => Err("usage: move <participant> <text>".to_string()),
        (other, _) => Err(format!("unknown command '{}'", other)),
    }
}
