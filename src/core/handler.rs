//! Handler: one destination with its own floor and formatter

use super::error::Result;
use super::formatter::Formatter;
use super::log_event::LogEvent;
use super::log_level::LogLevel;
use crate::handlers::{ConsoleHandler, RemoteHandler, RotatingFileHandler};

/// The closed set of destinations a logger can fan out to
pub enum HandlerKind {
    Console(ConsoleHandler),
    File(RotatingFileHandler),
    Remote(RemoteHandler),
}

impl HandlerKind {
    pub fn name(&self) -> &'static str {
        match self {
            HandlerKind::Console(_) => "console",
            HandlerKind::File(_) => "file",
            HandlerKind::Remote(_) => "remote",
        }
    }
}

pub struct Handler {
    level: LogLevel,
    formatter: Formatter,
    kind: HandlerKind,
}

impl Handler {
    pub fn new(level: LogLevel, formatter: Formatter, kind: HandlerKind) -> Self {
        Self {
            level,
            formatter,
            kind,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn kind(&self) -> &HandlerKind {
        &self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Whether delivery leaves the process and may block on the network
    pub fn is_remote(&self) -> bool {
        matches!(self.kind, HandlerKind::Remote(_))
    }

    pub fn accepts(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    /// Render `event` for this destination and deliver it
    pub fn handle(&self, event: &LogEvent) -> Result<()> {
        match self.kind {
            HandlerKind::Console(ref console) => {
                let line = self.formatter.render(event)?;
                console.write_line(&line)
            }
            HandlerKind::File(ref file) => {
                let line = self.formatter.render(event)?;
                file.write(event.timestamp.date_naive(), &line)
            }
            HandlerKind::Remote(ref remote) => remote.deliver(event, &self.formatter),
        }
    }

    pub fn flush(&self) -> Result<()> {
        match self.kind {
            HandlerKind::Console(ref console) => console.flush(),
            HandlerKind::File(ref file) => file.flush(),
            HandlerKind::Remote(_) => Ok(()),
        }
    }
}
