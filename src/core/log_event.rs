//! Log event structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};

/// Where in the source an event was emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    /// `None` for events emitted outside any function
    pub function: Option<String>,
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            function: None,
            line,
        }
    }

    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Reduce a `std::any::type_name` path of an item inside a function to that function's
    /// bare name, skipping closure frames.
    pub fn function_from_type_name(path: &str) -> Option<&str> {
        path.rsplit("::")
            .find(|segment| !segment.is_empty() && *segment != "{{closure}}")
    }
}

/// One log call, constructed once and shared read-only with every handler
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub logger_name: String,
    pub pid: u32,
    pub location: Location,
    pub message: String,
    /// Error or backtrace text rendered below the formatted record
    pub error: Option<String>,
}

impl LogEvent {
    pub fn new(
        level: LogLevel,
        logger_name: impl Into<String>,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            logger_name: logger_name.into(),
            pid: std::process::id(),
            location,
            message: message.into(),
            error: None,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_from_type_name() {
        assert_eq!(
            Location::function_from_type_name("my_app::server::handle_request"),
            Some("handle_request")
        );
        assert_eq!(
            Location::function_from_type_name("my_app::main::{{closure}}::{{closure}}"),
            Some("main")
        );
        assert_eq!(Location::function_from_type_name("main"), Some("main"));
        assert_eq!(Location::function_from_type_name(""), None);
    }

    #[test]
    fn test_event_defaults_to_current_process() {
        let event = LogEvent::new(LogLevel::Info, "app", "hello", Location::new("src/main.rs", 3));
        assert_eq!(event.pid, std::process::id());
        assert!(event.error.is_none());
        assert_eq!(event.with_pid(7).pid, 7);
    }
}
