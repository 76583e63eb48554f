//! Main logger implementation

use super::{
    error::{LoggerError, Result},
    formatter::{
        validate_context, FormatOptions, Formatter, CONSOLE_DATE_FORMAT, FILE_DATE_FORMAT,
        REMOTE_DATE_FORMAT,
    },
    handler::{Handler, HandlerKind},
    log_event::{LogEvent, Location},
    log_level::LogLevel,
    metrics::DispatchMetrics,
    template::Template,
};
use crate::handlers::{
    ConsoleHandler, RemoteConfig, RemoteHandler, RetentionPolicy, RotatingFileHandler, Transport,
};
use serde::Deserialize;
use std::any::Any;
use std::fmt;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread;

/// Template used when the builder is not given one
pub const DEFAULT_FORMAT: &str = "{timestamp} | {level_prefix}| {name}[{pid}] - {message}";

/// Per-handler overrides; anything left `None` falls back to the logger or handler default
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HandlerOptions {
    pub format: Option<String>,
    pub level: Option<LogLevel>,
    pub date_format: Option<String>,
    pub colors: Option<bool>,
}

impl HandlerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = Some(date_format.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = Some(colors);
        self
    }
}

/// One handler that failed to take an event
#[derive(Debug)]
pub struct HandlerFailure {
    /// Position in registration order
    pub index: usize,
    pub handler: &'static str,
    pub error: LoggerError,
    pub panicked: bool,
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} handler #{}: {}", self.handler, self.index, self.error)
    }
}

pub struct Logger {
    name: String,
    level: LogLevel,
    format: Template,
    base_path: Option<PathBuf>,
    project_name: Option<String>,
    handlers: Vec<Handler>,
    metrics: DispatchMetrics,
}

impl Logger {
    /// Create a builder for a logger called `name`
    ///
    /// # Example
    /// ```
    /// use alert_logger::prelude::*;
    ///
    /// let mut logger = Logger::builder("app")
    ///     .level(LogLevel::Debug)
    ///     .format("{level_prefix}{message}")
    ///     .build()
    ///     .unwrap();
    /// logger.add_console(HandlerOptions::new()).unwrap();
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn format(&self) -> &Template {
        &self.format
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Console handler on stdout, colored, `%H:%M:%S` timestamps
    pub fn add_console(&mut self, options: HandlerOptions) -> Result<()> {
        self.add_console_handler(ConsoleHandler::new(), options)
    }

    /// Console handler writing to `writer` instead of stdout
    pub fn add_console_writer(
        &mut self,
        writer: impl Write + Send + 'static,
        options: HandlerOptions,
    ) -> Result<()> {
        self.add_console_handler(ConsoleHandler::with_writer(writer), options)
    }

    fn add_console_handler(
        &mut self,
        console: ConsoleHandler,
        options: HandlerOptions,
    ) -> Result<()> {
        let formatter = self.handler_formatter(&options, true, CONSOLE_DATE_FORMAT)?;
        self.push(&options, formatter, HandlerKind::Console(console));
        Ok(())
    }

    /// Day-rotated file handler writing `{dir}/{name}.log`, keeping 7 archives
    pub fn add_file(&mut self, dir: impl AsRef<Path>, options: HandlerOptions) -> Result<()> {
        self.add_file_with_retention(dir, RetentionPolicy::default(), options)
    }

    pub fn add_file_with_retention(
        &mut self,
        dir: impl AsRef<Path>,
        retention: RetentionPolicy,
        options: HandlerOptions,
    ) -> Result<()> {
        // validate the format before touching the filesystem
        let formatter = self.handler_formatter(&options, false, FILE_DATE_FORMAT)?;
        let file = RotatingFileHandler::with_retention(dir, &self.name, retention)?;
        self.push(&options, formatter, HandlerKind::File(file));
        Ok(())
    }

    /// Telegram alert handler using the reqwest transport
    pub fn add_remote(&mut self, config: RemoteConfig, options: HandlerOptions) -> Result<()> {
        let formatter = self.handler_formatter(&options, false, REMOTE_DATE_FORMAT)?;
        let remote = RemoteHandler::new(config)?;
        self.push(&options, formatter, HandlerKind::Remote(remote));
        Ok(())
    }

    pub fn add_remote_with_transport(
        &mut self,
        config: RemoteConfig,
        transport: Box<dyn Transport>,
        options: HandlerOptions,
    ) -> Result<()> {
        let formatter = self.handler_formatter(&options, false, REMOTE_DATE_FORMAT)?;
        let remote = RemoteHandler::with_transport(config, transport);
        self.push(&options, formatter, HandlerKind::Remote(remote));
        Ok(())
    }

    /// Register a fully built handler
    pub fn add_handler(&mut self, handler: Handler) {
        self.handlers.push(handler);
    }

    fn push(&mut self, options: &HandlerOptions, formatter: Formatter, kind: HandlerKind) {
        let level = options.level.unwrap_or(self.level);
        self.handlers.push(Handler::new(level, formatter, kind));
    }

    fn handler_formatter(
        &self,
        options: &HandlerOptions,
        default_colors: bool,
        default_date_format: &str,
    ) -> Result<Formatter> {
        let template = match options.format {
            Some(ref format) => Template::parse(format)?,
            None => self.format.clone(),
        };

        let format_options = FormatOptions::new()
            .with_colors(options.colors.unwrap_or(default_colors))
            .with_base_path(self.base_path.clone())
            .with_project_name(self.project_name.clone())
            .with_date_format(
                options
                    .date_format
                    .clone()
                    .unwrap_or_else(|| default_date_format.to_string()),
            );

        Formatter::new(template, format_options)
    }

    /// Emit one record to every handler whose floor it passes
    ///
    /// Handler failures never reach the caller; they are reported on stderr and counted in
    /// [`metrics`](Self::metrics). Use [`dispatch`](Self::dispatch) to inspect them.
    pub fn emit(&self, level: LogLevel, message: impl Into<String>, location: Location) {
        if level < self.level {
            self.metrics.record_filtered();
            return;
        }
        self.report(LogEvent::new(level, self.name.as_str(), message, location));
    }

    /// Emit a record with an error payload printed below it
    pub fn emit_error(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        error: impl fmt::Display,
        location: Location,
    ) {
        if level < self.level {
            self.metrics.record_filtered();
            return;
        }
        let event =
            LogEvent::new(level, self.name.as_str(), message, location).with_error(error.to_string());
        self.report(event);
    }

    fn report(&self, event: LogEvent) {
        for failure in self.dispatch(&event) {
            if failure.panicked {
                eprintln!(
                    "[LOGGER CRITICAL] {} handler #{} panicked: {}. \
                     Other handlers continue to function.",
                    failure.handler, failure.index, failure.error
                );
            } else {
                eprintln!(
                    "[LOGGER ERROR] {} handler #{} failed: {}",
                    failure.handler, failure.index, failure.error
                );
            }
        }
    }

    /// Hand `event` to each matching handler
    ///
    /// Console and file handlers run first, in registration order. Remote handlers run
    /// after them, each on its own scoped thread when there is more than one, so a slow
    /// network call never holds back a local write or another remote. Failures come back
    /// sorted by handler index.
    ///
    /// **Per-Handler Panic Isolation**: each handler runs inside its own `catch_unwind`, so
    /// an error or panic in one handler does not stop the others from receiving the event.
    pub fn dispatch(&self, event: &LogEvent) -> Vec<HandlerFailure> {
        let mut failures = Vec::new();
        if event.level < self.level {
            self.metrics.record_filtered();
            return failures;
        }

        let (remote, local): (Vec<_>, Vec<_>) = self
            .handlers
            .iter()
            .enumerate()
            .filter(|(_, handler)| handler.accepts(event.level))
            .partition(|(_, handler)| handler.is_remote());

        failures.extend(
            local
                .into_iter()
                .filter_map(|(index, handler)| self.run_handler(index, handler, event)),
        );

        match remote.as_slice() {
            [] => {}
            [(index, handler)] => failures.extend(self.run_handler(*index, handler, event)),
            _ => thread::scope(|scope| {
                let pending: Vec<_> = remote
                    .iter()
                    .map(|&(index, handler)| {
                        scope.spawn(move || self.run_handler(index, handler, event))
                    })
                    .collect();
                for ((index, handler), delivery) in remote.iter().zip(pending) {
                    // run_handler catches panics, so a join error is unexpected
                    let failure = delivery.join().unwrap_or_else(|payload| {
                        self.metrics.record_failed();
                        Some(HandlerFailure {
                            index: *index,
                            handler: handler.name(),
                            error: LoggerError::other(panic_message(payload.as_ref())),
                            panicked: true,
                        })
                    });
                    failures.extend(failure);
                }
            }),
        }

        failures.sort_by_key(|failure| failure.index);
        failures
    }

    fn run_handler(
        &self,
        index: usize,
        handler: &Handler,
        event: &LogEvent,
    ) -> Option<HandlerFailure> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(event)));
        let (error, panicked) = match result {
            Ok(Ok(())) => {
                self.metrics.record_delivered();
                return None;
            }
            Ok(Err(e)) => (e, false),
            Err(payload) => (LoggerError::other(panic_message(payload.as_ref())), true),
        };

        self.metrics.record_failed();
        Some(HandlerFailure {
            index,
            handler: handler.name(),
            error,
            panicked,
        })
    }

    /// Flush every handler, returning the first error after trying all of them
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for (index, handler) in self.handlers.iter().enumerate() {
            if let Err(e) = handler.flush() {
                eprintln!(
                    "[LOGGER ERROR] {} handler #{} flush failed: {}",
                    handler.name(),
                    index,
                    e
                );
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message, caller());
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message, caller());
    }

    #[inline]
    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warning, message, caller());
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message, caller());
    }

    #[inline]
    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.emit(LogLevel::Critical, message, caller());
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("format", &self.format.source())
            .field(
                "handlers",
                &self.handlers.iter().map(Handler::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[track_caller]
fn caller() -> Location {
    let location = panic::Location::caller();
    Location::new(location.file(), location.line())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing a [`Logger`]
///
/// # Example
/// ```
/// use alert_logger::prelude::*;
///
/// let logger = Logger::builder("payments")
///     .level(LogLevel::Warning)
///     .format("{project_name} {level}: {message}")
///     .project_name("shop")
///     .build()
///     .unwrap();
/// assert_eq!(logger.level(), LogLevel::Warning);
/// ```
pub struct LoggerBuilder {
    name: String,
    level: LogLevel,
    format: String,
    base_path: Option<PathBuf>,
    project_name: Option<String>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::default(),
            format: DEFAULT_FORMAT.to_string(),
            base_path: None,
            project_name: None,
        }
    }

    /// Set the logger floor
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the default template for every handler
    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Root that `{relative_path}` is computed from
    #[must_use = "builder methods return a new value"]
    pub fn base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// A configuration error if the name is empty, the format does not parse, or it uses
    /// `{relative_path}` / `{project_name}` without a base path / project name.
    pub fn build(self) -> Result<Logger> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::config("Logger", "logger name cannot be empty"));
        }

        let format = Template::parse(&self.format)?;
        validate_context(
            &format,
            self.base_path.as_deref(),
            self.project_name.as_deref(),
        )?;

        Ok(Logger {
            name: self.name,
            level: self.level,
            format,
            base_path: self.base_path,
            project_name: self.project_name,
            handlers: Vec::new(),
            metrics: DispatchMetrics::new(),
        })
    }
}
