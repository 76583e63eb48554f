//! Record formatter
//!
//! Turns a [`LogEvent`] into the text line a handler writes. Each handler owns its own
//! `Formatter`, so the same event can come out colored on the console and plain in a file.

use super::error::{LoggerError, Result};
use super::log_event::{LogEvent, Location};
use super::masking::mask;
use super::template::{Field, Template};
use chrono::format::{Item, StrftimeItems};
use colored::Colorize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Column width of `{level_prefix}`, trailing gap included
pub const LEVEL_COLUMN_WIDTH: usize = 8;

pub const CONSOLE_DATE_FORMAT: &str = "%H:%M:%S";
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const REMOTE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Rendering context shared by every record a formatter renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub colors: bool,
    pub base_path: Option<PathBuf>,
    pub project_name: Option<String>,
    pub date_format: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            colors: false,
            base_path: None,
            project_name: None,
            date_format: FILE_DATE_FORMAT.to_string(),
        }
    }
}

impl FormatOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub fn with_base_path(mut self, base_path: Option<PathBuf>) -> Self {
        self.base_path = base_path;
        self
    }

    #[must_use]
    pub fn with_project_name(mut self, project_name: Option<String>) -> Self {
        self.project_name = project_name;
        self
    }

    #[must_use]
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }
}

/// Check that `template` only uses fields whose context is configured
pub fn validate_context(
    template: &Template,
    base_path: Option<&Path>,
    project_name: Option<&str>,
) -> Result<()> {
    if template.uses(Field::RelativePath) && base_path.is_none() {
        return Err(LoggerError::config(
            "Template",
            "format uses {relative_path} but no base path is configured",
        ));
    }
    if template.uses(Field::ProjectName) && project_name.is_none() {
        return Err(LoggerError::config(
            "Template",
            "format uses {project_name} but no project name is configured",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Formatter {
    template: Template,
    options: FormatOptions,
}

impl Formatter {
    /// Build a formatter, rejecting templates whose required context is missing and date
    /// formats chrono cannot render.
    pub fn new(template: Template, options: FormatOptions) -> Result<Self> {
        validate_context(
            &template,
            options.base_path.as_deref(),
            options.project_name.as_deref(),
        )?;

        if StrftimeItems::new(&options.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "Formatter",
                format!("invalid date format '{}'", options.date_format),
            ));
        }

        Ok(Self { template, options })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Render a full record: masked message, then the error payload on the lines below
    pub fn render(&self, event: &LogEvent) -> Result<String> {
        let mut line = self.render_with_message(event, &mask(&event.message))?;
        if let Some(ref error) = event.error {
            line.push('\n');
            line.push_str(&mask(error));
        }
        Ok(line)
    }

    /// Render the template with `message` substituted verbatim for `{message}`
    pub fn render_with_message(&self, event: &LogEvent, message: &str) -> Result<String> {
        let relative_path = match self.relative_path(&event.location) {
            Some(path) => path,
            None if self.template.uses(Field::RelativePath) => {
                return Err(LoggerError::format(
                    Field::RelativePath.as_str(),
                    "base path is not set",
                ))
            }
            None => String::new(),
        };

        let project_name = match self.options.project_name {
            Some(ref name) => name.clone(),
            None if self.template.uses(Field::ProjectName) => {
                return Err(LoggerError::format(
                    Field::ProjectName.as_str(),
                    "project name is not set",
                ))
            }
            None => String::new(),
        };

        let mut timestamp = String::new();
        write!(timestamp, "{}", event.timestamp.format(&self.options.date_format))
            .map_err(|_| LoggerError::format(Field::Timestamp.as_str(), "date format failed"))?;

        let level_name = event.level.as_str();
        let padding = " ".repeat(LEVEL_COLUMN_WIDTH.saturating_sub(level_name.len()));

        let pid = event.pid.to_string();
        let (level, pid, name, relative_path) = if self.options.colors {
            (
                level_name.color(event.level.color_code()).bold().to_string(),
                pid.as_str().cyan().to_string(),
                event.logger_name.as_str().white().to_string(),
                relative_path.as_str().white().dimmed().to_string(),
            )
        } else {
            (
                level_name.to_string(),
                pid,
                event.logger_name.clone(),
                relative_path,
            )
        };

        Ok(self.template.render(|field| match field {
            Field::Timestamp => timestamp.clone(),
            Field::Level => level.clone(),
            Field::LevelPrefix => format!("{}{}", level, padding),
            Field::Name => name.clone(),
            Field::Pid => pid.clone(),
            Field::RelativePath => relative_path.clone(),
            Field::ProjectName => project_name.clone(),
            Field::Message => message.to_string(),
        }))
    }

    /// `path:function[line]`, relative to the base path when the file lives under it
    fn relative_path(&self, location: &Location) -> Option<String> {
        let base = self.options.base_path.as_ref()?;

        let shown = if location.file.is_empty() {
            "<unknown>".to_string()
        } else {
            Path::new(&location.file)
                .strip_prefix(base)
                .map(|path| path.display().to_string())
                .unwrap_or_else(|_| location.file.clone())
        };

        let mut out = shown.replace('\\', "/");
        out.push(':');
        if let Some(ref function) = location.function {
            out.push_str(function);
        }
        out.push_str(&format!("[{}]", location.line));
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use chrono::{Local, TimeZone};

    fn event(level: LogLevel, message: &str) -> LogEvent {
        LogEvent::new(
            level,
            "Logger1",
            message,
            Location::new("/srv/app/src/test.rs", 19).with_function("main"),
        )
        .with_timestamp(Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap())
        .with_pid(4242)
    }

    fn formatter(template: &str, options: FormatOptions) -> Result<Formatter> {
        Formatter::new(Template::parse(template)?, options)
    }

    #[test]
    fn test_plain_render() {
        let f = formatter(
            "[{timestamp}] {level_prefix}: {name}[{pid}] - {message}",
            FormatOptions::new(),
        )
        .unwrap();
        assert_eq!(
            f.render(&event(LogLevel::Info, "started")).unwrap(),
            "[2026-03-14 09:26:53] INFO    : Logger1[4242] - started"
        );
    }

    #[test]
    fn test_level_prefix_padding() {
        let f = formatter("{level_prefix}|", FormatOptions::new()).unwrap();
        assert_eq!(f.render(&event(LogLevel::Warning, "")).unwrap(), "WARNING |");
        assert_eq!(f.render(&event(LogLevel::Critical, "")).unwrap(), "CRITICAL|");
        assert_eq!(f.render(&event(LogLevel::Debug, "")).unwrap(), "DEBUG   |");
    }

    #[test]
    fn test_relative_path() {
        let options = FormatOptions::new().with_base_path(Some(PathBuf::from("/srv/app")));
        let f = formatter("{relative_path} {message}", options).unwrap();
        assert_eq!(
            f.render(&event(LogLevel::Info, "hi")).unwrap(),
            "src/test.rs:main[19] hi"
        );
    }

    #[test]
    fn test_relative_path_outside_base_and_without_function() {
        let options = FormatOptions::new().with_base_path(Some(PathBuf::from("/other")));
        let f = formatter("{relative_path}", options).unwrap();
        let mut e = event(LogLevel::Info, "");
        e.location.function = None;
        assert_eq!(f.render(&e).unwrap(), "/srv/app/src/test.rs:[19]");
    }

    #[test]
    fn test_missing_base_path_fails_at_construction() {
        let err = formatter("{relative_path} {message}", FormatOptions::new()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_missing_project_name_fails_at_construction() {
        let err = formatter("{project_name}: {message}", FormatOptions::new()).unwrap_err();
        assert!(err.is_configuration());

        let options = FormatOptions::new().with_project_name(Some("Example".to_string()));
        let f = formatter("{project_name}: {message}", options).unwrap();
        assert_eq!(f.render(&event(LogLevel::Info, "up")).unwrap(), "Example: up");
    }

    #[test]
    fn test_render_time_check_still_applies() {
        let f = Formatter {
            template: Template::parse("{relative_path}").unwrap(),
            options: FormatOptions::new(),
        };
        let err = f.render(&event(LogLevel::Info, "")).unwrap_err();
        assert!(matches!(err, LoggerError::FormatError { ref field, .. } if field == "relative_path"));
    }

    #[test]
    fn test_invalid_date_format() {
        let options = FormatOptions::new().with_date_format("%Q");
        assert!(formatter("{timestamp}", options).unwrap_err().is_configuration());
    }

    #[test]
    fn test_message_is_masked_and_error_appended() {
        let f = formatter("{level}: {message}", FormatOptions::new()).unwrap();
        let e = event(LogLevel::Error, "call |N+380501234567|")
            .with_error("Traceback: |Ejohn@mail.com|");
        assert_eq!(
            f.render(&e).unwrap(),
            "ERROR: call +380XXXXXXXXX\nTraceback: XXXX@mail.com"
        );
    }

    #[test]
    fn test_colors() {
        colored::control::set_override(true);
        let f = formatter("{level_prefix}{pid}", FormatOptions::new().with_colors(true)).unwrap();
        let line = f.render(&event(LogLevel::Warning, "")).unwrap();
        assert!(line.contains("\u{1b}["));
        assert!(line.contains("WARNING"));
        assert!(line.contains("4242"));
        assert_ne!(line, "WARNING 4242");
    }
}
