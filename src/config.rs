//! Serde-driven logger configuration
//!
//! A `LoggerConfig` document describes one logger and the handlers to attach to it:
//!
//! ```json
//! {
//!   "name": "billing",
//!   "level": "INFO",
//!   "format": "{timestamp} {level_prefix}{message}",
//!   "console": { "colors": false },
//!   "file": { "dir": "logs", "max_archives": 14, "level": "WARNING" },
//!   "remote": { "level": "CRITICAL", "parse_mode": "MarkdownV2" }
//! }
//! ```
//!
//! A `remote` section without `bot_token`/`chat_id` takes both from the environment.

use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use crate::core::logger::{HandlerOptions, Logger};
use crate::handlers::{ChatId, ParseMode, RemoteConfig, RetentionPolicy};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct LoggerConfig {
    pub name: String,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub base_path: Option<PathBuf>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub console: Option<HandlerOptions>,
    #[serde(default)]
    pub file: Option<FileConfig>,
    #[serde(default)]
    pub remote: Option<RemoteSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    pub dir: PathBuf,
    #[serde(default)]
    pub max_archives: Option<usize>,
    #[serde(flatten)]
    pub options: HandlerOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSection {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<ChatId>,
    #[serde(default)]
    pub parse_mode: Option<ParseMode>,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(flatten)]
    pub options: HandlerOptions,
}

impl RemoteSection {
    /// Credentials from the document, or from the environment when both are omitted
    pub fn resolve(&self) -> Result<RemoteConfig> {
        let mut config = match (&self.bot_token, &self.chat_id) {
            (Some(token), Some(chat_id)) => RemoteConfig::new(token.clone(), chat_id.clone()),
            (None, None) => RemoteConfig::from_env()?,
            _ => {
                return Err(LoggerError::config(
                    "RemoteSection",
                    "bot_token and chat_id must be given together",
                ))
            }
        };

        if let Some(parse_mode) = self.parse_mode {
            config = config.with_parse_mode(parse_mode);
        }
        if let Some(ref api_base) = self.api_base {
            config = config.with_api_base(api_base.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "read logger config",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&json)
    }

    /// Build the logger and attach every configured handler
    pub fn build(&self) -> Result<Logger> {
        let mut builder = Logger::builder(self.name.as_str()).level(self.level);
        if let Some(ref format) = self.format {
            builder = builder.format(format.as_str());
        }
        if let Some(ref base_path) = self.base_path {
            builder = builder.base_path(base_path.clone());
        }
        if let Some(ref project_name) = self.project_name {
            builder = builder.project_name(project_name.as_str());
        }
        let mut logger = builder.build()?;

        if let Some(ref console) = self.console {
            logger.add_console(console.clone())?;
        }
        if let Some(ref file) = self.file {
            let retention = file
                .max_archives
                .map_or_else(RetentionPolicy::default, |count| {
                    RetentionPolicy::new().with_max_archives(count)
                });
            logger.add_file_with_retention(&file.dir, retention, file.options.clone())?;
        }
        if let Some(ref remote) = self.remote {
            logger.add_remote(remote.resolve()?, remote.options.clone())?;
        }

        Ok(logger)
    }
}
