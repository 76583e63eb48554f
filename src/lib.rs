//! # Alert Logger
//!
//! A logging façade that renders each record separately for every destination it goes to.
//!
//! ## Features
//!
//! - **Per-handler rendering**: each handler has its own template, floor, colors and date format
//! - **Sensitive data masking**: `|N...|` phone and `|E...|` email spans are masked in every output
//! - **Daily rotation**: files roll over at the day boundary into gzip archives, 7 kept by default
//! - **Telegram alerts**: MarkdownV2-escaped delivery to the Bot API
//! - **Isolation**: a failing or panicking handler never stops the others

pub mod config;
pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::config::LoggerConfig;
    pub use crate::core::{
        HandlerOptions, LogEvent, LogLevel, Location, Logger, LoggerBuilder, LoggerError,
        LoggerRegistry, Result,
    };
    pub use crate::handlers::{ChatId, ParseMode, RemoteConfig, RetentionPolicy};
}

pub use crate::config::LoggerConfig;
pub use crate::core::{
    escape_markdown_v2, mask, DispatchMetrics, Field, FormatOptions, Formatter, Handler,
    HandlerFailure, HandlerKind, HandlerOptions, LogEvent, LogLevel, Location, Logger,
    LoggerBuilder, LoggerError, LoggerRegistry, Result, Template, DEFAULT_FORMAT,
};
pub use crate::handlers::{
    ChatId, ConsoleHandler, ParseMode, RemoteConfig, RemoteHandler, RetentionPolicy,
    RotatingFileHandler, Transport,
};
