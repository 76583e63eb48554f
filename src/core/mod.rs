//! Core logger types

pub mod error;
pub mod formatter;
pub mod handler;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod markup;
pub mod masking;
pub mod metrics;
pub mod registry;
pub mod template;

pub use error::{LoggerError, Result};
pub use formatter::{FormatOptions, Formatter};
pub use handler::{Handler, HandlerKind};
pub use log_event::{LogEvent, Location};
pub use log_level::LogLevel;
pub use logger::{HandlerFailure, HandlerOptions, Logger, LoggerBuilder, DEFAULT_FORMAT};
pub use markup::escape_markdown_v2;
pub use masking::mask;
pub use metrics::DispatchMetrics;
pub use registry::LoggerRegistry;
pub use template::{Field, Template};
