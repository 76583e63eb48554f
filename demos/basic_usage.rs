//! Basic logger usage example
//!
//! Demonstrates a console logger, per-handler floors and inline masking.
//!
//! Run with: cargo run --example basic_usage

use alert_logger::prelude::*;
use alert_logger::{critical, debug, info, warning};

fn main() -> Result<()> {
    println!("=== Alert Logger - Basic Usage Example ===\n");

    let mut logger = Logger::builder("basic")
        .level(LogLevel::Debug)
        .format("{timestamp} {level_prefix}{name}[{pid}] {relative_path} - {message}")
        .base_path(env!("CARGO_MANIFEST_DIR"))
        .build()?;
    logger.add_console(HandlerOptions::new())?;

    println!("1. Logging at different levels:");
    debug!(logger, "This is a debug message");
    info!(logger, "This is an info message");
    warning!(logger, "This is a warning message");
    logger.error("This is an error message");
    critical!(logger, "This is a critical message");

    println!("\n2. Masking sensitive values:");
    info!(logger, "User |N+380501234567| signed in as |Eivan.petrenko@example.com|");

    println!("\n3. A second logger with a stricter floor:");
    let mut quiet = Logger::builder("quiet")
        .level(LogLevel::Warning)
        .format("{level_prefix}{message}")
        .build()?;
    quiet.add_console(HandlerOptions::new().with_colors(false))?;
    info!(quiet, "Info message (hidden)");
    warning!(quiet, "Warning message (visible)");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
