//! File logging example
//!
//! Demonstrates logging to console and a day-rotated file at the same time.
//!
//! Run with: cargo run --example file_logging

use alert_logger::prelude::*;
use alert_logger::{error, info, warning};

fn main() -> Result<()> {
    println!("=== Alert Logger - File Logging Example ===\n");

    let mut logger = Logger::builder("application")
        .format("[{timestamp}] {level_prefix}{name}: {message}")
        .build()?;

    logger.add_console(HandlerOptions::new())?;
    // warnings and above only, two weeks of archives
    logger.add_file_with_retention(
        "logs",
        RetentionPolicy::new().with_max_archives(14),
        HandlerOptions::new().with_level(LogLevel::Warning),
    )?;

    println!("1. Logging to both console and file:");
    info!(logger, "Application started");
    info!(logger, "Configuration loaded successfully");
    warning!(logger, "Using default settings for some options");

    println!("\n2. Errors carry their cause below the record:");
    let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "plugins/extra.so missing");
    error!(logger, err = cause, "Failed to load optional plugin");

    for i in 1..=5 {
        info!(logger, "Processing item {}/5", i);
        if i == 3 {
            warning!(logger, "Item {} took longer than expected", i);
        }
    }

    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/application.log' for the file output; older days are in 'logs/application/'");

    Ok(())
}
