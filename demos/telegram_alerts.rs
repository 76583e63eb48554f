//! Telegram alerting example
//!
//! Sends ERROR and CRITICAL records to a Telegram chat while everything goes to the console.
//!
//! Run with:
//! TELEGRAM_BOT_TOKEN=123:ABC TELEGRAM_USER_ID=42 cargo run --example telegram_alerts

use alert_logger::prelude::*;
use alert_logger::{critical, info};

fn main() -> Result<()> {
    println!("=== Alert Logger - Telegram Alerts Example ===\n");

    let registry = LoggerRegistry::new();

    let mut logger = Logger::builder("payments")
        .project_name("shop")
        .format("{timestamp} {level_prefix}{name} - {message}")
        .build()?;
    logger.add_console(HandlerOptions::new())?;

    match RemoteConfig::from_env() {
        Ok(config) => logger.add_remote(
            config,
            HandlerOptions::new()
                .with_level(LogLevel::Error)
                .with_format("*{project_name}* {level}\n{message}"),
        )?,
        Err(e) => println!("Remote alerts disabled: {}\n", e),
    }

    let logger = registry.register(logger)?;

    info!(logger, "Checkout service ready");
    let outcome = "card_declined (code 51)";
    critical!(logger, "Payment for |Ebuyer@example.com| failed: {}", outcome);

    // failures to reach Telegram are reported on stderr, inspect them here instead
    let event = LogEvent::new(
        LogLevel::Error,
        logger.name(),
        "Refund queue is stuck",
        Location::new(file!(), line!()),
    );
    for failure in logger.dispatch(&event) {
        println!("Delivery failed: {}", failure);
    }

    registry.flush_all()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
