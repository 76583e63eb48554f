//! Name to logger table
//!
//! Loggers are built and configured through `&mut Logger`, then frozen into the registry
//! and shared as `Arc<Logger>`.

use super::error::{LoggerError, Result};
use super::logger::Logger;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct LoggerRegistry {
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze `logger` and make it available under its name
    ///
    /// # Errors
    ///
    /// A configuration error if a logger with the same name is already registered
    pub fn register(&self, logger: Logger) -> Result<Arc<Logger>> {
        let mut loggers = self.loggers.write();
        if loggers.contains_key(logger.name()) {
            return Err(LoggerError::config(
                "LoggerRegistry",
                format!("logger '{}' is already registered", logger.name()),
            ));
        }

        let logger = Arc::new(logger);
        loggers.insert(logger.name().to_string(), Arc::clone(&logger));
        Ok(logger)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.read().get(name).cloned()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    /// Flush every registered logger, returning the first error
    pub fn flush_all(&self) -> Result<()> {
        let loggers: Vec<Arc<Logger>> = self.loggers.read().values().cloned().collect();
        let mut first_error = None;
        for logger in loggers {
            if let Err(e) = logger.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
