//! Logging macros for ergonomic log message formatting.
//!
//! These macros format like `format!` and record the call site, including the enclosing
//! function, so `{relative_path}` renders as `path:function[line]`.
//!
//! # Examples
//!
//! ```
//! use alert_logger::prelude::*;
//! use alert_logger::{error, info};
//!
//! let logger = Logger::builder("app").build().unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // an error payload goes after `err =`, it is printed below the record
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
//! error!(logger, err = err, "Failed to save order {}", 42);
//! ```

/// Source location of the macro call site, with the enclosing function name
#[doc(hidden)]
#[macro_export]
macro_rules! __location {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let path = __type_name_of(__here);
        let path = path.strip_suffix("::__here").unwrap_or(path);
        let location = $crate::Location::new(file!(), line!());
        match $crate::Location::function_from_type_name(path) {
            Some(function) => location.with_function(function),
            None => location,
        }
    }};
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use alert_logger::prelude::*;
/// # let logger = Logger::builder("app").build().unwrap();
/// use alert_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, err = $err:expr, $($arg:tt)+) => {
        $logger.emit_error($level, format!($($arg)+), $err, $crate::__location!())
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.emit($level, format!($($arg)+), $crate::__location!())
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use alert_logger::prelude::*;
/// # let logger = Logger::builder("app").level(LogLevel::Debug).build().unwrap();
/// use alert_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use alert_logger::prelude::*;
/// # let logger = Logger::builder("app").build().unwrap();
/// use alert_logger::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// # Examples
///
/// ```
/// # use alert_logger::prelude::*;
/// # let logger = Logger::builder("app").build().unwrap();
/// use alert_logger::critical;
/// critical!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
