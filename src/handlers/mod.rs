//! Destination handlers

pub mod console;
pub mod remote;
pub mod rotating_file;

pub use console::ConsoleHandler;
pub use remote::{
    ChatId, HttpTransport, ParseMode, RemoteConfig, RemoteHandler, SendMessage, Transport,
    TransportResponse,
};
pub use rotating_file::{RetentionPolicy, RotatingFileHandler};
