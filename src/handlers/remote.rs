//! Remote alert handler
//!
//! Posts each record to the Telegram Bot API `sendMessage` method. Delivery is a single
//! blocking request with a bounded timeout; there are no retries.

use crate::core::error::{LoggerError, Result};
use crate::core::formatter::Formatter;
use crate::core::log_event::LogEvent;
use crate::core::markup::escape_markdown_v2;
use crate::core::masking::mask;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Timeout for one delivery attempt
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const CHAT_ID_ENV: &str = "TELEGRAM_USER_ID";

/// Markup dialect Telegram applies to the delivered text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    #[default]
    MarkdownV2,
    Markdown,
    #[serde(rename = "HTML")]
    Html,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::MarkdownV2 => "MarkdownV2",
            ParseMode::Markdown => "Markdown",
            ParseMode::Html => "HTML",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target chat: a numeric id or an `@channel` style name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Name(String),
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(id) => ChatId::Id(id),
            Err(_) => ChatId::Name(value.trim().to_string()),
        }
    }
}

impl From<String> for ChatId {
    fn from(value: String) -> Self {
        ChatId::from(value.as_str())
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Id(id) => write!(f, "{}", id),
            ChatId::Name(name) => f.write_str(name),
        }
    }
}

/// Credentials and delivery settings for the remote handler
#[derive(Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub bot_token: String,
    pub chat_id: ChatId,
    #[serde(default)]
    pub parse_mode: ParseMode,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl RemoteConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<ChatId>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            parse_mode: ParseMode::default(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Read the bot token and chat id from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_USER_ID`
    pub fn from_env() -> Result<Self> {
        let read = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| LoggerError::config("RemoteConfig", format!("{} is not set", key)))
        };
        Ok(Self::new(read(BOT_TOKEN_ENV)?, read(CHAT_ID_ENV)?))
    }

    #[must_use]
    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = parse_mode;
        self
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Request timeout, never shorter than one second
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("parse_mode", &self.parse_mode)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// JSON body of a `sendMessage` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub parse_mode: ParseMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// The HTTP seam under [`RemoteHandler`]
pub trait Transport: Send + Sync {
    fn post_json(&self, url: &str, payload: &SendMessage) -> Result<TransportResponse>;
}

/// Blocking reqwest client with a request timeout
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoggerError::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, payload: &SendMessage) -> Result<TransportResponse> {
        // the URL carries the bot token, keep it out of error text
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .map_err(|e| LoggerError::transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| LoggerError::transport(e.without_url().to_string()))?;
        Ok(TransportResponse { status, body })
    }
}

/// Error body returned by the Bot API on failure
#[derive(Debug, Deserialize)]
struct ApiError {
    error_code: i64,
    description: String,
}

pub struct RemoteHandler {
    config: RemoteConfig,
    transport: Box<dyn Transport>,
}

impl RemoteHandler {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    pub fn with_transport(config: RemoteConfig, transport: Box<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// The `{message}` field as delivered: message and error payload, masked, then escaped
    pub fn message_text(event: &LogEvent) -> String {
        let mut raw = event.message.clone();
        if let Some(ref error) = event.error {
            raw.push('\n');
            raw.push_str(error);
        }
        escape_markdown_v2(&mask(&raw))
    }

    pub fn deliver(&self, event: &LogEvent, formatter: &Formatter) -> Result<()> {
        let text = formatter.render_with_message(event, &Self::message_text(event))?;
        self.send(text)
    }

    /// Send already-rendered text
    ///
    /// # Errors
    ///
    /// `DeliveryError` with the remote error code and description for any status but 200,
    /// `TransportError` if the request never got an answer.
    pub fn send(&self, text: String) -> Result<()> {
        let payload = SendMessage {
            chat_id: self.config.chat_id.clone(),
            text,
            parse_mode: self.config.parse_mode,
        };

        let response = self.transport.post_json(&self.config.endpoint(), &payload)?;
        if response.status == 200 {
            return Ok(());
        }

        // TODO: descriptions can be very large; cap them before they reach callers
        match serde_json::from_str::<ApiError>(&response.body) {
            Ok(api) => Err(LoggerError::delivery(api.error_code, api.description)),
            Err(_) => Err(LoggerError::delivery(
                i64::from(response.status),
                response.body,
            )),
        }
    }
}
