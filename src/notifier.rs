// Outbound notifications: Telegram Bot API, or the process log when Telegram isn't configured.

use crate::config::TelegramConfig;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("telegram rejected message: {status}")]
    Status { status: StatusCode },
}

/// Best-effort sink for pre-formatted text. Callers log and drop failures.
pub trait Notifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: format!(
                "{}/bot{}/sendMessage",
                config.api_base.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
        })
    }
}

impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };
        let resp = self.client.post(&self.url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Status { status });
        }
        Ok(())
    }
}

/// Writes messages to the process log instead of sending them.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        info!(operation = "notify", sink = "log", "{}", text);
        Ok(())
    }
}

pub enum ActiveNotifier {
    Telegram(TelegramNotifier),
    Log(LogNotifier),
}

impl ActiveNotifier {
    /// Telegram when configured, the log sink otherwise.
    pub fn new(config: Option<&TelegramConfig>) -> Result<Self, NotifyError> {
        match config {
            Some(c) => Ok(Self::Telegram(TelegramNotifier::new(c)?)),
            None => Ok(Self::Log(LogNotifier)),
        }
    }
}

impl Notifier for ActiveNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        match self {
            ActiveNotifier::Telegram(n) => n.send(text).await,
            ActiveNotifier::Log(n) => n.send(text).await,
        }
    }
}
