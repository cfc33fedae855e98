use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct Config {
    // Telegram (blank credentials fail at delivery time, not here)
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub telegram_api_url: String,

    // Delivery timeouts
    pub text_timeout: Duration,
    pub attachment_timeout: Duration,

    // Local data
    pub storage_dir: PathBuf,
    pub catalog_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram_bot_token: String::new(),
            telegram_chat_id: String::new(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            text_timeout: Duration::from_secs(30),
            attachment_timeout: Duration::from_secs(120),
            storage_dir: PathBuf::from("data/snapshots"),
            catalog_dir: PathBuf::from("catalogs"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            // Telegram
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            telegram_chat_id: std::env::var("TELEGRAM_CHAT_ID").unwrap_or_default(),
            telegram_api_url: std::env::var("TELEGRAM_API_URL")
                .unwrap_or(defaults.telegram_api_url),

            // Delivery timeouts
            text_timeout: secs_from_env("SEND_TEXT_TIMEOUT_SECS").unwrap_or(defaults.text_timeout),
            attachment_timeout: secs_from_env("SEND_ATTACHMENT_TIMEOUT_SECS")
                .unwrap_or(defaults.attachment_timeout),

            // Local data
            storage_dir: std::env::var("QUESTIONNAIRE_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            catalog_dir: std::env::var("QUESTIONNAIRE_CATALOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_dir),
        })
    }

    /// Both delivery credentials are non-blank.
    pub fn has_telegram_credentials(&self) -> bool {
        !self.telegram_bot_token.trim().is_empty() && !self.telegram_chat_id.trim().is_empty()
    }
}

fn secs_from_env(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
