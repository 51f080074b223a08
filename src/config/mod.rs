use std::env;

use crate::error::ConfigError;

const DEFAULT_DATABASE_PATH: &str = "data/workouts.db";
const DEFAULT_POLL_SECONDS: u64 = 30;
const MIN_POLL_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_token: String,
    pub database_path: String,
    pub log_level: String,
    pub reminder_poll_seconds: u64,
}

impl Settings {
    /// Reads settings from the environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let bot_token = env::var("BOT_TOKEN").unwrap_or_default().trim().to_string();
        if bot_token.is_empty() {
            return Err(ConfigError::MissingBotToken);
        }

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string())
            .trim()
            .to_string();

        let log_level = env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .trim()
            .to_string();

        // Unparseable values fall back to the default; the floor keeps the
        // poll under the one-minute reminder match window.
        let reminder_poll_seconds = env::var("REMINDER_POLL_SECONDS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_SECONDS)
            .max(MIN_POLL_SECONDS);

        Ok(Self {
            bot_token,
            database_path,
            log_level,
            reminder_poll_seconds,
        })
    }
}
