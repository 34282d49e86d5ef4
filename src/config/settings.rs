//! Startup settings loaded from environment variables.
//!
//! Everything here is read exactly once at startup (after `dotenvy` has had a
//! chance to populate the environment from `.env`). A missing required value
//! or a malformed optional one is a fatal [`Error::Config`] - the process
//! must not start half-configured. The bot token itself is NOT stored here;
//! `main` reads it from the environment directly before handing it to the
//! framework.

use crate::errors::{Error, Result};
use chrono::Weekday;
use chrono_tz::Tz;
use std::collections::HashSet;
use std::path::PathBuf;

/// Canonical currency symbol substituted when no currency is detected.
pub const DEFAULT_CURRENCY: &str = "₽";

/// Application settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API key for the generative provider
    pub gemini_api_key: String,
    /// SQLite connection URL
    pub database_url: String,
    /// Platform user IDs allowed to run administrative commands
    pub admins: HashSet<u64>,
    /// If set, the single chat the bot records expenses for
    pub allowed_chat_id: Option<i64>,
    /// Currency label used when formatting totals
    pub default_currency: String,
    /// Weekday the "week" aggregation period starts on
    pub week_start: Weekday,
    /// Reference time zone for all day/week/month boundaries
    pub timezone: Tz,
    /// Text-generation model name
    pub text_model: String,
    /// Image-generation model name
    pub image_model: String,
    /// Optional path overriding the embedded category table
    pub categories_config: Option<PathBuf>,
}

/// Returns the trimmed value of an environment variable, treating empty and
/// whitespace-only values as absent.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_required(name: &str) -> Result<String> {
    env_opt(name).ok_or_else(|| Error::Config {
        message: format!("{name} must be set"),
    })
}

impl Settings {
    /// Loads and validates all settings from the environment.
    pub fn load_from_env() -> Result<Self> {
        let gemini_api_key = env_required("GEMINI_API_KEY")?;

        let database_url = env_opt("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://data/tratabot.sqlite?mode=rwc".to_string());

        let admins = match env_opt("ADMIN_USER_IDS") {
            Some(raw) => parse_admin_ids(&raw)?,
            None => HashSet::new(),
        };

        let allowed_chat_id = env_opt("ALLOWED_CHAT_ID")
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| Error::Config {
                    message: format!("ALLOWED_CHAT_ID must be an integer chat id, got '{raw}'"),
                })
            })
            .transpose()?;

        let default_currency =
            env_opt("DEFAULT_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let week_start = match env_opt("WEEK_START") {
            Some(raw) => raw.to_lowercase().parse::<Weekday>().map_err(|_| Error::Config {
                message: format!("WEEK_START must be a weekday name like 'monday', got '{raw}'"),
            })?,
            None => Weekday::Mon,
        };

        let timezone = match env_opt("TIMEZONE") {
            Some(raw) => raw.parse::<Tz>().map_err(|_| Error::Config {
                message: format!("TIMEZONE must be an IANA zone like 'Europe/Moscow', got '{raw}'"),
            })?,
            None => chrono_tz::Europe::Moscow,
        };

        let text_model = env_opt("TEXT_MODEL").unwrap_or_else(|| "gemini-2.5-flash".to_string());
        let image_model = env_opt("IMAGE_MODEL")
            .unwrap_or_else(|| "gemini-2.0-flash-preview-image-generation".to_string());

        let categories_config = env_opt("CATEGORIES_CONFIG").map(PathBuf::from);

        Ok(Self {
            gemini_api_key,
            database_url,
            admins,
            allowed_chat_id,
            default_currency,
            week_start,
            timezone,
            text_model,
            image_model,
            categories_config,
        })
    }

    /// Whether the given platform user may run administrative commands.
    #[must_use]
    pub fn is_admin(&self, platform_user_id: u64) -> bool {
        self.admins.contains(&platform_user_id)
    }

    /// Whether the bot records expenses for the given chat.
    #[must_use]
    pub fn chat_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chat_id.is_none_or(|allowed| allowed == chat_id)
    }
}

fn parse_admin_ids(raw: &str) -> Result<HashSet<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>().map_err(|_| Error::Config {
                message: format!("ADMIN_USER_IDS must be comma-separated user ids, got '{part}'"),
            })
        })
        .collect()
}
