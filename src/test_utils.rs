//! Shared test utilities for tratabot.
//!
//! This module provides common helper functions for setting up test
//! databases, fixed clocks, and rows with controlled timestamps.

use crate::config::settings::{DEFAULT_CURRENCY, Settings};
use crate::core::stats::Clock;
use crate::entities::expense;
use crate::errors::Result;
use chrono::{DateTime, TimeZone, Utc, Weekday};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::collections::HashSet;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed clock: Thursday 2025-05-15 12:00 UTC (15:00 in Moscow), Monday
/// week start. Tests derive variations with struct-update syntax.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_clock() -> Clock {
    Clock {
        now: Utc.with_ymd_and_hms(2025, 5, 15, 12, 0, 0).unwrap(),
        tz: chrono_tz::Europe::Moscow,
        week_start: Weekday::Mon,
    }
}

/// Settings with test-friendly defaults and no admins.
#[must_use]
pub fn test_settings() -> Settings {
    Settings {
        gemini_api_key: "test-key".to_string(),
        database_url: "sqlite::memory:".to_string(),
        admins: HashSet::new(),
        allowed_chat_id: None,
        default_currency: DEFAULT_CURRENCY.to_string(),
        week_start: Weekday::Mon,
        timezone: chrono_tz::Europe::Moscow,
        text_model: "test-text-model".to_string(),
        image_model: "test-image-model".to_string(),
        categories_config: None,
    }
}

/// Inserts an expense row directly with a controlled timestamp, bypassing
/// the ledger's `created_at = now()` so period tests stay deterministic.
pub async fn insert_expense_at(
    db: &DatabaseConnection,
    user_id: i64,
    chat_id: i64,
    amount: f64,
    category: &str,
    created_at: DateTime<Utc>,
) -> Result<expense::Model> {
    expense::ActiveModel {
        user_id: Set(user_id),
        chat_id: Set(chat_id),
        amount: Set(amount),
        currency: Set(DEFAULT_CURRENCY.to_string()),
        category: Set(category.to_string()),
        note: Set(None),
        created_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
