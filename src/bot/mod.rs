//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the application, including
//! all commands, the free-text message handler that turns chat messages into
//! expenses, and the shared bot context.

/// Discord command implementations (stats, categories, wishlist, ...)
pub mod commands;
/// Discord event handlers (free-text messages, autocomplete)
pub mod handlers;

use crate::config::categories::CategoryTable;
use crate::config::settings::Settings;
use crate::errors::{Error, Result};
use crate::session::SessionState;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::info;

/// Shared data available to all bot commands and handlers.
pub struct BotData {
    /// Database connection for all store operations
    pub database: DatabaseConnection,
    /// Startup settings (admins, currency, clock configuration, models)
    pub settings: Arc<Settings>,
    /// HTTP client shared by all provider calls
    pub http: reqwest::Client,
    /// Process-lifetime session state (styles, wishlist prompts)
    pub session: SessionState,
    /// Shipped category table merged with persisted rows at resolve time
    pub categories: CategoryTable,
}

/// Type alias for the poise context used by all commands.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Discord snowflakes fit in i64; the store keys on signed ids.
#[allow(clippy::cast_possible_wrap)]
#[must_use]
pub const fn snowflake_to_i64(id: u64) -> i64 {
    id as i64
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say("Что-то сломалось, попробуй ещё раз.").await {
                tracing::error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the framework, registers commands, and runs the bot until the
/// client stops.
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::start(),
                commands::help(),
                commands::stats(),
                commands::week(),
                commands::month(),
                commands::alltime(),
                commands::me(),
                commands::undo(),
                commands::categories(),
                commands::setcategory(),
                commands::addaliases(),
                commands::purge(),
                commands::style(),
                commands::setphoto(),
                commands::wish(),
                commands::wishlist(),
                commands::unwish(),
                commands::pickwish(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::message::handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    // MESSAGE_CONTENT is required: expenses arrive as plain text
    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .map_err(Error::from)?;

    info!("Starting bot client...");
    client.start().await.map_err(Error::from)?;
    Ok(())
}
