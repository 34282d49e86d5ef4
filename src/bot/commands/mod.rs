//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Category administration commands
pub mod category;
/// Expense maintenance commands (undo, purge)
pub mod expense;
/// General utility commands
pub mod general;
/// Statistics commands
pub mod stats;
/// Commentary style and reference photo commands
pub mod style;
/// Wishlist commands
pub mod wishlist;

// Export commands
pub use category::*;
pub use expense::*;
pub use general::*;
pub use stats::*;
pub use style::*;
pub use wishlist::*;

use crate::bot::{Context, snowflake_to_i64};
use crate::errors::Result;

/// Checks the admin allow-list, replying with a refusal for everyone else.
/// Returns whether the caller may proceed.
pub(crate) async fn ensure_admin(ctx: &Context<'_>) -> Result<bool> {
    if ctx.data().settings.is_admin(ctx.author().id.get()) {
        return Ok(true);
    }
    ctx.say("Только админы могут это делать.").await?;
    Ok(false)
}

/// Checks the allowed-chat setting, replying with a refusal elsewhere.
/// Returns whether the caller may proceed.
pub(crate) async fn ensure_chat(ctx: &Context<'_>) -> Result<bool> {
    if ctx.data().settings.chat_allowed(chat_id(ctx)) {
        return Ok(true);
    }
    ctx.say("Этот бот привязан к другому групповому чату.").await?;
    Ok(false)
}

/// The chat id the command was invoked in, as the store keys it.
pub(crate) fn chat_id(ctx: &Context<'_>) -> i64 {
    snowflake_to_i64(ctx.channel_id().get())
}

/// The invoking user's platform id, as the store keys it.
pub(crate) fn author_id(ctx: &Context<'_>) -> i64 {
    snowflake_to_i64(ctx.author().id.get())
}
