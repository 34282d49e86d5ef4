//! Expense maintenance commands - `undo` and `purge`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::bot::Context;
    use crate::bot::commands::{author_id, chat_id, ensure_admin, ensure_chat};
    use crate::core::ledger;
    use crate::core::stats::Clock;
    use crate::errors::Result;

    /// Removes the caller's most recent expense recorded today.
    #[poise::command(slash_command, prefix_command)]
    pub async fn undo(ctx: Context<'_>) -> Result<()> {
        if !ensure_chat(&ctx).await? {
            return Ok(());
        }
        let data = ctx.data();
        let clock = Clock::from_settings(&data.settings);

        match ledger::undo_last_today(&data.database, author_id(&ctx), &clock).await? {
            Some(expense) => {
                ctx.say(format!(
                    "Удалил последнюю запись за сегодня: {:.0} {} в '{}'.",
                    expense.amount, expense.currency, expense.category
                ))
                .await?;
            }
            None => {
                ctx.say("Нечего отменять сегодня.").await?;
            }
        }
        Ok(())
    }

    /// Deletes this chat's entire expense history. Admin only.
    #[poise::command(slash_command, prefix_command)]
    pub async fn purge(ctx: Context<'_>) -> Result<()> {
        if !ensure_chat(&ctx).await? {
            return Ok(());
        }
        if !ensure_admin(&ctx).await? {
            return Ok(());
        }
        let removed = ledger::purge_chat(&ctx.data().database, chat_id(&ctx)).await?;
        ctx.say(format!("Стёр историю чата: {removed} записей.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
