//! Statistics Discord commands - `stats`, `week`, `month`, `alltime`, `me`.
//!
//! Thin formatting over [`crate::core::stats`]; every command builds one
//! [`Clock`] from settings so all numbers in a reply share the same "now".

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::bot::Context;
    use crate::bot::commands::{author_id, chat_id, ensure_chat};
    use crate::core::stats::{self, Clock, Period};
    use crate::core::ledger;
    use crate::errors::Result;

    fn money(amount: f64, currency: &str) -> String {
        format!("{amount:.0} {currency}")
    }

    /// Shows the full summary: period totals, per-user month breakdown, and
    /// top month categories.
    #[poise::command(slash_command, prefix_command)]
    pub async fn stats(ctx: Context<'_>) -> Result<()> {
        if !ensure_chat(&ctx).await? {
            return Ok(());
        }
        let data = ctx.data();
        let db = &data.database;
        let cid = chat_id(&ctx);
        let clock = Clock::from_settings(&data.settings);
        let currency = &data.settings.default_currency;

        let week = stats::sum_by_period(db, cid, Period::Week, &clock).await?;
        let month = stats::sum_by_period(db, cid, Period::Month, &clock).await?;
        let all_time = stats::total_all_time(db, cid).await?;
        let per_user = stats::sum_by_user(db, cid, Period::Month, &clock).await?;
        let top = stats::top_categories(db, cid, Period::Month, 3, &clock).await?;

        let mut per_user_lines = Vec::new();
        for (user_id, total) in &per_user {
            let display = ledger::get_user(db, *user_id)
                .await?
                .and_then(|u| u.username)
                .unwrap_or_else(|| user_id.to_string());
            per_user_lines.push(format!("{display}: {}", money(*total, currency)));
        }
        per_user_lines.sort();

        let top_lines: Vec<String> = top
            .iter()
            .map(|(category, total)| format!("{category}: {}", money(*total, currency)))
            .collect();

        let dash = "—".to_string();
        let text = format!(
            "Сводка:\n\
             Неделя: {}\n\
             Месяц: {}\n\
             Всё время: {}\n\n\
             По пользователям (месяц):\n{}\n\n\
             Топ категории (месяц):\n{}",
            money(week, currency),
            money(month, currency),
            money(all_time, currency),
            if per_user_lines.is_empty() { dash.clone() } else { per_user_lines.join("\n") },
            if top_lines.is_empty() { dash } else { top_lines.join("\n") },
        );
        ctx.say(text).await?;
        Ok(())
    }

    /// Total spent in this chat since the configured week start.
    #[poise::command(slash_command, prefix_command)]
    pub async fn week(ctx: Context<'_>) -> Result<()> {
        say_period_total(ctx, Period::Week, "Неделя").await
    }

    /// Total spent in this chat since day 1 of the month.
    #[poise::command(slash_command, prefix_command)]
    pub async fn month(ctx: Context<'_>) -> Result<()> {
        say_period_total(ctx, Period::Month, "Месяц").await
    }

    /// Total spent in this chat over all time.
    #[poise::command(slash_command, prefix_command)]
    pub async fn alltime(ctx: Context<'_>) -> Result<()> {
        say_period_total(ctx, Period::All, "Всё время").await
    }

    async fn say_period_total(ctx: Context<'_>, period: Period, label: &str) -> Result<()> {
        if !ensure_chat(&ctx).await? {
            return Ok(());
        }
        let data = ctx.data();
        let clock = Clock::from_settings(&data.settings);
        let total = stats::sum_by_period(&data.database, chat_id(&ctx), period, &clock).await?;
        ctx.say(format!("{label}: {}", money(total, &data.settings.default_currency)))
            .await?;
        Ok(())
    }

    /// The caller's own total for the current month.
    #[poise::command(slash_command, prefix_command)]
    pub async fn me(ctx: Context<'_>) -> Result<()> {
        if !ensure_chat(&ctx).await? {
            return Ok(());
        }
        let data = ctx.data();
        let clock = Clock::from_settings(&data.settings);
        let per_user =
            stats::sum_by_user(&data.database, chat_id(&ctx), Period::Month, &clock).await?;
        let total = per_user.get(&author_id(&ctx)).copied().unwrap_or(0.0);
        ctx.say(format!(
            "За месяц ты потратил: {}",
            money(total, &data.settings.default_currency)
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
