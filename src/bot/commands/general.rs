//! General Discord commands - start and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::bot::Context;
    use crate::bot::commands::ensure_chat;
    use crate::errors::Result;

    /// Greets new chats and explains how to record an expense.
    #[poise::command(slash_command, prefix_command)]
    pub async fn start(ctx: Context<'_>) -> Result<()> {
        if !ensure_chat(&ctx).await? {
            return Ok(());
        }
        ctx.say(
            "Добавляй траты просто сообщением: '1500 алкоголь бар' или '250 суши еда'.\n\
             Команды: /stats, /week, /month, /alltime, /me, /categories, /undo.",
        )
        .await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        if !ensure_chat(&ctx).await? {
            return Ok(());
        }
        let help_text = "**Траты**\n\
        Просто напиши сумму и на что: `1500 алкоголь бар`, `250 суши еда`.\n\
        • `/undo` - убрать свою последнюю запись за сегодня.\n\n\
        **Статистика**\n\
        • `/stats` - сводка: неделя, месяц, всё время, по людям, топ категорий.\n\
        • `/week`, `/month`, `/alltime` - суммы за период.\n\
        • `/me` - сколько ты потратил за месяц.\n\n\
        **Категории**\n\
        • `/categories` - список категорий и алиасов.\n\
        • `/setcategory <имя> <алиас1 | алиас2>` - заменить алиасы (админ).\n\
        • `/addaliases <имя> <алиас1 | алиас2>` - дописать алиасы (админ).\n\n\
        **Вишлист**\n\
        • `/wish [текст]` - добавить хотелку (без текста - следующим сообщением).\n\
        • `/wishlist`, `/unwish <id>`, `/pickwish`.\n\n\
        **Прочее**\n\
        • `/style` - тон комментариев бота.\n\
        • `/purge` - стереть историю трат чата (админ).";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
