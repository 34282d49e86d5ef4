//! Commentary style and reference photo commands - `style`, `setphoto`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::bot::commands::{chat_id, ensure_admin, ensure_chat};
    use crate::bot::{Context, snowflake_to_i64};
    use crate::core::ledger;
    use crate::errors::Result;
    use crate::r#gen::gemini::CommentaryStyle;
    use poise::serenity_prelude as serenity;

    /// Selects the tone of the bot's commentary for this chat.
    ///
    /// The choice lives in process memory only: a restart falls back to the
    /// default tone.
    #[poise::command(slash_command, prefix_command)]
    pub async fn style(
        ctx: Context<'_>,
        #[description = "Тон комментариев"] style: CommentaryStyle,
    ) -> Result<()> {
        if !ensure_chat(&ctx).await? {
            return Ok(());
        }
        ctx.data().session.set_style(chat_id(&ctx), style).await;
        ctx.say(format!("Ок, стиль комментариев: {}.", style.label())).await?;
        Ok(())
    }

    /// Stores a reference photo URL for a user; the image generator attaches
    ///
    /// it so banners keep the spender recognizable. Admin only.
    #[poise::command(slash_command, prefix_command)]
    pub async fn setphoto(
        ctx: Context<'_>,
        #[description = "Чьё фото"] user: serenity::User,
        #[description = "URL картинки"] url: String,
    ) -> Result<()> {
        if !ensure_chat(&ctx).await? {
            return Ok(());
        }
        if !ensure_admin(&ctx).await? {
            return Ok(());
        }
        let url = url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            ctx.say("Нужна http(s) ссылка на картинку.").await?;
            return Ok(());
        }

        let key = format!("ref_photo:{}", snowflake_to_i64(user.id.get()));
        ledger::set_state(&ctx.data().database, chat_id(&ctx), &key, url).await?;
        ctx.say(format!("Запомнил фото для {}.", user.name)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
