//! Wishlist commands - `wish`, `wishlist`, `unwish`, `pickwish`.
//!
//! `/wish` without text arms a session flag; the user's next free-text
//! message becomes the item (see the message handler). Everything else is
//! plain per-user CRUD.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::bot::Context;
    use crate::bot::commands::author_id;
    use crate::core::ledger;
    use crate::errors::Result;

    /// Adds an item to your wishlist, or arms "next message is the item".
    #[poise::command(slash_command, prefix_command)]
    pub async fn wish(
        ctx: Context<'_>,
        #[description = "Что хочешь купить"]
        #[rest]
        item: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let user_id = author_id(&ctx);

        match item.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                let added = ledger::add_wishlist_item(&data.database, user_id, text).await?;
                ctx.say(format!("Добавил в вишлист: {}", added.item)).await?;
            }
            _ => {
                data.session.arm_wishlist_prompt(user_id).await;
                ctx.say("Ок, следующим сообщением напиши, что хочешь.").await?;
            }
        }
        Ok(())
    }

    /// Lists your wishlist items with their ids.
    #[poise::command(slash_command, prefix_command)]
    pub async fn wishlist(ctx: Context<'_>) -> Result<()> {
        let items = ledger::list_wishlist(&ctx.data().database, author_id(&ctx)).await?;
        if items.is_empty() {
            ctx.say("Вишлист пуст. Добавь что-нибудь через /wish.").await?;
            return Ok(());
        }
        let lines: Vec<String> = items
            .iter()
            .map(|item| format!("#{} — {}", item.id, item.item))
            .collect();
        ctx.say(format!("Твой вишлист:\n{}", lines.join("\n"))).await?;
        Ok(())
    }

    /// Removes one of your wishlist items by id.
    #[poise::command(slash_command, prefix_command)]
    pub async fn unwish(
        ctx: Context<'_>,
        #[description = "id записи из /wishlist"] item_id: i64,
    ) -> Result<()> {
        let removed =
            ledger::remove_wishlist_item(&ctx.data().database, author_id(&ctx), item_id).await?;
        if removed {
            ctx.say("Убрал.").await?;
        } else {
            ctx.say("Не нашёл такой записи в твоём вишлисте.").await?;
        }
        Ok(())
    }

    /// Picks a random item from your wishlist.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pickwish(ctx: Context<'_>) -> Result<()> {
        match ledger::random_wishlist_item(&ctx.data().database, author_id(&ctx)).await? {
            Some(item) => {
                ctx.say(format!("Судьба говорит: {}", item.item)).await?;
            }
            None => {
                ctx.say("Вишлист пуст, судьбе не из чего выбирать.").await?;
            }
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
