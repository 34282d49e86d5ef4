//! Category administration commands - `categories`, `setcategory`,
//! `addaliases`.
//!
//! Alias lists arrive pipe-delimited ("вино | пиво | бар"), the same shape
//! they are stored in. Replace overwrites the whole list; append merges and
//! reports cross-category conflicts instead of silently stealing aliases.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::bot::Context;
    use crate::bot::commands::ensure_admin;
    use crate::bot::handlers::autocomplete;
    use crate::core::aliases;
    use crate::errors::Result;

    fn split_aliases(raw: &str) -> Vec<String> {
        raw.split('|')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Lists all known categories with their aliases.
    #[poise::command(slash_command, prefix_command)]
    pub async fn categories(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let listing = aliases::list_categories(&data.database, &data.categories).await?;

        let lines: Vec<String> = listing
            .into_iter()
            .map(|(name, aliases)| {
                if aliases.is_empty() {
                    name
                } else {
                    format!("{name}: {}", aliases.join(", "))
                }
            })
            .collect();

        ctx.say(format!(
            "Категории (алиасы срабатывают в сообщениях):\n{}\n\n\
             Добавить: /setcategory или /addaliases.",
            lines.join("\n")
        ))
        .await?;
        Ok(())
    }

    /// Replaces a category's entire alias list. Admin only.
    #[poise::command(slash_command, prefix_command)]
    pub async fn setcategory(
        ctx: Context<'_>,
        #[description = "Имя категории"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        name: String,
        #[description = "Алиасы через | (пусто - убрать все)"]
        #[rest]
        aliases_raw: Option<String>,
    ) -> Result<()> {
        if !ensure_admin(&ctx).await? {
            return Ok(());
        }
        let data = ctx.data();
        let alias_list = aliases_raw.as_deref().map(split_aliases).unwrap_or_default();

        let model = aliases::replace_category(&data.database, &name, &alias_list).await?;
        let shown = model.aliases.as_deref().map_or_else(
            || "—".to_string(),
            |list| list.split('|').collect::<Vec<_>>().join(", "),
        );
        ctx.say(format!("Категория '{}' обновлена. Алиасы: {shown}", model.name))
            .await?;
        Ok(())
    }

    /// Merges new aliases into a category, reporting conflicts. Admin only.
    #[poise::command(slash_command, prefix_command)]
    pub async fn addaliases(
        ctx: Context<'_>,
        #[description = "Имя категории"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        name: String,
        #[description = "Новые алиасы через |"]
        #[rest]
        aliases_raw: String,
    ) -> Result<()> {
        if !ensure_admin(&ctx).await? {
            return Ok(());
        }
        let data = ctx.data();
        let alias_list = split_aliases(&aliases_raw);
        if alias_list.is_empty() {
            ctx.say("Формат: /addaliases <имя> алиас1 | алиас2 ...").await?;
            return Ok(());
        }

        let outcome =
            aliases::append_aliases(&data.database, &data.categories, &name, &alias_list).await?;

        let mut reply = String::new();
        if outcome.added.is_empty() {
            reply.push_str("Ничего нового не добавил.");
        } else {
            reply.push_str(&format!("Добавил к '{name}': {}.", outcome.added.join(", ")));
        }
        if !outcome.rejected.is_empty() {
            reply.push_str(&format!(
                "\nУже заняты другой категорией: {}.",
                outcome.rejected.join(", ")
            ));
        }
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
