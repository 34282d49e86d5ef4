//! Free-text message handler.
//!
//! This is the dispatcher glue the whole system hangs off: every non-command
//! text message runs through wishlist capture, then the parse → record →
//! aggregate → commentary → banner pipeline. Messages without a parsable
//! amount are silently ignored - a group chat is mostly not expenses.

use crate::bot::{BotData, snowflake_to_i64};
use crate::core::{aliases, ledger, parser, stats};
use crate::errors::{Error, Result};
use crate::r#gen::{gemini, image};
use poise::serenity_prelude as serenity;
use tracing::{debug, error};

/// Poise event hook; only `Message` events are interesting here.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    if let serenity::FullEvent::Message { new_message } = event {
        handle_message(ctx, new_message, data).await?;
    }
    Ok(())
}

async fn handle_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &BotData,
) -> Result<()> {
    if msg.author.bot {
        return Ok(());
    }
    let chat_id = snowflake_to_i64(msg.channel_id.get());
    if !data.settings.chat_allowed(chat_id) {
        return Ok(());
    }
    let text = msg.content.trim();
    if text.is_empty() {
        return Ok(());
    }

    let user_id = snowflake_to_i64(msg.author.id.get());

    // A previously armed /wish consumes this message as the item text.
    if data.session.take_wishlist_prompt(user_id).await {
        let item = ledger::add_wishlist_item(&data.database, user_id, text).await?;
        msg.reply(ctx, format!("Добавил в вишлист: {}", item.item)).await?;
        return Ok(());
    }

    ledger::ensure_user(&data.database, user_id, Some(&msg.author.name)).await?;

    let alias_map = aliases::load_alias_map(&data.database, &data.categories).await?;
    let Some(parsed) = parser::parse_message(text, &alias_map) else {
        return Ok(()); // not an expense message
    };

    let expense = ledger::add_expense(
        &data.database,
        user_id,
        chat_id,
        parsed.amount,
        &parsed.currency,
        &parsed.category,
        parsed.note.as_deref(),
    )
    .await?;

    let total = stats::total_all_time(&data.database, chat_id).await?;

    let idea =
        gemini::pick_item(&data.database, &data.http, &data.settings, chat_id, total).await?;
    let style = data.session.style_for(chat_id).await;
    let quip = gemini::generate_commentary(
        &data.http,
        &data.settings,
        total,
        expense.amount,
        &expense.category,
        style,
        idea.as_str(),
    )
    .await;
    if quip.is_fallback() {
        debug!("Commentary fell back to the local template");
    }

    let currency = &data.settings.default_currency;
    let reply_text = format!(
        "Добавлено: {:.0} {} в '{}'.\nИтого за всё время: {:.0} {}.\n\n{}",
        expense.amount,
        expense.currency,
        expense.category,
        total,
        currency,
        quip.inner()
    );
    msg.reply(ctx, reply_text).await?;

    send_banner(ctx, msg, data, chat_id, user_id, &expense.category, total, &idea).await;
    Ok(())
}

/// Generates and sends the banner photo. Failures here are logged and
/// swallowed - the expense is already recorded and confirmed.
#[allow(clippy::too_many_arguments)]
async fn send_banner(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &BotData,
    chat_id: i64,
    user_id: i64,
    category: &str,
    total: f64,
    idea: &str,
) {
    let currency = &data.settings.default_currency;
    let prompt = format!(
        "Сатирический баннер про общие траты компании друзей. Категория последней траты: '{category}'. \
         Всего потрачено: {total:.0} {currency}. На эти деньги уже можно было купить: {idea}. \
         Тёмный фон, крупная сумма, без текста мелким шрифтом."
    );

    let reference = load_reference_photo(data, chat_id, user_id).await;
    let references: Vec<Vec<u8>> = reference.into_iter().collect();

    let banner =
        match image::generate_banner(&data.http, &data.settings, &prompt, &references).await {
            Ok(outcome) => {
                if outcome.is_fallback() {
                    debug!("Banner fell back to the local placeholder");
                }
                outcome.into_inner()
            }
            Err(e) => {
                error!("Failed to render banner: {e}");
                return;
            }
        };

    let caption = format!("Всего: {total:.0} {currency}");
    let attachment = serenity::CreateAttachment::bytes(banner, "banner.png");
    let builder = serenity::CreateMessage::new()
        .content(caption)
        .add_file(attachment);
    if let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await {
        error!("Failed to send banner: {e}");
    }
}

/// Looks up the author's stored reference photo URL and fetches it.
async fn load_reference_photo(data: &BotData, chat_id: i64, user_id: i64) -> Option<Vec<u8>> {
    let key = format!("ref_photo:{user_id}");
    let url = ledger::get_state(&data.database, chat_id, &key)
        .await
        .ok()
        .flatten()?;
    image::fetch_reference_image(&data.http, &url).await
}
