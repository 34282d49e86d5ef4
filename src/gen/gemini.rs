//! Commentary and purchase-idea text generation.
//!
//! Prompts are built in Russian around the chat's ALL-TIME total (not the
//! last expense), asking the model for short satirical output. Any provider
//! failure - transport error, non-2xx, unparsable body, empty text - lands
//! on a deterministic local fallback via [`GenOutcome::Fallback`].

use crate::config::settings::Settings;
use crate::core::ledger;
use crate::errors::Result;
use crate::r#gen::GenOutcome;
use crate::r#gen::wire::{Content, GenerateRequest, GenerateResponse, GenerationConfig, Part};
use rand::seq::SliceRandom;
use sea_orm::DatabaseConnection;
use tracing::{debug, warn};

const GENERATE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Interests steering the suggestion prompt.
const INTERESTS: [&str; 10] = [
    "спорт (качалка)",
    "авто",
    "мотоциклы",
    "одежда",
    "секс",
    "техника",
    "еда",
    "кулинария",
    "тяжёлая музыка",
    "концерты",
];

/// BotState key holding the recently suggested items list.
const RECENT_ITEMS_KEY: &str = "recent_items";
/// The recent list is bounded by its writer; BotState itself has no TTL.
const RECENT_ITEMS_CAP: usize = 5;

/// Idea used when even the fallback produces nothing usable.
const GENERIC_IDEA: &str = "что-то полезное";

/// Tone of the generated commentary, selected per chat via `/style`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, poise::ChoiceParameter)]
pub enum CommentaryStyle {
    /// Black humor, default
    #[default]
    #[name = "дерзкий"]
    Sarcastic,
    /// Caustic locker-room motivation
    #[name = "мотивационный"]
    Motivational,
    /// Bone-dry bookkeeping voice
    #[name = "сухой"]
    Deadpan,
}

impl CommentaryStyle {
    /// Human-facing name used in confirmations.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sarcastic => "дерзкий",
            Self::Motivational => "мотивационный",
            Self::Deadpan => "сухой",
        }
    }

    const fn prompt_fragment(self) -> &'static str {
        match self {
            Self::Sarcastic => "чёрный юмор с матерком",
            Self::Motivational => "едкая мотивация, как тренер, который в вас почти верит",
            Self::Deadpan => "подчёркнуто сухим бухгалтерским тоном, что само по себе смешно",
        }
    }
}

/// One `generateContent` call. `None` covers every failure mode, including
/// an empty text response.
async fn generate_text(
    client: &reqwest::Client,
    settings: &Settings,
    prompt: String,
    config: GenerationConfig,
) -> Option<String> {
    let url = format!(
        "{GENERATE_URL}/{}:generateContent?key={}",
        settings.text_model, settings.gemini_api_key
    );
    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(prompt),
                inline_data: None,
            }],
        }],
        generation_config: Some(config),
    };

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .inspect_err(|e| warn!("Text generation request failed: {e}"))
        .ok()?
        .error_for_status()
        .inspect_err(|e| warn!("Text generation returned error status: {e}"))
        .ok()?;

    let body: GenerateResponse = response
        .json()
        .await
        .inspect_err(|e| warn!("Text generation body was unreadable: {e}"))
        .ok()?;

    let text: String = body
        .candidates
        .into_iter()
        .next()?
        .content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");
    let text = text.trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

/// Asks for `n` short purchase ideas matching the all-time total.
///
/// The model is told to answer with a bare JSON array; anything else counts
/// as a failure and yields the deterministic tiered fallback list.
pub async fn suggest_items(
    client: &reqwest::Client,
    settings: &Settings,
    total: f64,
    n: usize,
    recent: &[String],
) -> GenOutcome<Vec<String>> {
    let config = GenerationConfig {
        temperature: Some(1.1),
        top_p: Some(0.95),
        top_k: Some(50),
        response_modalities: None,
    };
    let prompt = format!(
        "Ты помощник по покупкам. Дай ИДЕИ ПРЕДМЕТОВ строго на основе ОБЩЕЙ суммы за весь период (не последней траты). \
         Ответь ТОЛЬКО JSON массивом коротких названий вещей, без брендов и эмодзи.\n\
         Интересы: {interests}\n\
         Общая сумма за весь период: {total:.0} {currency}\n\
         Избегай повторов из недавнего списка: {recent}\n\
         Сколько вариантов нужно: {n}",
        interests = INTERESTS.join(", "),
        currency = settings.default_currency,
        recent = serde_json::to_string(recent).unwrap_or_else(|_| "[]".to_string()),
    );

    if let Some(text) = generate_text(client, settings, prompt, config).await {
        if let Some(items) = parse_item_list(&text) {
            return GenOutcome::Generated(items);
        }
        warn!("Suggestion response was not a JSON list of strings");
    }
    GenOutcome::Fallback(fallback_items(total))
}

/// Extracts a list of non-empty strings from the model's reply, tolerating a
/// markdown code fence around the array.
fn parse_item_list(text: &str) -> Option<Vec<String>> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let values: Vec<serde_json::Value> = serde_json::from_str(trimmed).ok()?;
    let items: Vec<String> = values
        .iter()
        .filter_map(|v| v.as_str())
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() { None } else { Some(items) }
}

/// Deterministic idea tiers keyed by the all-time total.
fn fallback_items(total: f64) -> Vec<String> {
    let base: &[&str] = if total < 8_000.0 {
        &["перчатки для зала", "скакалка", "крепления для турника", "шейкер и креатин"]
    } else if total < 20_000.0 {
        &["гантели и эспандеры", "чугунная сковорода", "нож шефа", "билеты на концерт"]
    } else if total < 50_000.0 {
        &["наушники", "абонемент в зал на 6 мес.", "экшн-камера", "кожаная куртка"]
    } else {
        &["мотоциклетный шлем", "часть комплекта резины", "инструменты для гаража", "часть айфона"]
    };
    base.iter().map(ToString::to_string).collect()
}

/// Picks a purchase idea for the chat, preferring the first candidate not in
/// the recently-suggested list, and persists the updated list.
///
/// Store errors propagate; provider failures do not (the tiered fallback
/// kicks in inside [`suggest_items`]).
pub async fn pick_item(
    db: &DatabaseConnection,
    client: &reqwest::Client,
    settings: &Settings,
    chat_id: i64,
    total: f64,
) -> Result<String> {
    let recent = load_recent(db, chat_id).await?;
    let candidates = suggest_items(client, settings, total, 8, &recent)
        .await
        .into_inner();
    if candidates.is_empty() {
        return Ok(GENERIC_IDEA.to_string());
    }

    let choice = candidates
        .iter()
        .find(|c| !recent.contains(*c))
        .cloned()
        .or_else(|| candidates.choose(&mut rand::thread_rng()).cloned())
        .unwrap_or_else(|| GENERIC_IDEA.to_string());

    let mut updated = vec![choice.clone()];
    updated.extend(recent.into_iter().filter(|item| *item != choice));
    updated.truncate(RECENT_ITEMS_CAP);
    save_recent(db, chat_id, &updated).await?;

    debug!("Picked idea '{choice}' for chat {chat_id}");
    Ok(choice)
}

/// Generates the satirical quip for a freshly recorded expense.
pub async fn generate_commentary(
    client: &reqwest::Client,
    settings: &Settings,
    total_all_time: f64,
    last_amount: f64,
    last_category: &str,
    style: CommentaryStyle,
    idea: &str,
) -> GenOutcome<String> {
    let config = GenerationConfig {
        temperature: Some(1.25),
        top_p: Some(0.95),
        top_k: Some(40),
        response_modalities: None,
    };
    let currency = &settings.default_currency;
    let prompt = format!(
        "Мы вдвоём ведём учёт трат. Используй ОБЩУЮ сумму за весь период для сравнений (не последнюю трату). \
         Последняя трата: {last_amount:.0} {currency} на '{last_category}'. \
         Общая сумма за весь период: {total_all_time:.0} {currency}. \
         Сгенерируй 1–2 очень коротких предложения, {tone}, без эмодзи. \
         Избегай дискриминации групп и прямых угроз, но допускай сарказм и жёсткость. \
         Упомяни предмет, который реально можно было бы купить на общую сумму: {idea}. \
         Формулируй свежо, не повторяйся.",
        tone = style.prompt_fragment(),
    );

    match generate_text(client, settings, prompt, config).await {
        Some(text) => GenOutcome::Generated(text),
        None => GenOutcome::Fallback(format!(
            "Жгите дальше в '{last_category}'. На {total_all_time:.0} {currency} уже взяли бы: {idea}."
        )),
    }
}

async fn load_recent(db: &DatabaseConnection, chat_id: i64) -> Result<Vec<String>> {
    let Some(raw) = ledger::get_state(db, chat_id, RECENT_ITEMS_KEY).await? else {
        return Ok(Vec::new());
    };
    // malformed persisted JSON reads as an empty list
    let items: Vec<String> = serde_json::from_str(&raw).unwrap_or_default();
    Ok(items.into_iter().take(RECENT_ITEMS_CAP).collect())
}

async fn save_recent(db: &DatabaseConnection, chat_id: i64, items: &[String]) -> Result<()> {
    let raw = serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string());
    ledger::set_state(db, chat_id, RECENT_ITEMS_KEY, &raw).await
}
