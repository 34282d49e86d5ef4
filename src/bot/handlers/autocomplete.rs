//! Autocomplete handlers for Discord slash command parameters.

use crate::bot::{BotData, Context};
use crate::core::aliases;

/// Provides autocomplete suggestions for category names.
///
/// Merges the shipped table with persisted categories, filters by the
/// partial input (case-insensitive), and returns up to 25 names sorted
/// alphabetically.
pub async fn autocomplete_category_name(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let data: &BotData = ctx.data();

    let Ok(listing) = aliases::list_categories(&data.database, &data.categories).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    listing
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(25) // Discord autocomplete limit
        .collect()
}
