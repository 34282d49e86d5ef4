//! Alias table and category inference.
//!
//! The resolver merges two sources into one lowercase alias→category map: the
//! shipped category table first, then all persisted Category rows, so a
//! persisted alias wins on collision. Inference is deliberately first-match:
//! the category of the FIRST message token found in the map is returned,
//! scanning left to right - token order in the message decides the outcome,
//! not alias length or frequency.

use crate::config::categories::CategoryTable;
use crate::entities::{Category, CategoryColumn, category};
use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Category assigned when no message token matches any alias.
pub const DEFAULT_CATEGORY: &str = "прочее";

// \w is Unicode-aware in the regex crate, so Cyrillic tokens match too.
#[allow(clippy::expect_used)]
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("word regex is valid"));

/// Lowercase alias → category name lookup, built from the shipped table plus
/// persisted Category rows.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    map: HashMap<String, String>,
}

impl AliasMap {
    fn insert(&mut self, alias: &str, category: &str) {
        let key = alias.trim().to_lowercase();
        if !key.is_empty() {
            self.map.insert(key, category.to_string());
        }
    }

    /// Returns the category the given token resolves to, if any.
    #[must_use]
    pub fn category_for(&self, token: &str) -> Option<&str> {
        self.map.get(&token.trim().to_lowercase()).map(String::as_str)
    }
}

/// Builds the merged alias map. Shipped entries go in first, persisted rows
/// overlay them, so a runtime category can repoint an alias.
#[must_use]
pub fn build_alias_map(table: &CategoryTable, persisted: &[category::Model]) -> AliasMap {
    let mut aliases = AliasMap::default();
    for entry in &table.categories {
        aliases.insert(&entry.name, &entry.name);
        for alias in &entry.aliases {
            aliases.insert(alias, &entry.name);
        }
    }
    for row in persisted {
        aliases.insert(&row.name, &row.name);
        if let Some(list) = &row.aliases {
            for alias in list.split('|') {
                aliases.insert(alias, &row.name);
            }
        }
    }
    aliases
}

/// Loads all persisted categories and builds the merged alias map.
pub async fn load_alias_map(db: &DatabaseConnection, table: &CategoryTable) -> Result<AliasMap> {
    let persisted = Category::find().all(db).await?;
    Ok(build_alias_map(table, &persisted))
}

/// Infers a category from the residual note text (amount already stripped).
///
/// First token present in the map wins; no match falls back to
/// [`DEFAULT_CATEGORY`].
#[must_use]
pub fn guess_category(rest_text: &str, aliases: &AliasMap) -> String {
    for token in WORD_RE.find_iter(rest_text) {
        if let Some(category) = aliases.category_for(token.as_str()) {
            return category.to_string();
        }
    }
    DEFAULT_CATEGORY.to_string()
}

/// Outcome of an additive alias merge.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AliasAppendOutcome {
    /// Aliases newly bound to the category
    pub added: Vec<String>,
    /// Aliases refused because they already belong to another category
    pub rejected: Vec<String>,
}

/// Replaces a category's entire alias list.
///
/// The list is trimmed, deduplicated, and sorted; an empty result is stored
/// as NULL. Creates the category row if it does not exist yet.
pub async fn replace_category(
    db: &DatabaseConnection,
    name: &str,
    aliases: &[String],
) -> Result<category::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Category name cannot be empty".to_string(),
        });
    }

    let alias_str = join_aliases(aliases.iter().map(String::as_str));

    let txn = db.begin().await?;
    let existing = Category::find()
        .filter(CategoryColumn::Name.eq(name))
        .one(&txn)
        .await?;

    let model = match existing {
        Some(model) => {
            let mut active = model.into_active_model();
            active.aliases = Set(alias_str);
            active.update(&txn).await?
        }
        None => {
            category::ActiveModel {
                name: Set(name.to_string()),
                aliases: Set(alias_str),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        }
    };
    txn.commit().await?;

    info!("Replaced alias list for category '{name}'");
    Ok(model)
}

/// Merges new aliases into a category's set.
///
/// An alias already resolving to a DIFFERENT category (via the merged
/// shipped + persisted map) is rejected - alias uniqueness is cross-category.
/// Aliases already on the same category are kept silently. Creates the
/// category row if it does not exist yet.
pub async fn append_aliases(
    db: &DatabaseConnection,
    table: &CategoryTable,
    name: &str,
    aliases: &[String],
) -> Result<AliasAppendOutcome> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Category name cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;
    let persisted = Category::find().all(&txn).await?;
    let merged = build_alias_map(table, &persisted);
    let existing = persisted.into_iter().find(|c| c.name == name);

    let mut current: BTreeSet<String> = existing
        .as_ref()
        .and_then(|c| c.aliases.as_deref())
        .map(|list| {
            list.split('|')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut outcome = AliasAppendOutcome::default();
    for alias in aliases {
        let alias = alias.trim();
        if alias.is_empty() {
            continue;
        }
        match merged.category_for(alias) {
            Some(owner) if owner != name => outcome.rejected.push(alias.to_string()),
            Some(_) => {
                // already resolves to this category, keep silently
                current.insert(alias.to_string());
            }
            None => {
                if current.insert(alias.to_string()) {
                    outcome.added.push(alias.to_string());
                }
            }
        }
    }

    let alias_str = if current.is_empty() {
        None
    } else {
        Some(current.iter().map(String::as_str).collect::<Vec<_>>().join("|"))
    };

    match existing {
        Some(model) => {
            let mut active = model.into_active_model();
            active.aliases = Set(alias_str);
            active.update(&txn).await?;
        }
        None => {
            category::ActiveModel {
                name: Set(name.to_string()),
                aliases: Set(alias_str),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }
    txn.commit().await?;

    info!(
        "Appended aliases to category '{name}': {} added, {} rejected",
        outcome.added.len(),
        outcome.rejected.len()
    );
    Ok(outcome)
}

/// Merged category listing for display: shipped entries overlaid by
/// persisted rows of the same name, persisted-only categories included,
/// sorted by name.
pub async fn list_categories(
    db: &DatabaseConnection,
    table: &CategoryTable,
) -> Result<Vec<(String, Vec<String>)>> {
    let mut merged: std::collections::BTreeMap<String, Vec<String>> = table
        .categories
        .iter()
        .map(|entry| (entry.name.clone(), entry.aliases.clone()))
        .collect();
    for row in Category::find().all(db).await? {
        let aliases = row
            .aliases
            .as_deref()
            .map(|list| {
                list.split('|')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();
        merged.insert(row.name, aliases);
    }
    Ok(merged.into_iter().collect())
}

fn join_aliases<'a, I: Iterator<Item = &'a str>>(aliases: I) -> Option<String> {
    let set: BTreeSet<&str> = aliases.map(str::trim).filter(|a| !a.is_empty()).collect();
    if set.is_empty() {
        None
    } else {
        Some(set.into_iter().collect::<Vec<_>>().join("|"))
    }
}
