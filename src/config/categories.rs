//! Built-in category table loading from config.toml
//!
//! The shipped `config.toml` defines the fixed category→alias table the
//! resolver starts from; persisted Category rows overlay it at runtime. The
//! file is compiled into the binary so a bare deployment works without any
//! files on disk; `CATEGORIES_CONFIG` can point at a replacement table.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// The category table compiled into the binary.
static EMBEDDED_TABLE: &str = include_str!("../../config.toml");

/// Configuration structure representing the category table file
#[derive(Debug, Deserialize)]
pub struct CategoryTable {
    /// Category entries in declaration order
    pub categories: Vec<CategoryEntry>,
}

/// One category and the alias tokens that resolve to it
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryEntry {
    /// Canonical category name
    pub name: String,
    /// Alias tokens (the name itself always resolves too)
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Loads a category table from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or required fields are missing.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<CategoryTable> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read category table: {e}"),
    })?;

    parse_table(&contents)
}

/// Returns the category table compiled into the binary.
pub fn embedded_table() -> Result<CategoryTable> {
    parse_table(EMBEDDED_TABLE)
}

/// Loads the table from the configured override path, or the embedded default.
pub fn load(settings: &crate::config::settings::Settings) -> Result<CategoryTable> {
    match &settings.categories_config {
        Some(path) => load_table(path),
        None => embedded_table(),
    }
}

fn parse_table(contents: &str) -> Result<CategoryTable> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse category table: {e}"),
    })
}
