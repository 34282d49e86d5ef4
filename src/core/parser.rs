//! Message-to-expense composition.
//!
//! Pure over its inputs: the same text and alias map always produce the same
//! result, and nothing here touches the database or any other state.

use crate::core::aliases::{self, AliasMap};
use crate::core::amount;

/// A free-text message successfully parsed into a structured expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedExpense {
    /// Extracted amount
    pub amount: f64,
    /// Normalized currency symbol
    pub currency: String,
    /// Resolved category (never empty)
    pub category: String,
    /// Trimmed residual text, `None` when nothing remains
    pub note: Option<String>,
}

/// Parses a chat message into an expense.
///
/// Returns `None` when no amount is found - the message is not an expense
/// and the caller should silently ignore it. Otherwise the first amount
/// match is stripped from the text, the category is inferred from the
/// remainder, and the trimmed remainder becomes the note.
#[must_use]
pub fn parse_message(text: &str, aliases: &AliasMap) -> Option<ParsedExpense> {
    let parsed = amount::parse_amount(text)?;
    let rest = amount::strip_first_amount(text);
    let category = aliases::guess_category(&rest, aliases);
    let note = {
        let trimmed = rest.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };
    Some(ParsedExpense {
        amount: parsed.amount,
        currency: parsed.currency,
        category,
        note,
    })
}
