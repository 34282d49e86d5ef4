//! Amount and currency extraction from free text.
//!
//! The first numeric substring (integer with an optional 1-2 digit decimal
//! part, comma or dot) wins; anything after it is ignored here. The match is
//! attempted on a whitespace-stripped copy first so "1 500 пиво" parses as
//! 1500, falling back to the original text when the stripped pass finds
//! nothing. A currency token directly after the number is normalized:
//! `r`/`rub`/`р`/`руб` become the canonical `₽`, other recognized glyphs
//! pass through, absence defaults to `₽`.

use crate::config::settings::DEFAULT_CURRENCY;
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?P<amount>[0-9]+(?:[.,][0-9]{1,2})?)\s*(?P<currency>rub|руб|[₽рr$€])?")
        .expect("amount regex is valid")
});

/// A successfully extracted amount with its (normalized) currency.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAmount {
    /// The numeric amount, decimal comma already normalized
    pub amount: f64,
    /// Canonical or passed-through currency symbol
    pub currency: String,
}

/// Extracts the first amount (and optional currency) from `text`.
///
/// Returns `None` when the text contains no parsable number - the caller
/// treats that as "not an expense message".
#[must_use]
pub fn parse_amount(text: &str) -> Option<ParsedAmount> {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let (amount, currency) = match AMOUNT_RE.captures(&stripped) {
        Some(caps) => extract(&caps)?,
        None => extract(&AMOUNT_RE.captures(text)?)?,
    };
    Some(ParsedAmount { amount, currency })
}

/// Removes the first amount match (number plus trailing currency token, if
/// any) from the original text, so numbers never leak into category
/// inference or the stored note.
#[must_use]
pub fn strip_first_amount(text: &str) -> String {
    AMOUNT_RE.replacen(text, 1, " ").into_owned()
}

fn extract(caps: &regex::Captures<'_>) -> Option<(f64, String)> {
    let amount_str = caps.name("amount")?.as_str().replace(',', ".");
    let amount: f64 = amount_str.parse().ok()?;
    let currency = caps
        .name("currency")
        .map_or_else(|| DEFAULT_CURRENCY.to_string(), |m| normalize_currency(m.as_str()));
    Some((amount, currency))
}

fn normalize_currency(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "r" | "rub" | "р" | "руб" => DEFAULT_CURRENCY.to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_plain_amount_defaults_to_canonical_currency() {
        let parsed = parse_amount("1500 алкоголь бар").unwrap();
        assert_eq!(parsed.amount, 1500.0);
        assert_eq!(parsed.currency, "₽");
    }

    #[test]
    fn test_decimal_comma() {
        let parsed = parse_amount("250,50 кофе").unwrap();
        assert_eq!(parsed.amount, 250.5);
    }

    #[test]
    fn test_decimal_dot() {
        let parsed = parse_amount("99.99 суши").unwrap();
        assert_eq!(parsed.amount, 99.99);
    }

    #[test]
    fn test_currency_glyph_directly_after_number() {
        let parsed = parse_amount("300₽ такси").unwrap();
        assert_eq!(parsed.amount, 300.0);
        assert_eq!(parsed.currency, "₽");
    }

    #[test]
    fn test_ascii_aliases_normalize() {
        for text in ["300r", "300 rub", "300р", "300 руб"] {
            let parsed = parse_amount(text).unwrap();
            assert_eq!(parsed.currency, "₽", "input: {text}");
        }
    }

    #[test]
    fn test_foreign_currency_passes_through() {
        let parsed = parse_amount("20$ бургер").unwrap();
        assert_eq!(parsed.currency, "$");
        let parsed = parse_amount("15€").unwrap();
        assert_eq!(parsed.currency, "€");
    }

    #[test]
    fn test_no_number_is_not_an_amount() {
        assert!(parse_amount("привет").is_none());
        assert!(parse_amount("").is_none());
        assert!(parse_amount("бар без цифр").is_none());
    }

    #[test]
    fn test_whitespace_inside_number() {
        // the stripped pass glues "1 500" together
        let parsed = parse_amount("1 500 пиво").unwrap();
        assert_eq!(parsed.amount, 1500.0);
    }

    #[test]
    fn test_first_of_multiple_numbers_wins() {
        let parsed = parse_amount("100 пиво 200 вино").unwrap();
        assert_eq!(parsed.amount, 100.0);
    }

    #[test]
    fn test_strip_first_amount() {
        let rest = strip_first_amount("1500 алкоголь бар");
        assert_eq!(rest.trim(), "алкоголь бар");
    }

    #[test]
    fn test_strip_removes_currency_token_too() {
        let rest = strip_first_amount("300₽ такси домой");
        assert_eq!(rest.trim(), "такси домой");
    }

    #[test]
    fn test_strip_only_first_match() {
        let rest = strip_first_amount("100 пиво 200");
        assert_eq!(rest.trim(), "пиво 200");
    }
}
