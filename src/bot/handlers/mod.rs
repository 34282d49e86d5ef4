//! Discord event handlers - the free-text expense flow and autocomplete.

/// Autocomplete suggestions for command parameters
pub mod autocomplete;
/// Free-text message handler (expense capture, wishlist capture)
pub mod message;
