//! `Tratabot` - a Discord bot that keeps a group spending ledger
//!
//! Free-text messages like "1500 алкоголь бар" are parsed into expenses
//! (amount, currency, category, note), recorded in SQLite, and answered with
//! aggregate statistics plus a satirical quip and banner image produced by a
//! generative-model provider, with deterministic local fallbacks when the
//! provider misbehaves.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    clippy::all,
    clippy::pedantic,

    // Performance
    clippy::inefficient_to_string,
    clippy::needless_pass_by_value,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Discord bot interface - commands, handlers, and bot context
pub mod bot;
/// Configuration management - settings, category table, database setup
pub mod config;
/// Core business logic - parsing, categorization, ledger, statistics
pub mod core;
/// SeaORM entity definitions for database tables
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Generative provider adapters - commentary text and banner images
pub mod r#gen;
/// Process-lifetime session state (chat styles, wishlist prompts)
pub mod session;

#[cfg(test)]
pub mod test_utils;
