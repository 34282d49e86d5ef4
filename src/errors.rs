//! Unified error type for the crate.
//!
//! Provider (text/image generation) failures are deliberately NOT represented
//! here: those are ordinary control flow routed through
//! [`crate::gen::GenOutcome`] so they can never bubble up to a chat reply.

use thiserror::Error;

/// Crate-wide error enum.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed startup configuration. Fatal at startup.
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description of what was wrong
        message: String,
    },

    /// Any error surfaced by the relational store.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// An expense amount that is non-positive or non-finite.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Referenced category does not exist.
    #[error("category '{name}' not found")]
    CategoryNotFound {
        /// The category name that was looked up
        name: String,
    },

    /// Image encode/decode failure while rendering the local placeholder.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error (category table file, attachment plumbing).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing environment variable read outside the settings loader.
    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error, boxed to keep the enum small.
    #[error("framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
