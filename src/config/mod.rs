/// Built-in category table loading from config.toml
pub mod categories;

/// Database connection and table creation
pub mod database;

/// Environment-variable settings loaded once at startup
pub mod settings;
