use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tratabot::bot::{self, BotData};
use tratabot::config::{categories, database, settings::Settings};
use tratabot::errors::{Error, Result};
use tratabot::session::SessionState;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the application settings; any malformed value is fatal here
    let settings = Settings::load_from_env()
        .inspect(|_| info!("Successfully processed application configuration."))
        .inspect_err(|e| error!("Critical error loading configuration: {e}"))?;

    // 4. Load the category table (embedded default or override file)
    let category_table = categories::load(&settings)
        .inspect(|t| info!("Loaded category table with {} entries.", t.categories.len()))
        .inspect_err(|e| error!("Failed to load category table: {e}"))?;

    // 5. Initialize the database
    let db = database::create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;

    // 6. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in settings
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    let data = BotData {
        database: db,
        settings: Arc::new(settings),
        http: reqwest::Client::new(),
        session: SessionState::new(),
        categories: category_table,
    };

    bot::run_bot(token, data).await
}
