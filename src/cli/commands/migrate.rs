use anyhow::bail;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::{AppConfig, StoreBackend};
use crate::database::{schema, DatabaseManager};

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    if config.database.backend != StoreBackend::Postgres {
        bail!("migrate needs the postgres store; set DATABASE_URL or STORE_BACKEND=postgres");
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    let applied = schema::run_migrations(&pool).await?;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "applied": applied })),
        OutputFormat::Text if applied == 0 => println!("Schema is up to date"),
        OutputFormat::Text => println!("Applied {} migration(s)", applied),
    }
    Ok(())
}
