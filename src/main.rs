#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    landlord_api::server::init_tracing();

    let config = landlord_api::config::config();
    tracing::info!(
        environment = ?config.environment,
        store = ?config.database.backend,
        "Starting Landlord API"
    );

    landlord_api::server::serve(config).await
}
