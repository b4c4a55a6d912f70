use clap::Args;

use crate::cli::OutputFormat;
use crate::config::{AppConfig, StoreBackend};
use crate::repository::Repository;
use crate::server::connect_store;
use crate::services::DashboardService;

#[derive(Args)]
pub struct StatsArgs {
    #[arg(long, help = "Owner user id")]
    pub user: String,
}

pub async fn handle(args: StatsArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    if config.database.backend == StoreBackend::Memory {
        tracing::warn!("memory store is empty outside a running server; figures will be zero");
    }

    let store = connect_store(config).await?;
    let dashboard = DashboardService::new(Repository::new(store));
    let stats = dashboard.stats(&args.user).await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            println!("Properties:          {}", stats.total_properties);
            println!("  occupied:          {}", stats.occupied_properties);
            println!("  vacant:            {}", stats.vacant_properties);
            println!("Occupancy:           {}%", stats.occupancy_rate);
            println!("Monthly rent:        {}", stats.total_monthly_rent);
            println!("Pending maintenance: {}", stats.pending_maintenance);
        }
    }
    Ok(())
}
