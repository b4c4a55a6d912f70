use anyhow::Result;
use landlord_api::database::models::{
    MaintenanceStatus, NewMaintenanceRequest, NewProperty, PropertyStatus,
};
use landlord_api::repository::Repository;
use landlord_api::services::DashboardService;
use rust_decimal::Decimal;
use std::str::FromStr;

const OWNER: &str = "landlord-a";

fn property(name: &str, rent: &str, status: PropertyStatus) -> NewProperty {
    NewProperty::new(name, "1 Main St", "Nanaimo", "V9R 1A1", "condo", Decimal::from_str(rent).unwrap())
        .with_status(status)
}

#[tokio::test]
async fn rent_is_an_exact_sum_across_statuses() -> Result<()> {
    let repo = Repository::in_memory();
    repo.create_property(OWNER, property("A", "1000.00", PropertyStatus::Occupied)).await?;
    repo.create_property(OWNER, property("B", "2500.50", PropertyStatus::Maintenance)).await?;

    let stats = DashboardService::new(repo).stats(OWNER).await?;
    assert_eq!(stats.total_monthly_rent, Decimal::from_str("3500.50")?);
    assert_eq!(stats.total_monthly_rent.to_string(), "3500.50");
    assert_eq!(stats.total_properties, 2);
    Ok(())
}

#[tokio::test]
async fn occupied_counts_only_occupied_status() -> Result<()> {
    let repo = Repository::in_memory();
    repo.create_property(OWNER, property("A", "100", PropertyStatus::Occupied)).await?;
    repo.create_property(OWNER, property("B", "100", PropertyStatus::Occupied)).await?;
    repo.create_property(OWNER, property("C", "100", PropertyStatus::Vacant)).await?;
    repo.create_property(OWNER, property("D", "100", PropertyStatus::Maintenance)).await?;
    repo.create_property("someone-else", property("E", "100", PropertyStatus::Occupied)).await?;

    let stats = DashboardService::new(repo).stats(OWNER).await?;
    assert_eq!(stats.total_properties, 4);
    assert_eq!(stats.occupied_properties, 2);
    assert_eq!(stats.vacant_properties, 1);
    assert_eq!(stats.occupancy_rate, 50);
    Ok(())
}

#[tokio::test]
async fn pending_maintenance_spans_all_owned_properties() -> Result<()> {
    let repo = Repository::in_memory();
    let a = repo.create_property(OWNER, property("A", "100", PropertyStatus::Occupied)).await?;
    let b = repo.create_property(OWNER, property("B", "100", PropertyStatus::Vacant)).await?;
    let foreign = repo
        .create_property("someone-else", property("C", "100", PropertyStatus::Vacant))
        .await?;

    repo.create_maintenance(OWNER, NewMaintenanceRequest::new(a.id, "Leak", "Drip", "plumbing"))
        .await?;
    repo.create_maintenance(OWNER, NewMaintenanceRequest::new(b.id, "Door", "Sticks", "general"))
        .await?;
    repo.create_maintenance(
        OWNER,
        NewMaintenanceRequest::new(b.id, "Paint", "Peeling", "general")
            .with_status(MaintenanceStatus::Completed),
    )
    .await?;
    repo.create_maintenance(
        "someone-else",
        NewMaintenanceRequest::new(foreign.id, "Roof", "Leaks", "roofing"),
    )
    .await?;

    let stats = DashboardService::new(repo).stats(OWNER).await?;
    assert_eq!(stats.pending_maintenance, 2);
    Ok(())
}

#[tokio::test]
async fn empty_owner_gets_zeroes() -> Result<()> {
    let stats = DashboardService::new(Repository::in_memory()).stats(OWNER).await?;
    assert_eq!(stats.total_properties, 0);
    assert_eq!(stats.occupancy_rate, 0);
    assert_eq!(stats.total_monthly_rent, Decimal::ZERO);
    assert_eq!(stats.pending_maintenance, 0);
    Ok(())
}
