// services/dashboard.rs - per-owner summary statistics, computed fresh on every call

use rust_decimal::Decimal;
use serde::Serialize;

use crate::database::models::{Property, PropertyStatus};
use crate::repository::{RepoResult, Repository};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_properties: i64,
    pub occupied_properties: i64,
    pub vacant_properties: i64,
    /// Rounded percentage of properties that are occupied; 0 with no properties
    pub occupancy_rate: i64,
    /// Sum of listed rent across all properties, regardless of status
    pub total_monthly_rent: Decimal,
    pub pending_maintenance: i64,
}

impl DashboardStats {
    /// Property-derived figures; `pending_maintenance` is filled in separately
    pub fn from_properties(properties: &[Property]) -> Self {
        let count = |status| properties.iter().filter(|p| p.status == status).count() as i64;
        let total = properties.len() as i64;
        let occupied = count(PropertyStatus::Occupied);

        Self {
            total_properties: total,
            occupied_properties: occupied,
            vacant_properties: count(PropertyStatus::Vacant),
            occupancy_rate: occupancy_rate(occupied, total),
            total_monthly_rent: properties.iter().map(|p| p.rent_amount).sum(),
            pending_maintenance: 0,
        }
    }
}

/// Round-half-up integer percentage
fn occupancy_rate(occupied: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    (occupied * 200 + total) / (total * 2)
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// One property listing plus one batched pending-maintenance count
    pub async fn stats(&self, owner_id: &str) -> RepoResult<DashboardStats> {
        let properties = self.repository.list_properties(owner_id).await?;
        let mut stats = DashboardStats::from_properties(&properties);
        stats.pending_maintenance = self.repository.count_pending_maintenance(owner_id).await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_rounds_half_up() {
        assert_eq!(occupancy_rate(0, 0), 0);
        assert_eq!(occupancy_rate(1, 3), 33);
        assert_eq!(occupancy_rate(2, 3), 67);
        assert_eq!(occupancy_rate(1, 8), 13);
        assert_eq!(occupancy_rate(4, 4), 100);
    }

    #[test]
    fn stats_serialize_rent_as_exact_string() {
        let stats = DashboardStats::from_properties(&[]);
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["totalMonthlyRent"], "0");
        assert_eq!(value["occupancyRate"], 0);
    }
}
