// lease.rs - lease status derivation shared by the tenant endpoints

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::database::models::Tenant;

/// Leases ending within this many days count as expiring soon
pub const EXPIRING_SOON_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeaseStatus {
    NoLease,
    Expired,
    ExpiringSoon,
    Active,
}

/// Classify a lease end date relative to `now`. The window is inclusive:
/// a lease ending exactly 30 days out is already expiring soon.
pub fn classify(lease_end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> LeaseStatus {
    match lease_end {
        None => LeaseStatus::NoLease,
        Some(end) if end < now => LeaseStatus::Expired,
        Some(end) if end <= now + Duration::days(EXPIRING_SOON_DAYS) => LeaseStatus::ExpiringSoon,
        Some(_) => LeaseStatus::Active,
    }
}

/// A tenant as returned by the API, with its derived lease status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeasedTenant {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub lease_status: LeaseStatus,
}

impl LeasedTenant {
    pub fn at(tenant: Tenant, now: DateTime<Utc>) -> Self {
        let lease_status = classify(tenant.lease_end, now);
        Self { tenant, lease_status }
    }

    pub fn all(tenants: Vec<Tenant>, now: DateTime<Utc>) -> Vec<Self> {
        tenants.into_iter().map(|t| Self::at(t, now)).collect()
    }
}

/// Tenants whose lease needs attention
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseAlerts {
    pub expired: Vec<LeasedTenant>,
    pub expiring_soon: Vec<LeasedTenant>,
}

impl LeaseAlerts {
    pub fn collect(tenants: Vec<Tenant>, now: DateTime<Utc>) -> Self {
        let mut alerts = Self::default();
        for tenant in LeasedTenant::all(tenants, now) {
            match tenant.lease_status {
                LeaseStatus::Expired => alerts.expired.push(tenant),
                LeaseStatus::ExpiringSoon => alerts.expiring_soon.push(tenant),
                LeaseStatus::NoLease | LeaseStatus::Active => {}
            }
        }
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewTenant;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn classifies_relative_to_now() {
        let now = date(2024, 6, 1);
        assert_eq!(classify(Some(date(2024, 6, 15)), now), LeaseStatus::ExpiringSoon);
        assert_eq!(classify(Some(date(2024, 5, 1)), now), LeaseStatus::Expired);
        assert_eq!(classify(Some(date(2024, 9, 1)), now), LeaseStatus::Active);
        assert_eq!(classify(None, now), LeaseStatus::NoLease);
    }

    #[test]
    fn window_edges() {
        let now = date(2024, 6, 1);
        assert_eq!(classify(Some(now), now), LeaseStatus::ExpiringSoon);
        assert_eq!(classify(Some(date(2024, 7, 1)), now), LeaseStatus::ExpiringSoon);
        assert_eq!(classify(Some(date(2024, 7, 2)), now), LeaseStatus::Active);
    }

    #[test]
    fn serializes_flat_with_kebab_status() {
        let mut tenant = NewTenant::new(1, "Ada", "Lovelace", "ada@example.com").into_tenant(7, date(2024, 1, 1));
        tenant.lease_end = Some(date(2024, 5, 1));
        let value = serde_json::to_value(LeasedTenant::at(tenant, date(2024, 6, 1))).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["leaseStatus"], "expired");
    }

    #[test]
    fn alerts_skip_active_and_unleased() {
        let now = date(2024, 6, 1);
        let tenants = [None, Some(date(2024, 5, 1)), Some(date(2024, 6, 20)), Some(date(2025, 1, 1))]
            .into_iter()
            .enumerate()
            .map(|(i, end)| {
                let mut t = NewTenant::new(1, "T", "T", "t@example.com").into_tenant(i as i32 + 1, now);
                t.lease_end = end;
                t
            })
            .collect();
        let alerts = LeaseAlerts::collect(tenants, now);
        assert_eq!(alerts.expired.len(), 1);
        assert_eq!(alerts.expiring_soon.len(), 1);
        assert_eq!(alerts.expiring_soon[0].tenant.id, 3);
    }
}
