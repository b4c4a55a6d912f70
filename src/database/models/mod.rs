pub mod maintenance;
pub mod property;
pub mod tenant;
pub mod transaction;
pub mod user;

pub use maintenance::{
    MaintenancePatch, MaintenancePriority, MaintenanceRequest, MaintenanceStatus, NewMaintenanceRequest,
};
pub use property::{NewProperty, Property, PropertyPatch, PropertyStatus};
pub use tenant::{NewTenant, Tenant, TenantPatch};
pub use transaction::{NewTransaction, Transaction, TransactionPatch, TransactionType};
pub use user::{UpsertUser, User};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use thiserror::Error;

/// Raised when a stored enum column holds a value outside its variant set
#[derive(Debug, Error)]
#[error("invalid {kind} value '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Per-field validation messages, keyed by the camelCase field name the client sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// First message per field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn into_inner(self) -> HashMap<String, String> {
        self.0
    }

    pub(crate) fn require_text(&mut self, field: &str, value: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.add(field, "This field is required");
        } else {
            self.max_len(field, value, max_len);
        }
    }

    pub(crate) fn max_len(&mut self, field: &str, value: &str, max_len: usize) {
        if value.chars().count() > max_len {
            self.add(field, format!("Must be at most {} characters", max_len));
        }
    }

    pub(crate) fn non_negative(&mut self, field: &str, value: Decimal) {
        if value.is_sign_negative() && !value.is_zero() {
            self.add(field, "Must not be negative");
        }
    }

    /// NUMERIC(10,2) columns: at most two fractional digits and eight integral ones
    pub(crate) fn money(&mut self, field: &str, value: Decimal) {
        self.non_negative(field, value);
        if value.normalize().scale() > 2 {
            self.add(field, "Must have at most 2 decimal places");
        } else if value >= Decimal::new(100_000_000, 0) {
            self.add(field, "Must be less than 100000000");
        }
    }
}

/// Distinguishes an absent key (no change) from an explicit null (clear the column)
/// on partial updates. Use with `#[serde(default, deserialize_with = "nullable")]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC)
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw))),
    }
}

pub(crate) fn nullable_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    timestamp(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_and_plain_dates() {
        let full = parse_timestamp("2024-06-15T12:30:00Z").unwrap();
        assert_eq!(full.to_rfc3339(), "2024-06-15T12:30:00+00:00");

        let date = parse_timestamp("2024-06-15").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-06-15T00:00:00+00:00");

        assert!(parse_timestamp("15/06/2024").is_none());
    }

    #[test]
    fn money_rules() {
        let mut errors = FieldErrors::new();
        errors.money("rentAmount", Decimal::new(-1, 2));
        errors.money("depositAmount", Decimal::new(12345, 3));
        errors.money("amount", Decimal::new(250050, 2));
        assert_eq!(errors.get("rentAmount"), Some("Must not be negative"));
        assert_eq!(errors.get("depositAmount"), Some("Must have at most 2 decimal places"));
        assert!(errors.get("amount").is_none());
    }

    #[test]
    fn first_message_per_field_is_kept() {
        let mut errors = FieldErrors::new();
        errors.add("name", "first");
        errors.add("name", "second");
        assert_eq!(errors.get("name"), Some("first"));
        assert!(errors.into_result().is_err());
    }
}
