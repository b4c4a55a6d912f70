use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{nullable, nullable_timestamp, timestamp, FieldErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: i32,
    /// Nullable in the schema; a tenant without a property has no owner and is unreachable
    pub property_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub emergency_contact: Option<Value>,
    pub lease_start: Option<DateTime<Utc>>,
    pub lease_end: Option<DateTime<Utc>>,
    pub rent_amount: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    #[serde(default)]
    pub property_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<Value>,
    #[serde(default, deserialize_with = "timestamp")]
    pub lease_start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub lease_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rent_amount: Option<Decimal>,
    #[serde(default)]
    pub deposit_amount: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewTenant {
    pub fn new(
        property_id: i32,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            property_id: Some(property_id),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            emergency_contact: None,
            lease_start: None,
            lease_end: None,
            rent_amount: None,
            deposit_amount: None,
            is_active: true,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.property_id.is_none() {
            errors.add("propertyId", "This field is required");
        }
        errors.require_text("firstName", &self.first_name, 100);
        errors.require_text("lastName", &self.last_name, 100);
        check_email(&mut errors, &self.email);
        if let Some(phone) = &self.phone {
            errors.max_len("phone", phone, 20);
        }
        check_lease(&mut errors, self.lease_start, self.lease_end);
        if let Some(rent) = self.rent_amount {
            errors.money("rentAmount", rent);
        }
        if let Some(deposit) = self.deposit_amount {
            errors.money("depositAmount", deposit);
        }
        errors.into_result()
    }

    pub fn into_tenant(self, id: i32, now: DateTime<Utc>) -> Tenant {
        Tenant {
            id,
            property_id: self.property_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            emergency_contact: self.emergency_contact,
            lease_start: self.lease_start,
            lease_end: self.lease_end,
            rent_amount: self.rent_amount,
            deposit_amount: self.deposit_amount,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    errors.require_text("email", email, 255);
    let trimmed = email.trim();
    if !trimmed.is_empty() && !trimmed.contains('@') {
        errors.add("email", "Must be a valid email address");
    }
}

fn check_lease(errors: &mut FieldErrors, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.add("leaseEnd", "Lease end must not be before lease start");
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantPatch {
    /// `null` is rejected by validation: clearing it would orphan the tenant
    #[serde(default, deserialize_with = "nullable")]
    pub property_id: Option<Option<i32>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub emergency_contact: Option<Option<Value>>,
    #[serde(default, deserialize_with = "nullable_timestamp")]
    pub lease_start: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable_timestamp")]
    pub lease_end: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    pub rent_amount: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    pub deposit_amount: Option<Option<Decimal>>,
    pub is_active: Option<bool>,
}

impl TenantPatch {
    /// Validates the patch against the row it will be merged into, so lease
    /// ordering is checked on the effective start/end pair.
    pub fn validate(&self, existing: &Tenant) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.property_id == Some(None) {
            errors.add("propertyId", "A tenant cannot be detached from its property");
        }
        if let Some(first_name) = &self.first_name {
            errors.require_text("firstName", first_name, 100);
        }
        if let Some(last_name) = &self.last_name {
            errors.require_text("lastName", last_name, 100);
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, email);
        }
        if let Some(Some(phone)) = &self.phone {
            errors.max_len("phone", phone, 20);
        }
        let start = self.lease_start.unwrap_or(existing.lease_start);
        let end = self.lease_end.unwrap_or(existing.lease_end);
        check_lease(&mut errors, start, end);
        if let Some(Some(rent)) = self.rent_amount {
            errors.money("rentAmount", rent);
        }
        if let Some(Some(deposit)) = self.deposit_amount {
            errors.money("depositAmount", deposit);
        }
        errors.into_result()
    }

    /// The property this patch moves the tenant to, if any
    pub fn new_property_id(&self) -> Option<i32> {
        self.property_id.flatten()
    }

    pub fn apply_to(self, tenant: &mut Tenant, now: DateTime<Utc>) {
        if let Some(v) = self.property_id { tenant.property_id = v; }
        if let Some(v) = self.first_name { tenant.first_name = v; }
        if let Some(v) = self.last_name { tenant.last_name = v; }
        if let Some(v) = self.email { tenant.email = v; }
        if let Some(v) = self.phone { tenant.phone = v; }
        if let Some(v) = self.emergency_contact { tenant.emergency_contact = v; }
        if let Some(v) = self.lease_start { tenant.lease_start = v; }
        if let Some(v) = self.lease_end { tenant.lease_end = v; }
        if let Some(v) = self.rent_amount { tenant.rent_amount = v; }
        if let Some(v) = self.deposit_amount { tenant.deposit_amount = v; }
        if let Some(v) = self.is_active { tenant.is_active = v; }
        tenant.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_property_is_a_validation_error() {
        let input: NewTenant = serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com"
        }))
        .unwrap();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.get("propertyId"), Some("This field is required"));
    }

    #[test]
    fn lease_end_before_start_is_rejected() {
        let input: NewTenant = serde_json::from_value(json!({
            "propertyId": 4,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "leaseStart": "2024-06-01",
            "leaseEnd": "2024-05-01"
        }))
        .unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.get("leaseEnd").is_some());
    }

    #[test]
    fn patch_cannot_detach_property() {
        let existing = NewTenant::new(1, "Ada", "Lovelace", "ada@example.com").into_tenant(1, Utc::now());
        let patch: TenantPatch = serde_json::from_value(json!({ "propertyId": null })).unwrap();
        let errors = patch.validate(&existing).unwrap_err();
        assert!(errors.get("propertyId").is_some());

        let patch: TenantPatch = serde_json::from_value(json!({ "email": "not-an-email" })).unwrap();
        assert_eq!(
            patch.validate(&existing).unwrap_err().get("email"),
            Some("Must be a valid email address")
        );
    }
}
