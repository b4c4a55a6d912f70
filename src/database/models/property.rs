use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{nullable, nullable_timestamp, timestamp, FieldErrors, ParseEnumError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Vacant,
    Occupied,
    Maintenance,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Vacant => "vacant",
            PropertyStatus::Occupied => "occupied",
            PropertyStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vacant" => Ok(PropertyStatus::Vacant),
            "occupied" => Ok(PropertyStatus::Occupied),
            "maintenance" => Ok(PropertyStatus::Maintenance),
            other => Err(ParseEnumError { kind: "property status", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i32,
    pub user_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub property_type: String,
    pub bedrooms: i32,
    pub bathrooms: Decimal,
    pub square_footage: Option<i32>,
    pub rent_amount: Decimal,
    pub status: PropertyStatus,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub pet_policy: String,
    pub smoking_policy: String,
    pub available_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_province() -> String {
    "BC".to_string()
}

fn default_bathrooms() -> Decimal {
    Decimal::ONE
}

fn default_pet_policy() -> String {
    "no_pets".to_string()
}

fn default_smoking_policy() -> String {
    "no_smoking".to_string()
}

fn default_true() -> bool {
    true
}

/// Insert payload. No owner field: the owner is always the authenticated caller,
/// and unknown keys such as `userId` are dropped by serde.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(default = "default_province")]
    pub province: String,
    pub postal_code: String,
    pub property_type: String,
    #[serde(default)]
    pub bedrooms: i32,
    #[serde(default = "default_bathrooms")]
    pub bathrooms: Decimal,
    #[serde(default)]
    pub square_footage: Option<i32>,
    pub rent_amount: Decimal,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default = "default_pet_policy")]
    pub pet_policy: String,
    #[serde(default = "default_smoking_policy")]
    pub smoking_policy: String,
    #[serde(default, deserialize_with = "timestamp")]
    pub available_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewProperty {
    /// Minimal payload with schema defaults for everything optional
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        property_type: impl Into<String>,
        rent_amount: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            city: city.into(),
            province: default_province(),
            postal_code: postal_code.into(),
            property_type: property_type.into(),
            bedrooms: 0,
            bathrooms: default_bathrooms(),
            square_footage: None,
            rent_amount,
            status: PropertyStatus::default(),
            description: None,
            images: Vec::new(),
            amenities: Vec::new(),
            pet_policy: default_pet_policy(),
            smoking_policy: default_smoking_policy(),
            available_date: None,
            is_active: true,
        }
    }

    pub fn with_status(mut self, status: PropertyStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 255);
        errors.require_text("address", &self.address, 2000);
        errors.require_text("city", &self.city, 100);
        errors.max_len("province", &self.province, 10);
        errors.require_text("postalCode", &self.postal_code, 10);
        errors.require_text("propertyType", &self.property_type, 50);
        errors.max_len("petPolicy", &self.pet_policy, 50);
        errors.max_len("smokingPolicy", &self.smoking_policy, 50);
        check_counts(&mut errors, Some(self.bedrooms), Some(self.bathrooms), self.square_footage);
        errors.money("rentAmount", self.rent_amount);
        errors.into_result()
    }

    /// Materialize the row an insert would produce; used by stores that assign ids themselves
    pub fn into_property(self, id: i32, user_id: &str, now: DateTime<Utc>) -> Property {
        Property {
            id,
            user_id: user_id.to_string(),
            name: self.name,
            address: self.address,
            city: self.city,
            province: self.province,
            postal_code: self.postal_code,
            property_type: self.property_type,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_footage: self.square_footage,
            rent_amount: self.rent_amount,
            status: self.status,
            description: self.description,
            images: self.images,
            amenities: self.amenities,
            pet_policy: self.pet_policy,
            smoking_policy: self.smoking_policy,
            available_date: self.available_date,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

fn check_counts(
    errors: &mut FieldErrors,
    bedrooms: Option<i32>,
    bathrooms: Option<Decimal>,
    square_footage: Option<i32>,
) {
    if bedrooms.is_some_and(|b| b < 0) {
        errors.add("bedrooms", "Must not be negative");
    }
    if let Some(bathrooms) = bathrooms {
        errors.non_negative("bathrooms", bathrooms);
        if bathrooms.normalize().scale() > 1 || bathrooms >= Decimal::new(100, 0) {
            errors.add("bathrooms", "Must be below 100 with at most 1 decimal place");
        }
    }
    if square_footage.is_some_and(|s| s < 0) {
        errors.add("squareFootage", "Must not be negative");
    }
}

/// Partial update. Absent keys leave the column untouched; nullable columns
/// accept an explicit `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    pub square_footage: Option<Option<i32>>,
    pub rent_amount: Option<Decimal>,
    pub status: Option<PropertyStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub images: Option<Vec<String>>,
    pub amenities: Option<Vec<String>>,
    pub pet_policy: Option<String>,
    pub smoking_policy: Option<String>,
    #[serde(default, deserialize_with = "nullable_timestamp")]
    pub available_date: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
}

impl PropertyPatch {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let required = [
            ("name", &self.name, 255),
            ("address", &self.address, 2000),
            ("city", &self.city, 100),
            ("postalCode", &self.postal_code, 10),
            ("propertyType", &self.property_type, 50),
        ];
        for (field, value, max_len) in required {
            if let Some(value) = value {
                errors.require_text(field, value, max_len);
            }
        }
        let optional = [
            ("province", &self.province, 10),
            ("petPolicy", &self.pet_policy, 50),
            ("smokingPolicy", &self.smoking_policy, 50),
        ];
        for (field, value, max_len) in optional {
            if let Some(value) = value {
                errors.max_len(field, value, max_len);
            }
        }
        check_counts(&mut errors, self.bedrooms, self.bathrooms, self.square_footage.flatten());
        if let Some(rent) = self.rent_amount {
            errors.money("rentAmount", rent);
        }
        errors.into_result()
    }

    /// Merge into an existing row and refresh `updated_at`
    pub fn apply_to(self, property: &mut Property, now: DateTime<Utc>) {
        if let Some(v) = self.name { property.name = v; }
        if let Some(v) = self.address { property.address = v; }
        if let Some(v) = self.city { property.city = v; }
        if let Some(v) = self.province { property.province = v; }
        if let Some(v) = self.postal_code { property.postal_code = v; }
        if let Some(v) = self.property_type { property.property_type = v; }
        if let Some(v) = self.bedrooms { property.bedrooms = v; }
        if let Some(v) = self.bathrooms { property.bathrooms = v; }
        if let Some(v) = self.square_footage { property.square_footage = v; }
        if let Some(v) = self.rent_amount { property.rent_amount = v; }
        if let Some(v) = self.status { property.status = v; }
        if let Some(v) = self.description { property.description = v; }
        if let Some(v) = self.images { property.images = v; }
        if let Some(v) = self.amenities { property.amenities = v; }
        if let Some(v) = self.pet_policy { property.pet_policy = v; }
        if let Some(v) = self.smoking_policy { property.smoking_policy = v; }
        if let Some(v) = self.available_date { property.available_date = v; }
        if let Some(v) = self.is_active { property.is_active = v; }
        property.updated_at = now;
    }
}
