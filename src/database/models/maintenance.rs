use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{nullable, nullable_timestamp, timestamp, FieldErrors, ParseEnumError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenancePriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl MaintenancePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenancePriority::Low => "low",
            MaintenancePriority::Medium => "medium",
            MaintenancePriority::High => "high",
            MaintenancePriority::Urgent => "urgent",
        }
    }
}

impl FromStr for MaintenancePriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(MaintenancePriority::Low),
            "medium" => Ok(MaintenancePriority::Medium),
            "high" => Ok(MaintenancePriority::High),
            "urgent" => Ok(MaintenancePriority::Urgent),
            other => Err(ParseEnumError { kind: "maintenance priority", value: other.to_string() }),
        }
    }
}

/// Any status may follow any other; there is no transition table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Pending => "pending",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MaintenanceStatus::Pending),
            "in_progress" => Ok(MaintenanceStatus::InProgress),
            "completed" => Ok(MaintenanceStatus::Completed),
            "cancelled" => Ok(MaintenanceStatus::Cancelled),
            other => Err(ParseEnumError { kind: "maintenance status", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub id: i32,
    pub property_id: i32,
    pub tenant_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub priority: MaintenancePriority,
    pub status: MaintenanceStatus,
    pub category: String,
    pub estimated_cost: Option<Decimal>,
    pub actual_cost: Option<Decimal>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub images: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMaintenanceRequest {
    /// Optional only so a missing value surfaces as a field error instead of a parse failure
    #[serde(default)]
    pub property_id: Option<i32>,
    #[serde(default)]
    pub tenant_id: Option<i32>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: MaintenancePriority,
    #[serde(default)]
    pub status: MaintenanceStatus,
    pub category: String,
    #[serde(default)]
    pub estimated_cost: Option<Decimal>,
    #[serde(default)]
    pub actual_cost: Option<Decimal>,
    #[serde(default, deserialize_with = "timestamp")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewMaintenanceRequest {
    pub fn new(
        property_id: i32,
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            property_id: Some(property_id),
            tenant_id: None,
            title: title.into(),
            description: description.into(),
            priority: MaintenancePriority::default(),
            status: MaintenanceStatus::default(),
            category: category.into(),
            estimated_cost: None,
            actual_cost: None,
            scheduled_date: None,
            completed_date: None,
            images: Vec::new(),
            notes: None,
        }
    }

    pub fn with_status(mut self, status: MaintenanceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.property_id.is_none() {
            errors.add("propertyId", "This field is required");
        }
        errors.require_text("title", &self.title, 255);
        errors.require_text("description", &self.description, 10_000);
        errors.require_text("category", &self.category, 50);
        if let Some(cost) = self.estimated_cost {
            errors.money("estimatedCost", cost);
        }
        if let Some(cost) = self.actual_cost {
            errors.money("actualCost", cost);
        }
        errors.into_result()
    }

    /// Callers resolve `property_id` before inserting; rows carry it as non-null
    pub fn into_request(self, id: i32, property_id: i32, now: DateTime<Utc>) -> MaintenanceRequest {
        MaintenanceRequest {
            id,
            property_id,
            tenant_id: self.tenant_id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            category: self.category,
            estimated_cost: self.estimated_cost,
            actual_cost: self.actual_cost,
            scheduled_date: self.scheduled_date,
            completed_date: self.completed_date,
            images: self.images,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenancePatch {
    pub property_id: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub tenant_id: Option<Option<i32>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<MaintenancePriority>,
    pub status: Option<MaintenanceStatus>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub estimated_cost: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    pub actual_cost: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable_timestamp")]
    pub scheduled_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable_timestamp")]
    pub completed_date: Option<Option<DateTime<Utc>>>,
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl MaintenancePatch {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(title) = &self.title {
            errors.require_text("title", title, 255);
        }
        if let Some(description) = &self.description {
            errors.require_text("description", description, 10_000);
        }
        if let Some(category) = &self.category {
            errors.require_text("category", category, 50);
        }
        if let Some(Some(cost)) = self.estimated_cost {
            errors.money("estimatedCost", cost);
        }
        if let Some(Some(cost)) = self.actual_cost {
            errors.money("actualCost", cost);
        }
        errors.into_result()
    }

    pub fn apply_to(self, request: &mut MaintenanceRequest, now: DateTime<Utc>) {
        if let Some(v) = self.property_id { request.property_id = v; }
        if let Some(v) = self.tenant_id { request.tenant_id = v; }
        if let Some(v) = self.title { request.title = v; }
        if let Some(v) = self.description { request.description = v; }
        if let Some(v) = self.priority { request.priority = v; }
        if let Some(v) = self.status { request.status = v; }
        if let Some(v) = self.category { request.category = v; }
        if let Some(v) = self.estimated_cost { request.estimated_cost = v; }
        if let Some(v) = self.actual_cost { request.actual_cost = v; }
        if let Some(v) = self.scheduled_date { request.scheduled_date = v; }
        if let Some(v) = self.completed_date { request.completed_date = v; }
        if let Some(v) = self.images { request.images = v; }
        if let Some(v) = self.notes { request.notes = v; }
        request.updated_at = now;
    }
}
