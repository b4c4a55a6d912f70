use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{nullable, nullable_timestamp, timestamp, FieldErrors, ParseEnumError};

/// Direction of money flow. Amounts are always positive; the sign lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(ParseEnumError { kind: "transaction type", value: other.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i32,
    pub property_id: i32,
    pub tenant_id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub transaction_date: DateTime<Utc>,
    pub is_paid: bool,
    pub payment_method: Option<String>,
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(default)]
    pub property_id: Option<i32>,
    #[serde(default)]
    pub tenant_id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    /// Defaults to the insert time
    #[serde(default, deserialize_with = "timestamp")]
    pub transaction_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
}

fn check_amount(errors: &mut FieldErrors, amount: Decimal) {
    if amount <= Decimal::ZERO {
        errors.add("amount", "Must be greater than zero");
    } else {
        errors.money("amount", amount);
    }
}

impl NewTransaction {
    pub fn new(
        property_id: i32,
        kind: TransactionType,
        category: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            property_id: Some(property_id),
            tenant_id: None,
            kind,
            category: category.into(),
            amount,
            description: description.into(),
            transaction_date: None,
            is_paid: false,
            payment_method: None,
            receipt_url: None,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.property_id.is_none() {
            errors.add("propertyId", "This field is required");
        }
        errors.require_text("category", &self.category, 50);
        errors.require_text("description", &self.description, 10_000);
        check_amount(&mut errors, self.amount);
        if let Some(method) = &self.payment_method {
            errors.max_len("paymentMethod", method, 50);
        }
        errors.into_result()
    }

    pub fn into_transaction(self, id: i32, property_id: i32, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            property_id,
            tenant_id: self.tenant_id,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            description: self.description,
            transaction_date: self.transaction_date.unwrap_or(now),
            is_paid: self.is_paid,
            payment_method: self.payment_method,
            receipt_url: self.receipt_url,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub property_id: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub tenant_id: Option<Option<i32>>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable_timestamp")]
    pub transaction_date: Option<Option<DateTime<Utc>>>,
    pub is_paid: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub payment_method: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub receipt_url: Option<Option<String>>,
}

impl TransactionPatch {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(category) = &self.category {
            errors.require_text("category", category, 50);
        }
        if let Some(description) = &self.description {
            errors.require_text("description", description, 10_000);
        }
        if let Some(amount) = self.amount {
            check_amount(&mut errors, amount);
        }
        if self.transaction_date == Some(None) {
            errors.add("transactionDate", "Cannot be cleared");
        }
        if let Some(Some(method)) = &self.payment_method {
            errors.max_len("paymentMethod", method, 50);
        }
        errors.into_result()
    }

    pub fn apply_to(self, transaction: &mut Transaction, now: DateTime<Utc>) {
        if let Some(v) = self.property_id { transaction.property_id = v; }
        if let Some(v) = self.tenant_id { transaction.tenant_id = v; }
        if let Some(v) = self.kind { transaction.kind = v; }
        if let Some(v) = self.category { transaction.category = v; }
        if let Some(v) = self.amount { transaction.amount = v; }
        if let Some(v) = self.description { transaction.description = v; }
        if let Some(Some(v)) = self.transaction_date { transaction.transaction_date = v; }
        if let Some(v) = self.is_paid { transaction.is_paid = v; }
        if let Some(v) = self.payment_method { transaction.payment_method = v; }
        if let Some(v) = self.receipt_url { transaction.receipt_url = v; }
        transaction.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amount_must_be_positive() {
        let input = NewTransaction::new(1, TransactionType::Expense, "repairs", Decimal::new(-5000, 2), "Plumber");
        assert_eq!(input.validate().unwrap_err().get("amount"), Some("Must be greater than zero"));

        let input = NewTransaction::new(1, TransactionType::Income, "rent", Decimal::ZERO, "June rent");
        assert!(input.validate().is_err());
    }

    #[test]
    fn type_field_is_named_type_on_the_wire() {
        let input: NewTransaction = serde_json::from_value(json!({
            "propertyId": 9,
            "type": "income",
            "category": "rent",
            "amount": "1850.00",
            "description": "July rent"
        }))
        .unwrap();
        assert_eq!(input.kind, TransactionType::Income);
        assert!(!input.is_paid);

        let row = input.into_transaction(1, 9, Utc::now());
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["type"], json!("income"));
        assert_eq!(value["amount"], json!("1850.00"));
    }
}
