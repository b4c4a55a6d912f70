// database/memory.rs - in-process `EntityStore` used for development and tests
//
// Mirrors the PostgreSQL foreign-key actions: deleting a property detaches its
// tenants and drops its maintenance requests and transactions; deleting a tenant
// clears `tenant_id` on the rows that referenced it.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::manager::DbResult;
use super::models::{
    MaintenancePatch, MaintenanceRequest, MaintenanceStatus, NewMaintenanceRequest, NewProperty,
    NewTenant, NewTransaction, Property, PropertyPatch, Tenant, TenantPatch, Transaction,
    TransactionPatch, UpsertUser, User,
};
use super::store::EntityStore;

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    properties: Vec<Property>,
    tenants: Vec<Tenant>,
    maintenance: Vec<MaintenanceRequest>,
    transactions: Vec<Transaction>,
    sequences: Sequences,
}

/// One SERIAL per table, starting at 1
#[derive(Default)]
struct Sequences {
    properties: i32,
    tenants: i32,
    maintenance: i32,
    transactions: i32,
}

fn next(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

trait Row {
    fn id(&self) -> i32;
    fn created_at(&self) -> chrono::DateTime<Utc>;
}

macro_rules! impl_row {
    ($($ty:ty),*) => {
        $(impl Row for $ty {
            fn id(&self) -> i32 { self.id }
            fn created_at(&self) -> chrono::DateTime<Utc> { self.created_at }
        })*
    };
}

impl_row!(Property, Tenant, MaintenanceRequest, Transaction);

/// created_at DESC, id DESC
fn newest_first<T: Row + Clone>(rows: impl Iterator<Item = T>) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(&a.id()))
    });
    rows
}

fn remove_by_id<T: Row>(rows: &mut Vec<T>, id: i32) -> bool {
    let before = rows.len();
    rows.retain(|row| row.id() != id);
    rows.len() != before
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn owns(&self, property_id: Option<i32>, owner_id: &str) -> bool {
        property_id.is_some_and(|pid| {
            self.properties
                .iter()
                .any(|p| p.id == pid && p.user_id == owner_id)
        })
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }

    async fn get_user(&self, id: &str) -> DbResult<Option<User>> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn upsert_user(&self, user: UpsertUser) -> DbResult<User> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let row = tables
            .users
            .entry(user.id.clone())
            .and_modify(|existing| {
                existing.email = user.email.clone();
                existing.first_name = user.first_name.clone();
                existing.last_name = user.last_name.clone();
                existing.profile_image_url = user.profile_image_url.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| User {
                id: user.id.clone(),
                email: user.email.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                profile_image_url: user.profile_image_url.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }

    async fn list_properties(&self, owner_id: &str) -> DbResult<Vec<Property>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .properties
                .iter()
                .filter(|p| p.user_id == owner_id)
                .cloned(),
        ))
    }

    async fn find_property(&self, id: i32, owner_id: &str) -> DbResult<Option<Property>> {
        let tables = self.tables.read().await;
        Ok(tables
            .properties
            .iter()
            .find(|p| p.id == id && p.user_id == owner_id)
            .cloned())
    }

    async fn insert_property(&self, owner_id: &str, input: NewProperty) -> DbResult<Property> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.properties);
        let row = input.into_property(id, owner_id, Utc::now());
        tables.properties.push(row.clone());
        Ok(row)
    }

    async fn update_property(
        &self,
        id: i32,
        owner_id: &str,
        patch: PropertyPatch,
    ) -> DbResult<Option<Property>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables
            .properties
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner_id)
        else {
            return Ok(None);
        };
        patch.apply_to(row, Utc::now());
        Ok(Some(row.clone()))
    }

    async fn delete_property(&self, id: i32, owner_id: &str) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.properties.len();
        tables
            .properties
            .retain(|p| !(p.id == id && p.user_id == owner_id));
        if tables.properties.len() == before {
            return Ok(false);
        }

        // ON DELETE SET NULL
        for tenant in tables.tenants.iter_mut().filter(|t| t.property_id == Some(id)) {
            tenant.property_id = None;
        }
        // ON DELETE CASCADE
        tables.maintenance.retain(|m| m.property_id != id);
        tables.transactions.retain(|t| t.property_id != id);
        Ok(true)
    }

    async fn list_tenants(&self, property_id: i32) -> DbResult<Vec<Tenant>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .tenants
                .iter()
                .filter(|t| t.property_id == Some(property_id))
                .cloned(),
        ))
    }

    async fn find_tenant_for_owner(&self, id: i32, owner_id: &str) -> DbResult<Option<Tenant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tenants
            .iter()
            .find(|t| t.id == id && tables.owns(t.property_id, owner_id))
            .cloned())
    }

    async fn insert_tenant(&self, input: NewTenant) -> DbResult<Tenant> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.tenants);
        let row = input.into_tenant(id, Utc::now());
        tables.tenants.push(row.clone());
        Ok(row)
    }

    async fn update_tenant(&self, id: i32, patch: TenantPatch) -> DbResult<Option<Tenant>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.tenants.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        patch.apply_to(row, Utc::now());
        Ok(Some(row.clone()))
    }

    async fn delete_tenant(&self, id: i32) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        if !remove_by_id(&mut tables.tenants, id) {
            return Ok(false);
        }
        for request in tables.maintenance.iter_mut().filter(|m| m.tenant_id == Some(id)) {
            request.tenant_id = None;
        }
        for transaction in tables.transactions.iter_mut().filter(|t| t.tenant_id == Some(id)) {
            transaction.tenant_id = None;
        }
        Ok(true)
    }

    async fn list_maintenance(&self, property_id: i32) -> DbResult<Vec<MaintenanceRequest>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .maintenance
                .iter()
                .filter(|m| m.property_id == property_id)
                .cloned(),
        ))
    }

    async fn find_maintenance_for_owner(
        &self,
        id: i32,
        owner_id: &str,
    ) -> DbResult<Option<MaintenanceRequest>> {
        let tables = self.tables.read().await;
        Ok(tables
            .maintenance
            .iter()
            .find(|m| m.id == id && tables.owns(Some(m.property_id), owner_id))
            .cloned())
    }

    async fn insert_maintenance(
        &self,
        property_id: i32,
        input: NewMaintenanceRequest,
    ) -> DbResult<MaintenanceRequest> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.maintenance);
        let row = input.into_request(id, property_id, Utc::now());
        tables.maintenance.push(row.clone());
        Ok(row)
    }

    async fn update_maintenance(
        &self,
        id: i32,
        patch: MaintenancePatch,
    ) -> DbResult<Option<MaintenanceRequest>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.maintenance.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        patch.apply_to(row, Utc::now());
        Ok(Some(row.clone()))
    }

    async fn delete_maintenance(&self, id: i32) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(remove_by_id(&mut tables.maintenance, id))
    }

    async fn count_maintenance_for_owner(
        &self,
        owner_id: &str,
        status: MaintenanceStatus,
    ) -> DbResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .maintenance
            .iter()
            .filter(|m| m.status == status && tables.owns(Some(m.property_id), owner_id))
            .count();
        Ok(count as i64)
    }

    async fn list_transactions(&self, property_id: i32) -> DbResult<Vec<Transaction>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .transactions
                .iter()
                .filter(|t| t.property_id == property_id)
                .cloned(),
        ))
    }

    async fn find_transaction_for_owner(
        &self,
        id: i32,
        owner_id: &str,
    ) -> DbResult<Option<Transaction>> {
        let tables = self.tables.read().await;
        Ok(tables
            .transactions
            .iter()
            .find(|t| t.id == id && tables.owns(Some(t.property_id), owner_id))
            .cloned())
    }

    async fn insert_transaction(
        &self,
        property_id: i32,
        input: NewTransaction,
    ) -> DbResult<Transaction> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.sequences.transactions);
        let row = input.into_transaction(id, property_id, Utc::now());
        tables.transactions.push(row.clone());
        Ok(row)
    }

    async fn update_transaction(
        &self,
        id: i32,
        patch: TransactionPatch,
    ) -> DbResult<Option<Transaction>> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.transactions.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        patch.apply_to(row, Utc::now());
        Ok(Some(row.clone()))
    }

    async fn delete_transaction(&self, id: i32) -> DbResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(remove_by_id(&mut tables.transactions, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn house(name: &str) -> NewProperty {
        NewProperty::new(name, "1 Main St", "Victoria", "V8V 1A1", "house", Decimal::new(2000, 0))
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = MemoryStore::new();
        let a = store.insert_property("u1", house("A")).await.unwrap();
        let b = store.insert_property("u1", house("B")).await.unwrap();
        store.insert_property("u2", house("C")).await.unwrap();

        let ids: Vec<i32> = store
            .list_properties("u1")
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn property_delete_mirrors_foreign_keys() {
        let store = MemoryStore::new();
        let property = store.insert_property("u1", house("A")).await.unwrap();
        let tenant = store
            .insert_tenant(NewTenant::new(property.id, "Ada", "Lovelace", "ada@example.com"))
            .await
            .unwrap();
        store
            .insert_maintenance(
                property.id,
                NewMaintenanceRequest::new(property.id, "Leak", "Tap drips", "plumbing"),
            )
            .await
            .unwrap();

        assert!(store.delete_property(property.id, "u1").await.unwrap());
        assert!(store.list_maintenance(property.id).await.unwrap().is_empty());
        assert!(store.find_tenant_for_owner(tenant.id, "u1").await.unwrap().is_none());
        assert_eq!(store.tables.read().await.tenants[0].property_id, None);
    }

    #[tokio::test]
    async fn tenant_delete_clears_references() {
        let store = MemoryStore::new();
        let property = store.insert_property("u1", house("A")).await.unwrap();
        let tenant = store
            .insert_tenant(NewTenant::new(property.id, "Ada", "Lovelace", "ada@example.com"))
            .await
            .unwrap();
        let mut input = NewMaintenanceRequest::new(property.id, "Leak", "Tap drips", "plumbing");
        input.tenant_id = Some(tenant.id);
        let request = store.insert_maintenance(property.id, input).await.unwrap();

        assert!(store.delete_tenant(tenant.id).await.unwrap());
        let request = store
            .find_maintenance_for_owner(request.id, "u1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.tenant_id, None);
    }

    #[tokio::test]
    async fn upsert_keeps_created_at() {
        let store = MemoryStore::new();
        let first = store
            .upsert_user(UpsertUser { id: "sub-1".into(), ..Default::default() })
            .await
            .unwrap();
        let second = store
            .upsert_user(UpsertUser {
                id: "sub-1".into(),
                email: Some("a@b.c".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.email.as_deref(), Some("a@b.c"));
    }

    #[tokio::test]
    async fn identities_may_share_an_email() {
        let store = MemoryStore::new();
        for id in ["sub-1", "sub-2"] {
            store
                .upsert_user(UpsertUser {
                    id: id.into(),
                    email: Some("shared@example.com".into()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        assert!(store.get_user("sub-1").await.unwrap().is_some());
        assert!(store.get_user("sub-2").await.unwrap().is_some());
    }
}
