// database/store.rs - storage seam between the ownership-scoped repository and the backing database
//
// Property operations are keyed by `(id, owner_id)` and filter on both columns in a
// single statement. Child tables have no owner column, so their only owner-aware
// operations are the `*_for_owner` lookups, which join through `properties`. Every
// other child operation is keyed by the child's own id or by `property_id` and
// performs no ownership check of its own: callers must verify first.

use async_trait::async_trait;

use super::manager::DbResult;
use super::models::{
    MaintenancePatch, MaintenanceRequest, MaintenanceStatus, NewMaintenanceRequest, NewProperty,
    NewTenant, NewTransaction, Property, PropertyPatch, Tenant, TenantPatch, Transaction,
    TransactionPatch, UpsertUser, User,
};

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Cheap liveness probe for `/health`
    async fn ping(&self) -> DbResult<()>;

    // Users

    async fn get_user(&self, id: &str) -> DbResult<Option<User>>;
    async fn upsert_user(&self, user: UpsertUser) -> DbResult<User>;

    // Properties (owner-filtered)

    /// Newest first
    async fn list_properties(&self, owner_id: &str) -> DbResult<Vec<Property>>;
    async fn find_property(&self, id: i32, owner_id: &str) -> DbResult<Option<Property>>;
    async fn insert_property(&self, owner_id: &str, input: NewProperty) -> DbResult<Property>;
    async fn update_property(
        &self,
        id: i32,
        owner_id: &str,
        patch: PropertyPatch,
    ) -> DbResult<Option<Property>>;
    /// True when a row was removed
    async fn delete_property(&self, id: i32, owner_id: &str) -> DbResult<bool>;

    // Tenants

    async fn list_tenants(&self, property_id: i32) -> DbResult<Vec<Tenant>>;
    async fn find_tenant_for_owner(&self, id: i32, owner_id: &str) -> DbResult<Option<Tenant>>;
    async fn insert_tenant(&self, input: NewTenant) -> DbResult<Tenant>;
    async fn update_tenant(&self, id: i32, patch: TenantPatch) -> DbResult<Option<Tenant>>;
    async fn delete_tenant(&self, id: i32) -> DbResult<bool>;

    // Maintenance requests

    async fn list_maintenance(&self, property_id: i32) -> DbResult<Vec<MaintenanceRequest>>;
    async fn find_maintenance_for_owner(
        &self,
        id: i32,
        owner_id: &str,
    ) -> DbResult<Option<MaintenanceRequest>>;
    async fn insert_maintenance(
        &self,
        property_id: i32,
        input: NewMaintenanceRequest,
    ) -> DbResult<MaintenanceRequest>;
    async fn update_maintenance(
        &self,
        id: i32,
        patch: MaintenancePatch,
    ) -> DbResult<Option<MaintenanceRequest>>;
    async fn delete_maintenance(&self, id: i32) -> DbResult<bool>;
    /// Requests in `status` across every property owned by `owner_id`, in one query
    async fn count_maintenance_for_owner(
        &self,
        owner_id: &str,
        status: MaintenanceStatus,
    ) -> DbResult<i64>;

    // Transactions

    async fn list_transactions(&self, property_id: i32) -> DbResult<Vec<Transaction>>;
    async fn find_transaction_for_owner(
        &self,
        id: i32,
        owner_id: &str,
    ) -> DbResult<Option<Transaction>>;
    async fn insert_transaction(
        &self,
        property_id: i32,
        input: NewTransaction,
    ) -> DbResult<Transaction>;
    async fn update_transaction(
        &self,
        id: i32,
        patch: TransactionPatch,
    ) -> DbResult<Option<Transaction>>;
    async fn delete_transaction(&self, id: i32) -> DbResult<bool>;
}
