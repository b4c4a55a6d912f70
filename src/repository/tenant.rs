use futures::future::try_join_all;

use super::ownership::{require_property_id, verify_then_mutate};
use super::{RepoError, RepoResult, Repository};
use crate::database::models::{NewTenant, Tenant, TenantPatch};

const ENTITY: &str = "Tenant";

impl Repository {
    /// Tenants of one property; empty when the property is not the caller's
    pub async fn list_tenants(&self, property_id: i32, owner_id: &str) -> RepoResult<Vec<Tenant>> {
        match self.owned_property(property_id, owner_id).await {
            Ok(_) => Ok(self.store.list_tenants(property_id).await?),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Every tenant across the caller's properties, grouped by property in list order
    pub async fn list_all_tenants(&self, owner_id: &str) -> RepoResult<Vec<Tenant>> {
        let properties = self.list_properties(owner_id).await?;
        let per_property = try_join_all(
            properties
                .iter()
                .map(|property| self.list_tenants(property.id, owner_id)),
        )
        .await?;
        Ok(per_property.into_iter().flatten().collect())
    }

    pub async fn get_tenant(&self, id: i32, owner_id: &str) -> RepoResult<Tenant> {
        self.store
            .find_tenant_for_owner(id, owner_id)
            .await?
            .ok_or(RepoError::not_found(ENTITY))
    }

    pub async fn create_tenant(&self, owner_id: &str, input: NewTenant) -> RepoResult<Tenant> {
        input.validate()?;
        let property_id = require_property_id(input.property_id)?;
        self.owned_property(property_id, owner_id).await?;
        Ok(self.store.insert_tenant(input).await?)
    }

    /// Moving a tenant requires the destination property to be owned by the caller too
    pub async fn update_tenant(
        &self,
        id: i32,
        owner_id: &str,
        patch: TenantPatch,
    ) -> RepoResult<Tenant> {
        verify_then_mutate(
            ENTITY,
            self.store.find_tenant_for_owner(id, owner_id),
            |existing| self.apply_tenant_patch(existing, owner_id, patch),
        )
        .await
    }

    async fn apply_tenant_patch(
        &self,
        existing: Tenant,
        owner_id: &str,
        patch: TenantPatch,
    ) -> RepoResult<Option<Tenant>> {
        patch.validate(&existing)?;
        if let Some(destination) = patch.new_property_id() {
            self.owned_property(destination, owner_id).await?;
        }
        Ok(self.store.update_tenant(existing.id, patch).await?)
    }

    pub async fn delete_tenant(&self, id: i32, owner_id: &str) -> RepoResult<()> {
        verify_then_mutate(
            ENTITY,
            self.store.find_tenant_for_owner(id, owner_id),
            |existing| async move {
                let deleted = self.store.delete_tenant(existing.id).await?;
                Ok::<_, RepoError>(deleted.then_some(()))
            },
        )
        .await
    }
}
