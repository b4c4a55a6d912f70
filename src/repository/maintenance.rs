use super::ownership::{require_property_id, verify_then_mutate};
use super::{RepoError, RepoResult, Repository};
use crate::database::models::{
    MaintenancePatch, MaintenanceRequest, MaintenanceStatus, NewMaintenanceRequest,
};

const ENTITY: &str = "Maintenance request";

impl Repository {
    /// Requests for one property; empty when the property is not the caller's
    pub async fn list_maintenance(
        &self,
        property_id: i32,
        owner_id: &str,
    ) -> RepoResult<Vec<MaintenanceRequest>> {
        match self.owned_property(property_id, owner_id).await {
            Ok(_) => Ok(self.store.list_maintenance(property_id).await?),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub async fn get_maintenance(&self, id: i32, owner_id: &str) -> RepoResult<MaintenanceRequest> {
        self.store
            .find_maintenance_for_owner(id, owner_id)
            .await?
            .ok_or(RepoError::not_found(ENTITY))
    }

    pub async fn create_maintenance(
        &self,
        owner_id: &str,
        input: NewMaintenanceRequest,
    ) -> RepoResult<MaintenanceRequest> {
        input.validate()?;
        let property_id = require_property_id(input.property_id)?;
        self.owned_property(property_id, owner_id).await?;
        self.check_tenant_ref(owner_id, property_id, input.tenant_id).await?;
        Ok(self.store.insert_maintenance(property_id, input).await?)
    }

    pub async fn update_maintenance(
        &self,
        id: i32,
        owner_id: &str,
        patch: MaintenancePatch,
    ) -> RepoResult<MaintenanceRequest> {
        verify_then_mutate(
            ENTITY,
            self.store.find_maintenance_for_owner(id, owner_id),
            |existing| self.apply_maintenance_patch(existing, owner_id, patch),
        )
        .await
    }

    async fn apply_maintenance_patch(
        &self,
        existing: MaintenanceRequest,
        owner_id: &str,
        patch: MaintenancePatch,
    ) -> RepoResult<Option<MaintenanceRequest>> {
        patch.validate()?;
        let property_id = patch.property_id.unwrap_or(existing.property_id);
        if patch.property_id.is_some() {
            self.owned_property(property_id, owner_id).await?;
        }
        if patch.property_id.is_some() || patch.tenant_id.is_some() {
            let tenant_id = patch.tenant_id.unwrap_or(existing.tenant_id);
            self.check_tenant_ref(owner_id, property_id, tenant_id).await?;
        }
        Ok(self.store.update_maintenance(existing.id, patch).await?)
    }

    pub async fn delete_maintenance(&self, id: i32, owner_id: &str) -> RepoResult<()> {
        verify_then_mutate(
            ENTITY,
            self.store.find_maintenance_for_owner(id, owner_id),
            |existing| async move {
                let deleted = self.store.delete_maintenance(existing.id).await?;
                Ok::<_, RepoError>(deleted.then_some(()))
            },
        )
        .await
    }

    /// Pending requests across all of the caller's properties, counted in one store call
    pub async fn count_pending_maintenance(&self, owner_id: &str) -> RepoResult<i64> {
        Ok(self
            .store
            .count_maintenance_for_owner(owner_id, MaintenanceStatus::Pending)
            .await?)
    }
}
