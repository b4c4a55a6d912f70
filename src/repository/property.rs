use tracing::{debug, info};

use super::{RepoError, RepoResult, Repository};
use crate::database::models::{NewProperty, Property, PropertyPatch};

impl Repository {
    /// The owner's properties, newest first
    pub async fn list_properties(&self, owner_id: &str) -> RepoResult<Vec<Property>> {
        Ok(self.store.list_properties(owner_id).await?)
    }

    pub async fn get_property(&self, id: i32, owner_id: &str) -> RepoResult<Property> {
        self.owned_property(id, owner_id).await
    }

    /// The owner always comes from `owner_id`; the payload cannot name one.
    pub async fn create_property(&self, owner_id: &str, input: NewProperty) -> RepoResult<Property> {
        input.validate()?;
        let property = self.store.insert_property(owner_id, input).await?;
        info!(property_id = property.id, owner_id, "property created");
        Ok(property)
    }

    pub async fn update_property(
        &self,
        id: i32,
        owner_id: &str,
        patch: PropertyPatch,
    ) -> RepoResult<Property> {
        patch.validate()?;
        self.store
            .update_property(id, owner_id, patch)
            .await?
            .ok_or_else(|| {
                debug!(property_id = id, "update skipped, property not owned by caller");
                RepoError::not_found("Property")
            })
    }

    /// Hard delete. Returns whether a row owned by `owner_id` was removed.
    pub async fn delete_property(&self, id: i32, owner_id: &str) -> RepoResult<bool> {
        let deleted = self.store.delete_property(id, owner_id).await?;
        if deleted {
            info!(property_id = id, owner_id, "property deleted");
        }
        Ok(deleted)
    }
}
