// repository/ownership.rs - ownership checks shared by every descendant entity

use std::future::Future;
use tracing::debug;

use super::{RepoError, RepoResult, Repository};
use crate::database::models::{FieldErrors, Property};
use crate::database::DbResult;

/// Resolve a child through its owner join, then hand it to `mutate`.
///
/// `resolve` must already be scoped to the owner. When it yields nothing the
/// caller gets `NotFound` and `mutate` never runs. A `None` from `mutate` means
/// the row disappeared between the two calls and is reported the same way.
pub(crate) async fn verify_then_mutate<T, R, F, Fut>(
    entity: &'static str,
    resolve: impl Future<Output = DbResult<Option<T>>>,
    mutate: F,
) -> RepoResult<R>
where
    F: FnOnce(T) -> Fut,
    Fut: Future<Output = RepoResult<Option<R>>>,
{
    let Some(existing) = resolve.await? else {
        debug!(entity, "ownership check failed");
        return Err(RepoError::not_found(entity));
    };
    mutate(existing).await?.ok_or(RepoError::not_found(entity))
}

/// Descendant inserts must name their property
pub(crate) fn require_property_id(property_id: Option<i32>) -> RepoResult<i32> {
    property_id.ok_or_else(|| FieldErrors::single("propertyId", "This field is required").into())
}

impl Repository {
    /// The parent property, scoped to `owner_id`
    pub(crate) async fn owned_property(&self, property_id: i32, owner_id: &str) -> RepoResult<Property> {
        self.store
            .find_property(property_id, owner_id)
            .await?
            .ok_or_else(|| {
                debug!(property_id, "property not owned by caller");
                RepoError::not_found("Property")
            })
    }

    /// A `tenant_id` on a maintenance request or transaction must point at a
    /// tenant of the same property
    pub(crate) async fn check_tenant_ref(
        &self,
        owner_id: &str,
        property_id: i32,
        tenant_id: Option<i32>,
    ) -> RepoResult<()> {
        let Some(tenant_id) = tenant_id else {
            return Ok(());
        };
        match self.store.find_tenant_for_owner(tenant_id, owner_id).await? {
            Some(tenant) if tenant.property_id == Some(property_id) => Ok(()),
            _ => Err(FieldErrors::single("tenantId", "Tenant does not belong to this property").into()),
        }
    }
}
