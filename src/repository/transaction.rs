use super::ownership::{require_property_id, verify_then_mutate};
use super::{RepoError, RepoResult, Repository};
use crate::database::models::{NewTransaction, Transaction, TransactionPatch};

const ENTITY: &str = "Transaction";

impl Repository {
    pub async fn list_transactions(
        &self,
        property_id: i32,
        owner_id: &str,
    ) -> RepoResult<Vec<Transaction>> {
        match self.owned_property(property_id, owner_id).await {
            Ok(_) => Ok(self.store.list_transactions(property_id).await?),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub async fn get_transaction(&self, id: i32, owner_id: &str) -> RepoResult<Transaction> {
        self.store
            .find_transaction_for_owner(id, owner_id)
            .await?
            .ok_or(RepoError::not_found(ENTITY))
    }

    pub async fn create_transaction(
        &self,
        owner_id: &str,
        input: NewTransaction,
    ) -> RepoResult<Transaction> {
        input.validate()?;
        let property_id = require_property_id(input.property_id)?;
        self.owned_property(property_id, owner_id).await?;
        self.check_tenant_ref(owner_id, property_id, input.tenant_id).await?;
        Ok(self.store.insert_transaction(property_id, input).await?)
    }

    pub async fn update_transaction(
        &self,
        id: i32,
        owner_id: &str,
        patch: TransactionPatch,
    ) -> RepoResult<Transaction> {
        verify_then_mutate(
            ENTITY,
            self.store.find_transaction_for_owner(id, owner_id),
            |existing| self.apply_transaction_patch(existing, owner_id, patch),
        )
        .await
    }

    async fn apply_transaction_patch(
        &self,
        existing: Transaction,
        owner_id: &str,
        patch: TransactionPatch,
    ) -> RepoResult<Option<Transaction>> {
        patch.validate()?;
        let property_id = patch.property_id.unwrap_or(existing.property_id);
        if patch.property_id.is_some() {
            self.owned_property(property_id, owner_id).await?;
        }
        if patch.property_id.is_some() || patch.tenant_id.is_some() {
            let tenant_id = patch.tenant_id.unwrap_or(existing.tenant_id);
            self.check_tenant_ref(owner_id, property_id, tenant_id).await?;
        }
        Ok(self.store.update_transaction(existing.id, patch).await?)
    }

    pub async fn delete_transaction(&self, id: i32, owner_id: &str) -> RepoResult<()> {
        verify_then_mutate(
            ENTITY,
            self.store.find_transaction_for_owner(id, owner_id),
            |existing| async move {
                let deleted = self.store.delete_transaction(existing.id).await?;
                Ok::<_, RepoError>(deleted.then_some(()))
            },
        )
        .await
    }
}
