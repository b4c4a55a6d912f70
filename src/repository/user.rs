use tracing::debug;

use super::{RepoError, RepoResult, Repository};
use crate::database::models::{UpsertUser, User};

impl Repository {
    pub async fn get_user(&self, id: &str) -> RepoResult<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or(RepoError::not_found("User"))
    }

    /// Insert or refresh the profile carried by the identity claims. The id never changes.
    pub async fn sync_user(&self, user: UpsertUser) -> RepoResult<User> {
        debug!(user_id = %user.id, "syncing user profile");
        Ok(self.store.upsert_user(user).await?)
    }
}
