// repository/mod.rs - ownership-scoped data access
//
// Every method takes the caller's `owner_id` explicitly and re-verifies the
// ownership chain on each call. Descendants (tenants, maintenance requests,
// transactions) are reachable only through a property the caller owns.

mod error;
mod maintenance;
mod ownership;
mod property;
mod tenant;
mod transaction;
mod user;

pub use error::{RepoError, RepoResult};

use std::sync::Arc;

use crate::database::{EntityStore, MemoryStore};

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn EntityStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Repository over a fresh `MemoryStore`
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Store liveness, for health checks
    pub async fn ping(&self) -> RepoResult<()> {
        Ok(self.store.ping().await?)
    }
}
