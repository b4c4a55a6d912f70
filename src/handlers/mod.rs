// handlers/mod.rs - two handler tiers
//
// public:    no authentication (/, /health)
// protected: bearer JWT required, mounted under /api behind `require_auth`

pub mod extract;
pub mod protected;
pub mod public;

pub use extract::{RecordId, TenantListQuery};
