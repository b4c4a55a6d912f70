// handlers/protected/mod.rs - endpoints behind `require_auth`
//
// Every handler receives the caller as `AuthUser` and passes its id to the
// repository as the owner. Nothing here checks ownership itself.

pub mod dashboard;
pub mod maintenance;
pub mod properties;
pub mod tenants;
pub mod transactions;
pub mod user;
