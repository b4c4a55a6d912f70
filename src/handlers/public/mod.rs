// handlers/public/mod.rs - endpoints that need no authentication

pub mod system;

pub use system::{health, root};
