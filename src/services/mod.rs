pub mod dashboard;

pub use dashboard::{DashboardService, DashboardStats};
