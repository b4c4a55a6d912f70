pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod lease;
pub mod middleware;
pub mod repository;
pub mod server;
pub mod services;

pub use server::{app, AppState};
