pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod errors;
pub mod i18n;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod routes;

// Re-export commonly used items for tests
pub use app::{create_app, create_app_with_state, AppState};
