//! Warehouse server
//!
//! REST JSON API for an equipment rental warehouse: rental projects and
//! their equipment lines, stock shortage detection over overlapping usage
//! windows, and a laid-out booking calendar in a fixed business timezone.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
