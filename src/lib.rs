//! Dengue ML - сервис прогнозов

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod preprocessing;
pub mod services;
pub mod state;
pub mod store;
pub mod types;

pub use api::{create_router, AppState};
pub use config::{ServiceConfig, StoreBackend};
pub use error::ServiceError;
pub use state::{ModelState, ServiceState};
pub use types::*;
