//! HTTP surface for the IMDb scraper.
pub mod config;
mod error;
pub mod logging;
mod routes;

pub use config::{ConfigError, ServerConfig, ServiceInfo};
pub use error::{AppError, AppResult};
pub use routes::{router, AppState};
