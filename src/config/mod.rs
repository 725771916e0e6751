/// Configuration module - Load and validate verifier configuration
pub mod error;
pub mod loader;
pub mod schema;

pub use error::ConfigError;
pub use loader::load_config;
pub use schema::{Config, DEFAULT_API_BASE_URL};
