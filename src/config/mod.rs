//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GuardConfig (validated, immutable)
//!     → pools and clients are built from it at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; pools and clients never reconfigure
//! - All fields have defaults so an empty file is a working setup
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    GroupConfig, GuardConfig, ObservabilityConfig, StatisticsConfig, UserServiceConfig,
};
pub use validation::{validate_config, ValidationError};
