//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file on disk
//!     → loader.rs (read, parse)
//!     → validation.rs (semantic checks, all errors reported)
//!     → Frozen ServerConfig shared through AppState
//! ```
//!
//! # Design Decisions
//! - Every section has serde defaults; an empty file is a valid config
//! - Validation runs before a config is accepted into the system
//! - No hot reload: the route table is fixed at startup, so there is
//!   nothing to re-point at runtime

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    LimitsConfig, ListenerConfig, ObservabilityConfig, ServerConfig, StreamingConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
