//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs validate_config (semantic checks)
//!     → GateConfig (validated)
//!     → ConnectionGate::apply_config
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so a minimal (or missing) config works
//! - `-1` sentinel in the file format; `Option<u32>` inside the gate
//! - Validation separates syntactic (serde) from semantic checks
//!   and reports every error, not just the first

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::GateConfig;
