//! Parsing and validation of `conemap.toml` mapper configuration files.
//!
//! The configuration carries the depth-class delay table consumed by
//! required-time propagation, the cut and cone size bounds the upstream
//! mapper guarantees, and an optional required time applied to all outputs.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
