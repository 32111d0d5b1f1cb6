//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{MapperConfig, MAX_CUT_SIZE_LIMIT};
use std::path::Path;

/// File name looked up when no explicit configuration path is given.
pub const CONFIG_FILE_NAME: &str = "conemap.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<MapperConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<MapperConfig, ConfigError> {
    let config: MapperConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &MapperConfig) -> Result<(), ConfigError> {
    let mapper = &config.mapper;
    if mapper.max_cut_size == 0 || mapper.max_cut_size > MAX_CUT_SIZE_LIMIT {
        return Err(ConfigError::invalid(
            "mapper.max_cut_size",
            format!("must be between 1 and {MAX_CUT_SIZE_LIMIT}"),
        ));
    }
    // The walk seeds the queue with both fanins of the root.
    if mapper.cone_capacity < 2 {
        return Err(ConfigError::invalid(
            "mapper.cone_capacity",
            "must be at least 2",
        ));
    }

    if config.delay.table.is_empty() {
        return Err(ConfigError::invalid(
            "delay.table",
            "must contain at least one depth class",
        ));
    }
    for (class, delay) in config.delay.table.iter().enumerate() {
        if !delay.is_finite() || *delay < 0.0 {
            return Err(ConfigError::invalid(
                format!("delay.table[{class}]"),
                format!("delay must be finite and non-negative, got {delay}"),
            ));
        }
    }

    if let Some(output) = config.required.output {
        if !output.is_finite() {
            return Err(ConfigError::invalid("required.output", "must be finite"));
        }
    }
    Ok(())
}
