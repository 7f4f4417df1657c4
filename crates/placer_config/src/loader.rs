//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::PlacementConfig;
use std::path::Path;

/// Conventional file name for a placement configuration.
pub const CONFIG_FILE_NAME: &str = "placer.toml";

/// Loads and validates a placement configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PlacementConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a placement configuration from a string.
///
/// Keys may sit at the top level or inside a `[placement]` table.
pub fn load_config_from_str(content: &str) -> Result<PlacementConfig, ConfigError> {
    let mut table: toml::Table =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let section = match table.remove("placement") {
        Some(toml::Value::Table(inner)) => inner,
        Some(other) => {
            return Err(ConfigError::ParseError(format!(
                "`placement` must be a table, found {}",
                other.type_str()
            )))
        }
        None => table,
    };

    let config: PlacementConfig = toml::Value::Table(section)
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Renders a configuration as a `[placement]` TOML document.
pub fn to_toml_string(config: &PlacementConfig) -> Result<String, ConfigError> {
    #[derive(serde::Serialize)]
    struct Document<'a> {
        placement: &'a PlacementConfig,
    }
    toml::to_string_pretty(&Document { placement: config })
        .map_err(|e| ConfigError::SerializeError(e.to_string()))
}
