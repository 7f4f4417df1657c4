//! Loading problem files and resolving the configuration to run with.

use std::fs;
use std::path::Path;

use placer_config::{PlacementConfig, CONFIG_FILE_NAME};
use placer_engine::{PlacementInput, PlacementOutcome};

/// Reads a JSON placement problem.
pub fn load_problem(path: &Path) -> Result<PlacementInput, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("cannot read problem '{}': {e}", path.display()))?;
    let input = serde_json::from_str(&content)
        .map_err(|e| format!("invalid problem '{}': {e}", path.display()))?;
    Ok(input)
}

/// Reads the positions of a previously written outcome.
pub fn load_outcome(path: &Path) -> Result<PlacementOutcome, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("cannot read outcome '{}': {e}", path.display()))?;
    let outcome = serde_json::from_str(&content)
        .map_err(|e| format!("invalid outcome '{}': {e}", path.display()))?;
    Ok(outcome)
}

/// Loads the configuration from `explicit`, else from `placer.toml` in `dir`,
/// else the defaults.
pub fn resolve_config(
    explicit: Option<&str>,
    dir: &Path,
) -> Result<PlacementConfig, Box<dyn std::error::Error>> {
    if let Some(path) = explicit {
        return Ok(placer_config::load_config(Path::new(path))?);
    }
    let local = dir.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(placer_config::load_config(&local)?);
    }
    Ok(PlacementConfig::default())
}
