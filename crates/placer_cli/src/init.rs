//! `placer init-config`: write the default configuration to disk.

use std::fs;
use std::path::Path;

use placer_config::{to_toml_string, PlacementConfig};

use crate::GlobalArgs;

/// Runs the `placer init-config` command.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn run(
    path: &str,
    force: bool,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let path = Path::new(path);
    if path.exists() && !force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }
    let toml = to_toml_string(&PlacementConfig::default())?;
    fs::write(path, toml)?;
    if !global.quiet {
        eprintln!("     Created {}", path.display());
    }
    Ok(0)
}
