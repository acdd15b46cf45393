//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;
pub mod handle;

use std::path::Path;

use plateread_core::models::config::PlatereadConfig;

/// Load the configuration from `path`, or the default location, or defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<PlatereadConfig> {
    if let Some(path) = path {
        return Ok(PlatereadConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(PlatereadConfig::from_file(&default_path)?)
    } else {
        Ok(PlatereadConfig::default())
    }
}
