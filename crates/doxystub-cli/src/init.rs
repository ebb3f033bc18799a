//! Implementation of `doxystub init`.

use anyhow::{bail, Context, Result};
use doxystub_core::{GeneratorConfig, CONFIG_FILE};
use std::env;
use std::fs;
use std::path::Path;

/// Write a default `doxystub.toml` into the current directory.
pub fn init_config(force: bool) -> Result<()> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    init_config_in(&current_dir, force)
}

/// Write a default `doxystub.toml` into `dir`.
pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        bail!(
            "Cannot initialize: `{}` already exists in this directory (use --force to overwrite)",
            CONFIG_FILE
        );
    }

    let content = GeneratorConfig::default()
        .to_toml_string()
        .context("Failed to serialize configuration")?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {}", config_path.display());
    Ok(())
}
