//! Config command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use dh_core::config;

use crate::output::Output;

fn resolve_path(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_config_path)
}

/// Print the path of the configuration file in use
pub fn config_path(config_path: Option<&Path>) -> Result<()> {
    println!("{}", resolve_path(config_path).display());
    Ok(())
}

/// Show current configuration
pub fn config_show(config_path: Option<&Path>, output: Output) -> Result<()> {
    let path = resolve_path(config_path);

    if !path.exists() {
        output.warning(&format!("No configuration file found at {:?}", path));
        output.info(&format!(
            "Run {} to create one",
            output.highlight_code("deckhand config init")
        ));
        return Ok(());
    }

    output.info(&format!("Configuration file: {:?}", path));

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    println!("{}", content);

    Ok(())
}

/// Initialize default configuration
pub fn config_init(config_path: Option<&Path>, force: bool, output: Output) -> Result<()> {
    let config_file = resolve_path(config_path);
    let config_dir = config_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_config_dir);

    if config_file.exists() && !force {
        output.error(&format!("Config file already exists: {:?}", config_file));
        output.info("Use --force to overwrite");
        anyhow::bail!("refusing to overwrite {:?}", config_file);
    }

    if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
        output.success(&format!("Created config directory: {:?}", config_dir));
    }

    std::fs::write(&config_file, generate_default_config(&config_dir))
        .with_context(|| format!("Failed to write config file: {:?}", config_file))?;

    output.success(&format!("Created configuration file: {:?}", config_file));

    let manifest = config_dir.join("catalog.toml");
    if !manifest.exists() {
        output.info(&format!("Describe your projects in {:?}", manifest));
    }

    Ok(())
}

/// Generate default configuration content
fn generate_default_config(config_dir: &Path) -> String {
    format!(
        r#"# deckhand configuration

# Project used when --project is not given
# default_project = "my-project"

[catalog]
# Where projects, services and environments come from: "manifest" or "http"
backend = "manifest"

# Catalog manifest for the manifest backend
manifest_path = {manifest:?}

# Base URL for the http backend
# endpoint = "https://catalog.example.com/v1"

# Per-request timeout in seconds
timeout = 10

# Environment variable holding a bearer token for the http backend
# token_env = "DECKHAND_TOKEN"

[output]
# "auto", "always" or "never". The COLOR environment variable overrides this.
color = "auto"
"#,
        manifest = config_dir.join("catalog.toml").display().to_string()
    )
}
