//! Config command - inspect and create the configuration file.
//!
//! `show`, `get` and `path` act on the file chosen by the global `-c` flag,
//! falling back to the per-user default location.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use plateread_core::models::config::PlatereadConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Where to write it (default: the per-user config location)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value by dotted key (e.g., "store.record_path")
    Get { key: String },

    /// Print which configuration file is in use
    Path,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            if !active_path(config_path).exists() {
                eprintln!("{} No config file found, showing defaults.", style("ℹ").blue());
            }
            let config = super::load_config(config_path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Init { output, force } => {
            let path = output.unwrap_or_else(default_config_path);
            write_defaults(&path, force)?;
            eprintln!("{} Created configuration file at {}", style("✓").green(), path.display());
        }
        ConfigCommand::Get { key } => {
            let config = serde_json::to_value(super::load_config(config_path)?)?;
            let value = lookup(&config, &key)
                .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        ConfigCommand::Path => {
            let path = active_path(config_path);
            let status = if path.exists() {
                style("exists").green()
            } else {
                style("not created (defaults in use)").yellow()
            };
            println!("{} ({})", path.display(), status);
        }
    }

    Ok(())
}

/// Per-user configuration file, `<config dir>/plateread/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plateread")
        .join("config.json")
}

fn active_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

fn write_defaults(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    PlatereadConfig::default().save(path)?;
    Ok(())
}

fn lookup<'a>(config: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(config, |node, part| node.get(part))
}
