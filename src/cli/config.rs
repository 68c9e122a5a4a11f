//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "search.debounce_ms")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        // The device id keys this install's favorites; keep it
        let device = Config::load().map(|c| c.device).unwrap_or_default();
        let config = Config {
            device,
            ..Config::default()
        };
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (args.key.as_deref(), args.value.as_deref()) {
        (None, None) => show_all_config(&config),

        (Some(key), None) => match config.get(key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(unknown_key(key)),
        },

        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
            Ok(())
        }

        (None, Some(_)) => Err(Error::Config("Must specify a key to set a value".to_string())),
    }
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown config key: {} (available: {})",
        key,
        Config::available_keys().join(", ")
    ))
}

/// Display all configuration values
fn show_all_config(config: &Config) -> Result<()> {
    let mut shown = config.clone();
    if !shown.geocoding.api_key.is_empty() {
        shown.geocoding.api_key = "***".to_string();
    }
    let rendered = toml::to_string_pretty(&shown)
        .map_err(|e| Error::Config(format!("Failed to render config: {}", e)))?;
    print!("{}", rendered);
    Ok(())
}
