//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
///
/// `config_path` is the file given with `--config`, if any.
pub fn run_config(action: &ConfigAction, config_path: Option<PathBuf>, settings: Settings) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Init => {
            if config_path.exists() {
                Output::warning(&format!("Config already exists at {}", config_path.display()));
            } else {
                settings.save_to(&config_path)?;
                Output::success(&format!("Created default config at {}", config_path.display()));
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
