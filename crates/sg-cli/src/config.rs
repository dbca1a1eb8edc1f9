//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use sg_core::{ColumnMap, ExpansionOptions};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Rule rows exported from the course spreadsheet.
    pub input_path: PathBuf,

    /// Where generated sessions are written.
    pub output_path: PathBuf,

    /// Word placed before the occurrence number in session labels.
    pub label_prefix: String,

    /// Spreadsheet column label for each rule field.
    pub columns: ColumnMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data.json"),
            output_path: PathBuf::from("schedule.json"),
            label_prefix: ExpansionOptions::default().label_prefix,
            columns: ColumnMap::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(config_path).extract()
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (SG_*, SG_COLUMNS__TOPIC for nested keys)
        figment.merge(Env::prefixed("SG_").split("__"))
    }

    /// Options handed to the expansion engine.
    pub fn expansion_options(&self) -> ExpansionOptions {
        ExpansionOptions {
            label_prefix: self.label_prefix.clone(),
        }
    }
}

/// Returns the platform-specific config directory for sg.
///
/// On Linux: `~/.config/sg`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sg"))
}
