//! Configuration file handling for ledger-face.
//!
//! The configuration file is stored at `<config dir>/ledger-face/config.json` unless another path
//! is given. It holds the pipeline `Settings`: which columns to read, which categories to keep,
//! how to treat negative amounts, which category drives which face feature, and how to read
//! statements.

use crate::pipeline::{Preset, Settings};
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_NAME: &str = "ledger-face";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app: where it lives on disk and the
/// settings it holds.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// `<config dir>/ledger-face/config.json`, or `./ledger-face/config.json` when the platform has
    /// no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join(CONFIG_JSON)
    }

    /// Writes a new config file at `path` holding the settings of `preset`.
    ///
    /// # Errors
    /// - The file already exists and `force` is false.
    /// - The parent directory cannot be created or the file cannot be written.
    pub async fn create(path: impl Into<PathBuf>, preset: Preset, force: bool) -> Result<Self> {
        let path = path.into();
        if path.exists() && !force {
            bail!(
                "A config file already exists at '{}', use --force to overwrite it",
                path.display()
            )
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            utils::make_dir(parent)
                .await
                .context("Unable to create the config directory")?;
        }

        let config = Self {
            path,
            config_file: ConfigFile::new(Settings::from_preset(preset)),
        };
        config.save().await?;
        debug!("Wrote {preset} config to {}", config.path.display());
        Ok(config)
    }

    /// Loads the config file at `path`, failing if it is missing or invalid.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            bail!("The config file is missing '{}'", path.display())
        }
        let config_file = ConfigFile::load(&path).await?;
        Ok(Self { path, config_file })
    }

    /// Loads the config file at `path`, or falls back to the default settings when there is no
    /// file. A file that exists but cannot be parsed is still an error.
    pub async fn load_or_default(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.is_file() {
            return Self::load(path).await;
        }
        info!(
            "No config file at '{}', using the default settings. Run 'ledger-face init' to \
            create one.",
            path.display()
        );
        Ok(Self {
            path,
            config_file: ConfigFile::default(),
        })
    }

    /// Writes the current settings back to `path()`.
    pub async fn save(&self) -> Result<()> {
        self.config_file.save(&self.path).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.config_file.settings
    }

    /// The JSON schema of the config file.
    pub fn schema() -> schemars::Schema {
        schemars::schema_for!(ConfigFile)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "ledger-face",
///   "config_version": 1,
///   "columns": { "date": "Date", "category": "Category", "amount": "Amount" },
///   "vocabulary": { "closed": ["Housing", "Transport", "Food", "Entertainment"] },
///   "sign_policy": "absolute",
///   "statement": { "label": "Balance", "scale_ceiling": 5000.0 }
/// }
/// ```
///
/// Any settings left out take their default values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
struct ConfigFile {
    /// Application name, should always be "ledger-face"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    #[serde(flatten)]
    settings: Settings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl ConfigFile {
    fn new(settings: Settings) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            settings,
        }
    }

    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or was written by another app or a
    /// newer version of this one.
    async fn load(path: &Path) -> Result<Self> {
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            config.config_version <= CONFIG_VERSION,
            "Unsupported config_version {} in config file, the newest known version is {}",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    async fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }
}
