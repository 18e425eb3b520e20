use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use super::mapper::apply_env_overrides;
use crate::models::settings::Settings;

const CONFIG_FILE_NAME: &str = "config.toml";

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service bound to the per-user config file, when a home directory exists.
    pub fn from_default_location() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("br", "SalonAgenda", "SalonAgenda")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings from disk. A missing file yields the defaults.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            log::info!(
                "No settings file at {}, using defaults",
                self.path.display()
            );
            return Ok(Settings::default());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let settings: Settings = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;

        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        Ok(settings)
    }

    /// Load from disk, then apply the environment overrides.
    pub fn load_with_env(&self) -> Result<Settings> {
        with_env_overrides(self.load()?)
    }

    /// Defaults plus the environment overrides, for hosts without a config location.
    pub fn defaults_with_env() -> Result<Settings> {
        with_env_overrides(Settings::default())
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let serialized = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;

        Ok(())
    }
}

fn with_env_overrides(mut settings: Settings) -> Result<Settings> {
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
        .validate()
        .map_err(|e| anyhow!("Invalid settings: {}", e))?;
    Ok(settings)
}
