//! Box configuration
//!
//! A [`Config`] holds everything needed to assemble one box: its name, outer
//! dimensions and material thickness, how large tabs may grow, and the
//! comparison tolerance. Files are JSON or TOML, chosen by extension, and
//! live by default under the platform configuration directory.

use fingerbox_core::Tolerance;
use fingerbox_joinery::{BoxAssembler, BoxDimensions, TabSizing};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{SettingsError, SettingsResult};

/// On-disk configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format implied by the file extension.
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(SettingsError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }
}

/// Default configuration file: `<config dir>/fingerbox/config.toml`.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let dir = dirs::config_dir().ok_or_else(|| {
        SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
    })?;
    Ok(dir.join("fingerbox").join("config.toml"))
}

/// Complete box configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name of the container component holding the panels
    pub name: String,
    /// Outer dimensions and material thickness
    pub dimensions: BoxDimensions,
    /// Maximum tab size
    pub tabs: TabSizing,
    /// Tolerance for every geometric comparison
    pub tolerance: Tolerance,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "Box".to_string(),
            dimensions: BoxDimensions::default(),
            tabs: TabSizing::default(),
            tolerance: Tolerance::default(),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Save config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = ConfigFormat::from_path(path)?;

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        debug!("Saved config '{}' to {}", self.name, path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.name.trim().is_empty() {
            return Err(SettingsError::invalid("name", "must not be empty"));
        }

        self.dimensions
            .validate()
            .map_err(|e| SettingsError::invalid("dimensions", e))?;

        self.tolerance
            .validate()
            .map_err(|e| SettingsError::invalid("tolerance", e))?;

        let max = self.tabs.max_tab_size;
        if !max.is_finite() || max <= 0.0 {
            return Err(SettingsError::invalid(
                "tabs.max_tab_size",
                format!("{} must be finite and greater than zero", max),
            ));
        }

        // Catches tab sizes so small the edge would need absurd tab counts
        self.assembler()
            .tab_layout()
            .map_err(|e| SettingsError::invalid("tabs", e))?;

        Ok(())
    }

    /// Assembler configured from these settings.
    pub fn assembler(&self) -> BoxAssembler {
        BoxAssembler::new(self.name.clone(), self.dimensions)
            .with_tab_sizing(self.tabs)
            .with_tolerance(self.tolerance)
    }
}
