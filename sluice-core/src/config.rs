use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../../package-content/sluice_config.json5");

/// Errors raised while loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("config file error: {0}")]
    Io(#[from] io::Error),
    /// The config file is not valid JSON5.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Runtime settings of a [`crate::LiquidSimulation`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Most updates run per `advance` call.
    pub max_updates_per_tick: usize,
    /// Simulation step of drivers that tick at a fixed rate.
    pub tick_interval_ms: u64,
    /// Lowest valid y.
    pub min_y: i32,
    /// Highest valid y.
    pub max_y: i32,
    /// Audible range of collision sounds.
    pub sound_range: f32,
    /// Block definitions to load instead of the builtin ones.
    pub blocks_file: Option<PathBuf>,
}

impl SimulationConfig {
    /// Loads the config at `path`, writing the default config there first if
    /// the file does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::from_json5(&fs::read_to_string(path)?)?;
            log::info!("Loaded simulation config from {}", path.display());
            Ok(config)
        } else {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_CONFIG)?;
            log::info!("Wrote default simulation config to {}", path.display());
            Self::from_json5(DEFAULT_CONFIG)
        }
    }

    /// Parses and validates a JSON5 config.
    pub fn from_json5(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json5::from_str(text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Checks values for consistency.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_updates_per_tick == 0 {
            return Err("max_updates_per_tick must be at least 1");
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be at least 1");
        }
        if self.min_y > self.max_y {
            return Err("min_y must not be above max_y");
        }
        if !self.sound_range.is_finite() || self.sound_range < 0.0 {
            return Err("sound_range must be a non-negative number");
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_updates_per_tick: 4096,
            tick_interval_ms: 50,
            min_y: -64,
            max_y: 319,
            sound_range: 16.0,
            blocks_file: None,
        }
    }
}
