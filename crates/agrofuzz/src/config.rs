//! Configuration file support for agrofuzz
//!
//! Supports loading configuration from .agrofuzzrc files in:
//! - Current directory
//! - User home directory
//! - Custom path via environment variable
//!
//! ```toml
//! definition = "zones/vineyard.json"
//!
//! [engine]
//! defuzzification = "centroid"
//! input_policy = "clamp_to_universe"
//!
//! [batch]
//! parallel = true
//! min_parallel_rows = 64
//! max_threads = 0
//! failure_policy = "record"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use agrofuzz_fis::{EngineConfig, FisDefinition};

use crate::batch::BatchConfig;
use crate::productivity::{self, ProductivityModel};

const CONFIG_ENV: &str = "AGROFUZZ_CONFIG";
const CONFIG_FILE: &str = ".agrofuzzrc";

/// Configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON FIS definition to use instead of the built-in productivity model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<PathBuf>,

    /// Engine settings overriding those of the definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineConfig>,

    /// Batch evaluation settings
    pub batch: BatchConfig,
}

/// Read a JSON FIS definition from disk.
pub fn load_definition(path: &Path) -> Result<FisDefinition> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read FIS definition: {}", path.display()))?;

    FisDefinition::from_json(&content)
        .with_context(|| format!("Failed to parse FIS definition: {}", path.display()))
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Find and load configuration file
    ///
    /// Search order:
    /// 1. AGROFUZZ_CONFIG environment variable
    /// 2. .agrofuzzrc in current directory
    /// 3. .agrofuzzrc in user home directory
    pub fn load_default() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            match Self::load(Path::new(&path)) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path, error = %e, "Ignoring config from environment"),
            }
        }

        let current_config = PathBuf::from(CONFIG_FILE);
        if current_config.exists() {
            match Self::load(&current_config) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(
                    path = %current_config.display(),
                    error = %e,
                    "Ignoring config from working directory"
                ),
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(CONFIG_FILE);
            if home_config.exists() {
                match Self::load(&home_config) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(
                        path = %home_config.display(),
                        error = %e,
                        "Ignoring config from home directory"
                    ),
                }
            }
        }

        Self::default()
    }

    /// The FIS definition this configuration selects, with engine
    /// overrides applied.
    ///
    /// A relative definition path is resolved against the working directory.
    pub fn fis_definition(&self) -> Result<FisDefinition> {
        let mut definition = match &self.definition {
            Some(path) => load_definition(path)?,
            None => productivity::definition(),
        };
        if let Some(engine) = self.engine {
            definition.engine = engine;
        }
        Ok(definition)
    }

    /// Build the productivity model this configuration describes.
    pub fn build_model(&self) -> Result<ProductivityModel> {
        let definition = self.fis_definition()?;
        ProductivityModel::from_definition(&definition).with_context(|| match &self.definition {
            Some(path) => format!("Invalid FIS definition: {}", path.display()),
            None => "Invalid built-in FIS definition".to_string(),
        })
    }
}
