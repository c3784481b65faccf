/// Meter configuration
use crate::error::{MeterError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "findtruepeak.toml";

/// Environment variable prefix (`TRUEPEAK_FORMAT`, `TRUEPEAK_CHUNK_FRAMES`, ...)
pub const ENV_PREFIX: &str = "TRUEPEAK";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MeterConfig {
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Decimals printed for dBTP values
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Upper bound on frames handed to the estimator per push
    #[serde(default = "default_chunk_frames")]
    pub chunk_frames: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl MeterConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `findtruepeak.toml` is read
    /// only if present. `TRUEPEAK_*` variables override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_frames == 0 {
            return Err(MeterError::Config(
                "chunk_frames must be at least 1".to_string(),
            ));
        }

        if self.precision > 17 {
            return Err(MeterError::Config(format!(
                "precision {} is beyond f64 resolution (max 17)",
                self.precision
            )));
        }

        Ok(())
    }
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            precision: default_precision(),
            chunk_frames: default_chunk_frames(),
        }
    }
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_precision() -> usize {
    truepeak::DEFAULT_DB_PRECISION
}

fn default_chunk_frames() -> usize {
    192_000
}
