//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `GROUPER_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SPAN_CHARS, default_worker_count};

/// Runtime configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `GROUPER_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one artifact file per assignment. Default: `./.data/inferences`.
    pub storage_path: PathBuf,

    /// Directory holding `<assignment_id>.json` answer files. Default: `./.data/assignments`.
    pub assignments_path: PathBuf,

    /// Upper bound on concurrently running inference pairs.
    /// Default: available parallelism minus one, at least 1.
    pub workers: usize,

    /// Dimension of the hash embedder. Default: `384`.
    pub embedding_dim: usize,

    /// Longest span, in characters, the lexical extractor returns. Default: `256`.
    pub max_span_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./.data/inferences"),
            assignments_path: PathBuf::from("./.data/assignments"),
            workers: default_worker_count(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_span_chars: DEFAULT_MAX_SPAN_CHARS,
        }
    }
}

impl Config {
    const ENV_STORAGE_PATH: &'static str = "GROUPER_STORAGE_PATH";
    const ENV_ASSIGNMENTS_PATH: &'static str = "GROUPER_ASSIGNMENTS_PATH";
    const ENV_WORKERS: &'static str = "GROUPER_WORKERS";
    const ENV_EMBEDDING_DIM: &'static str = "GROUPER_EMBEDDING_DIM";
    const ENV_MAX_SPAN_CHARS: &'static str = "GROUPER_MAX_SPAN_CHARS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_path = Self::parse_path_from_env(Self::ENV_STORAGE_PATH, defaults.storage_path);
        let assignments_path =
            Self::parse_path_from_env(Self::ENV_ASSIGNMENTS_PATH, defaults.assignments_path);
        let workers = Self::parse_positive_from_env(Self::ENV_WORKERS, defaults.workers)?;
        let embedding_dim =
            Self::parse_positive_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let max_span_chars =
            Self::parse_positive_from_env(Self::ENV_MAX_SPAN_CHARS, defaults.max_span_chars)?;

        Ok(Self {
            storage_path,
            assignments_path,
            workers,
            embedding_dim,
            max_span_chars,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    ///
    /// The storage directory may be missing; the store creates it on first write.
    /// The assignments directory must already exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.exists() && !self.storage_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_path.clone(),
            });
        }

        if !self.assignments_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.assignments_path.clone(),
            });
        }
        if !self.assignments_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.assignments_path.clone(),
            });
        }

        if self.workers == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_WORKERS,
            });
        }
        if self.embedding_dim == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_EMBEDDING_DIM,
            });
        }
        if self.max_span_chars == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_MAX_SPAN_CHARS,
            });
        }

        Ok(())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_positive_from_env(
        var_name: &'static str,
        default: usize,
    ) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => {
                let parsed: usize = value.trim().parse().map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value: value.clone(),
                    source: e,
                })?;

                if parsed == 0 {
                    return Err(ConfigError::ZeroValue { name: var_name });
                }

                Ok(parsed)
            }
            Err(_) => Ok(default),
        }
    }
}
