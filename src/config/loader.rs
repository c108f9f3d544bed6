//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. `fobgen.toml` (explicit `--config` path, or the working directory)
//! 3. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{CONFIG_FILENAME, DEFAULT_STORE_INDENT};

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub header: HeaderConfig,
}

/// Secret store defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Secret store used when `--secret-file` is not given.
    pub secret_file: Option<PathBuf>,
    /// JSON indent width when rewriting the store.
    pub indent: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            secret_file: None,
            indent: DEFAULT_STORE_INDENT,
        }
    }
}

/// Header output defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Header written when `--header-file` is not given.
    pub header_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `fobgen.toml` in `cwd` is
    /// used if present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        let local_path = cwd.join(CONFIG_FILENAME);
        if local_path.exists() {
            return Self::load_file(&local_path);
        }

        Ok(Config::default())
    }

    /// Load a config from a specific file.
    ///
    /// Relative paths inside the file are resolved against its directory.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Resolve relative paths against `base`.
    fn rebase(&mut self, base: &Path) {
        let resolve = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        resolve(&mut self.store.secret_file);
        resolve(&mut self.header.header_file);
    }

    /// Pick the secret store path: CLI flag first, then config.
    pub fn secret_file(&self, cli: Option<&Path>) -> Option<PathBuf> {
        cli.map(Path::to_path_buf)
            .or_else(|| self.store.secret_file.clone())
    }

    /// Pick the header output path: CLI flag first, then config.
    pub fn header_file(&self, cli: Option<&Path>) -> Option<PathBuf> {
        cli.map(Path::to_path_buf)
            .or_else(|| self.header.header_file.clone())
    }

    /// Pick the store indent: CLI flag first, then config.
    pub fn indent(&self, cli: Option<usize>) -> usize {
        cli.unwrap_or(self.store.indent)
    }
}
