//! JSON-backed secret store.
//!
//! The store is a flat JSON object mapping string keys to string values.
//! It is read and rewritten in full; key order is preserved so a rewrite
//! only touches the entries that actually changed.

use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::constants::DEFAULT_STORE_INDENT;

/// Errors while loading or persisting the secret store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read secret store {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("malformed secret store {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize secret store: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write secret store {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Ordered key → string mapping persisted as pretty-printed JSON.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretStore {
    entries: IndexMap<String, String>,
}

impl std::fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys only; values are secret material.
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl SecretStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store at `path`, or an empty store if the file does not exist.
    ///
    /// A file that exists but is not a JSON object of strings is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(path, &content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "secret store absent, starting empty");
                Ok(Self::new())
            }
            Err(e) => Err(StoreError::Read {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Load the store at `path`; the file must exist.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, StoreError> {
        let entries = serde_json::from_str(content).map_err(|e| StoreError::Malformed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self { entries })
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or overwrite a value, keeping the key's existing position.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate keys in store order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Serialize to JSON text with `indent` spaces per level and a trailing newline.
    pub fn to_json(&self, indent: usize) -> Result<String, StoreError> {
        let indent_bytes = vec![b' '; indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries
            .serialize(&mut ser)
            .map_err(StoreError::Serialize)?;
        buf.push(b'\n');
        String::from_utf8(buf).map_err(|e| {
            StoreError::Serialize(serde_json::Error::io(io::Error::new(
                io::ErrorKind::InvalidData,
                e,
            )))
        })
    }

    /// Rewrite the file at `path` with the full mapping.
    pub fn save(&self, path: &Path, indent: usize) -> Result<(), StoreError> {
        let content = self.to_json(indent)?;
        std::fs::write(path, content).map_err(|e| StoreError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Rewrite the file at `path` using the default indent width.
    pub fn save_default(&self, path: &Path) -> Result<(), StoreError> {
        self.save(path, DEFAULT_STORE_INDENT)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SecretStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
