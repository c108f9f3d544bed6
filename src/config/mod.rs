//! Configuration loading and layering.
//!
//! Handles `fobgen.toml` loading and CLI flag merging with proper
//! priority ordering. The library operations never read configuration;
//! the binary resolves everything into explicit paths first.

pub mod loader;

pub use loader::{Config, ConfigError, HeaderConfig, StoreConfig};
