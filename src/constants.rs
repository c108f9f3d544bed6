//! App-wide constants.
//!
//! Centralises the tool name, config filename, secret store keys and the
//! macro names of the generated header so a rename only requires changing
//! this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "fobgen";

/// Crate version baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compilation target triple, exported by `build.rs`.
pub const TARGET: &str = env!("TARGET");

/// Config filename looked up in the working directory when `--config` is absent.
pub const CONFIG_FILENAME: &str = "fobgen.toml";

/// Default JSON indent width for the secret store.
pub const DEFAULT_STORE_INDENT: usize = 4;

// ── Secret store keys ───────────────────────────────────────────────

/// Raw rendering of the feature-unlock key bytes.
pub const FEATURE_UNLOCK_KEY: &str = "feature_unlock_key";

/// Array-string rendering of the feature-unlock key bytes.
pub const FEATURE_UNLOCK_KEY_STR: &str = "feature_unlock_key_str";

/// Suffix appended to a car id to find its provisioned secret.
pub const CAR_SECRET_SUFFIX: &str = "_secret_str";

/// Store key holding the secret for `car_id`.
pub fn car_secret_key(car_id: u64) -> String {
    format!("{car_id}{CAR_SECRET_SUFFIX}")
}

// ── Header contract ─────────────────────────────────────────────────

/// Include guard of the generated fob header.
pub const HEADER_GUARD: &str = "__FOB_SECRETS__";

/// Width in bytes of the feature-unlock key and the PIN hash.
pub const SECRET_WIDTH: usize = 16;

/// Placeholder used for `CAR_ID` and `CAR_SECRET` on unpaired fobs.
pub const UNPAIRED_PLACEHOLDER: &str = "000000";
