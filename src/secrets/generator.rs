//! Global secret generation.
//!
//! Draws a fresh 128-bit feature-unlock key and merges it into the secret
//! store under two renderings, leaving every other entry untouched.

use std::path::Path;

use rand_core::{CryptoRng, OsRng, RngCore};

use crate::constants::{DEFAULT_STORE_INDENT, FEATURE_UNLOCK_KEY, FEATURE_UNLOCK_KEY_STR, SECRET_WIDTH};
use crate::secrets::array::format_byte_array;
use crate::secrets::store::{SecretStore, StoreError};

/// A 128-bit feature-unlock key, stored big-endian.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FeatureUnlockKey([u8; SECRET_WIDTH]);

impl std::fmt::Debug for FeatureUnlockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FeatureUnlockKey([REDACTED])")
    }
}

impl FeatureUnlockKey {
    /// Draw a uniformly random key from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SECRET_WIDTH];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Build a key from its integer value.
    pub fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    /// The key as an integer.
    pub fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_WIDTH] {
        &self.0
    }

    /// Raw rendering stored under `feature_unlock_key` (lowercase hex).
    pub fn to_raw_string(&self) -> String {
        hex::encode(self.0)
    }

    /// Array-string rendering stored under `feature_unlock_key_str`.
    pub fn to_array_string(&self) -> String {
        format_byte_array(&self.0)
    }
}

/// Outcome of a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// `true` if the store file did not exist beforehand.
    pub created: bool,
    /// Number of entries other than the two feature-unlock keys.
    pub preserved: usize,
    /// `true` if a previous feature-unlock key was overwritten.
    pub replaced: bool,
}

/// Creates or augments a secret store with a fresh feature-unlock key.
pub struct GlobalSecretGenerator<R> {
    rng: R,
    indent: usize,
}

impl GlobalSecretGenerator<OsRng> {
    /// Generator backed by the operating system's CSPRNG.
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for GlobalSecretGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> GlobalSecretGenerator<R> {
    /// Generator drawing from an explicit random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            indent: DEFAULT_STORE_INDENT,
        }
    }

    /// Set the JSON indent width used when rewriting the store.
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Merge a fresh key into `store` in memory.
    ///
    /// Returns the key and whether a previous one was replaced.
    pub fn augment(&mut self, store: &mut SecretStore) -> (FeatureUnlockKey, bool) {
        let key = FeatureUnlockKey::generate(&mut self.rng);
        let replaced_raw = store.insert(FEATURE_UNLOCK_KEY, key.to_raw_string()).is_some();
        let replaced_str = store
            .insert(FEATURE_UNLOCK_KEY_STR, key.to_array_string())
            .is_some();
        (key, replaced_raw || replaced_str)
    }

    /// Load the store at `path` (empty if absent), add a fresh key and rewrite it.
    pub fn run(&mut self, path: &Path) -> Result<GenerationReport, StoreError> {
        let created = !path.exists();
        let mut store = SecretStore::load_or_default(path)?;

        let (_, replaced) = self.augment(&mut store);
        let preserved = store
            .keys()
            .filter(|k| *k != FEATURE_UNLOCK_KEY && *k != FEATURE_UNLOCK_KEY_STR)
            .count();

        store.save(path, self.indent)?;

        tracing::info!(
            path = %path.display(),
            created,
            replaced,
            preserved,
            "feature-unlock key written"
        );

        Ok(GenerationReport {
            created,
            preserved,
            replaced,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::array::parse_fixed_byte_array;

    /// Deterministic source that repeats a single byte.
    struct FillRng(u8);

    impl RngCore for FillRng {
        fn next_u32(&mut self) -> u32 {
            u32::from_ne_bytes([self.0; 4])
        }

        fn next_u64(&mut self) -> u64 {
            u64::from_ne_bytes([self.0; 8])
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl CryptoRng for FillRng {}

    #[test]
    fn from_u128_is_big_endian() {
        let key = FeatureUnlockKey::from_u128(0x0102);
        let mut expected = [0u8; 16];
        expected[14] = 1;
        expected[15] = 2;
        assert_eq!(key.as_bytes(), &expected);
        assert_eq!(key.to_u128(), 0x0102);
    }

    #[test]
    fn array_string_renders_every_byte() {
        let key = FeatureUnlockKey::from_u128(u128::MAX);
        assert_eq!(
            key.to_array_string(),
            "[255,255,255,255,255,255,255,255,255,255,255,255,255,255,255,255]"
        );
        assert_eq!(
            FeatureUnlockKey::from_u128(0).to_array_string(),
            "[0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0]"
        );
    }

    #[test]
    fn raw_string_is_hex() {
        let key = FeatureUnlockKey::from_u128(0xdead_beef);
        assert_eq!(key.to_raw_string(), "000000000000000000000000deadbeef");
    }

    #[test]
    fn generated_key_has_sixteen_entries() {
        let key = FeatureUnlockKey::generate(&mut OsRng);
        let parsed: [u8; 16] = parse_fixed_byte_array(&key.to_array_string()).unwrap();
        assert_eq!(&parsed, key.as_bytes());
    }

    #[test]
    fn debug_redacts_key() {
        let key = FeatureUnlockKey::from_u128(0x4242);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("66"));
    }

    #[test]
    fn augment_adds_both_keys_and_keeps_others() {
        let mut store: SecretStore = [("7_secret_str", "abc")].into_iter().collect();
        let mut generator = GlobalSecretGenerator::with_rng(FillRng(3));

        let (key, replaced) = generator.augment(&mut store);

        assert!(!replaced);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("7_secret_str"), Some("abc"));
        assert_eq!(store.get(FEATURE_UNLOCK_KEY_STR), Some(key.to_array_string().as_str()));
        assert_eq!(store.get(FEATURE_UNLOCK_KEY), Some("03030303030303030303030303030303"));
    }

    #[test]
    fn run_creates_store_with_two_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("global_secrets.json");

        let report = GlobalSecretGenerator::with_rng(FillRng(1)).run(&path).unwrap();

        assert!(report.created);
        assert!(!report.replaced);
        assert_eq!(report.preserved, 0);

        let store = SecretStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get(FEATURE_UNLOCK_KEY_STR),
            Some("[1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1]")
        );
    }

    #[test]
    fn run_twice_replaces_key_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("global_secrets.json");
        let seed: SecretStore = [("1_secret_str", "one"), ("2_secret_str", "two")]
            .into_iter()
            .collect();
        seed.save_default(&path).unwrap();

        GlobalSecretGenerator::with_rng(FillRng(5)).run(&path).unwrap();
        let report = GlobalSecretGenerator::with_rng(FillRng(6)).run(&path).unwrap();

        assert!(!report.created);
        assert!(report.replaced);
        assert_eq!(report.preserved, 2);

        let store = SecretStore::open(&path).unwrap();
        assert_eq!(store.get("1_secret_str"), Some("one"));
        assert_eq!(store.get("2_secret_str"), Some("two"));
        assert_eq!(
            store.get(FEATURE_UNLOCK_KEY_STR),
            Some("[6,6,6,6,6,6,6,6,6,6,6,6,6,6,6,6]")
        );
    }

    #[test]
    fn run_on_malformed_store_fails_without_rewriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("global_secrets.json");
        std::fs::write(&path, "not json").unwrap();

        let err = GlobalSecretGenerator::new().run(&path).unwrap_err();

        assert!(matches!(err, StoreError::Malformed { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[test]
    fn run_honours_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("global_secrets.json");

        GlobalSecretGenerator::with_rng(FillRng(0))
            .indent(2)
            .run(&path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\n  \"feature_unlock_key\""), "got: {content}");
    }
}
