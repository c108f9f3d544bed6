//! Secret store management and global secret generation.
//!
//! The store file is shared state between builds: the global generator
//! writes it, the header emitter reads it. Both take its path explicitly.

pub mod array;
pub mod generator;
pub mod store;

pub use array::{ArrayStringError, format_byte_array, parse_byte_array, parse_fixed_byte_array};
pub use generator::{FeatureUnlockKey, GenerationReport, GlobalSecretGenerator};
pub use store::{SecretStore, StoreError};
