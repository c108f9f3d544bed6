//! fobgen — build-time secret provisioning for fob and car firmware (library crate).
//!
//! Re-exports public modules for the binary and integration tests.

pub mod config;
pub mod constants;
pub mod header;
pub mod logging;
pub mod secrets;
