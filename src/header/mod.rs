//! Fob secrets header emission.
//!
//! Produces the C header consumed by the fob firmware build. The text is
//! read verbatim by the preprocessor, so macro names, quoting and blank
//! lines are fixed:
//!
//! ```text
//! #ifndef __FOB_SECRETS__
//! #define __FOB_SECRETS__
//!
//! #define PAIRED <0|1>
//! #define PAIR_PIN "<array-string>"
//! #define CAR_ID "<car id or 000000>"
//! #define FEATURE_UNLOCK_KEY "<array-string>"
//! #define CAR_SECRET "<string>"
//!
//! #endif
//! ```

pub mod pin;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::{
    FEATURE_UNLOCK_KEY_STR, HEADER_GUARD, SECRET_WIDTH, UNPAIRED_PLACEHOLDER, car_secret_key,
};
use crate::secrets::array::{format_byte_array, parse_fixed_byte_array};
use crate::secrets::store::{SecretStore, StoreError};

pub use pin::PinHash;

/// Errors during header emission.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no secret for car {car_id} in {path} (expected key `{key}`)")]
    MissingCarSecret {
        car_id: u64,
        key: String,
        path: PathBuf,
    },

    #[error("secret store {path} has no `feature_unlock_key_str`; generate global secrets first")]
    MissingFeatureUnlockKey { path: PathBuf },

    #[error("failed to write header {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Pairing parameters for a paired fob.
#[derive(Clone, PartialEq, Eq)]
pub struct Pairing {
    pub car_id: u64,
    pub pin: String,
    /// Secret store holding the feature-unlock key and the car's secret.
    pub secret_file: PathBuf,
}

impl fmt::Debug for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pairing")
            .field("car_id", &self.car_id)
            .field("pin", &"[REDACTED]")
            .field("secret_file", &self.secret_file)
            .finish()
    }
}

/// Which header to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceMode {
    /// Fob ships without a car; all secrets are placeholders.
    Unpaired,
    /// Fob ships paired to a specific car.
    Paired(Pairing),
}

/// Errors turning command-line flags into a [`DeviceMode`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModeError {
    #[error("--paired requires --car-id and --pair-pin")]
    MissingPairing,

    #[error("--paired requires --secret-file (or [store] secret_file in the config)")]
    MissingSecretFile,
}

impl DeviceMode {
    /// Build the mode from the `header` flags.
    ///
    /// `secret_file` is the already-resolved store path (flag, then config).
    /// It is ignored when `paired` is false and never opened here.
    pub fn from_flags(
        paired: bool,
        car_id: Option<u64>,
        pin: Option<String>,
        secret_file: Option<PathBuf>,
    ) -> Result<Self, ModeError> {
        if !paired {
            if secret_file.is_some() {
                tracing::debug!("secret store path ignored for an unpaired fob");
            }
            return Ok(DeviceMode::Unpaired);
        }

        let (Some(car_id), Some(pin)) = (car_id, pin) else {
            return Err(ModeError::MissingPairing);
        };
        let secret_file = secret_file.ok_or(ModeError::MissingSecretFile)?;

        Ok(DeviceMode::Paired(Pairing {
            car_id,
            pin,
            secret_file,
        }))
    }

    pub fn is_paired(&self) -> bool {
        matches!(self, DeviceMode::Paired(_))
    }
}

/// Macro values of a fob secrets header, ready to render.
#[derive(Clone, PartialEq, Eq)]
pub struct FobHeader {
    paired: bool,
    pair_pin: String,
    car_id: String,
    feature_unlock_key: String,
    car_secret: String,
}

impl fmt::Debug for FobHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FobHeader")
            .field("paired", &self.paired)
            .field("car_id", &self.car_id)
            .finish_non_exhaustive()
    }
}

impl FobHeader {
    /// Header for an unpaired fob. Reads nothing.
    pub fn unpaired() -> Self {
        let zeros = format_byte_array(&[0u8; SECRET_WIDTH]);
        Self {
            paired: false,
            pair_pin: zeros.clone(),
            car_id: UNPAIRED_PLACEHOLDER.to_string(),
            feature_unlock_key: zeros,
            car_secret: UNPAIRED_PLACEHOLDER.to_string(),
        }
    }

    /// Header for a fob paired to `car_id`, using secrets from `store`.
    ///
    /// `store_path` is only used for error messages. The feature-unlock key
    /// and car secret are copied verbatim.
    pub fn paired(
        car_id: u64,
        pin: &str,
        store: &SecretStore,
        store_path: &Path,
    ) -> Result<Self, HeaderError> {
        let key = car_secret_key(car_id);
        let car_secret = store
            .get(&key)
            .ok_or_else(|| HeaderError::MissingCarSecret {
                car_id,
                key: key.clone(),
                path: store_path.to_path_buf(),
            })?
            .to_string();

        let feature_unlock_key = store
            .get(FEATURE_UNLOCK_KEY_STR)
            .ok_or_else(|| HeaderError::MissingFeatureUnlockKey {
                path: store_path.to_path_buf(),
            })?
            .to_string();

        if let Err(e) = parse_fixed_byte_array::<SECRET_WIDTH>(&feature_unlock_key) {
            tracing::warn!(
                path = %store_path.display(),
                "`{FEATURE_UNLOCK_KEY_STR}` is not a {SECRET_WIDTH}-byte array string ({e}); copying it as-is"
            );
        }

        Ok(Self {
            paired: true,
            pair_pin: PinHash::of(pin).to_array_string(),
            car_id: car_id.to_string(),
            feature_unlock_key,
            car_secret,
        })
    }

    /// Build the header for `mode`, opening the secret store when paired.
    pub fn for_mode(mode: &DeviceMode) -> Result<Self, HeaderError> {
        match mode {
            DeviceMode::Unpaired => Ok(Self::unpaired()),
            DeviceMode::Paired(pairing) => {
                let store = SecretStore::open(&pairing.secret_file)?;
                tracing::debug!(
                    path = %pairing.secret_file.display(),
                    entries = store.len(),
                    "secret store loaded"
                );
                Self::paired(pairing.car_id, &pairing.pin, &store, &pairing.secret_file)
            }
        }
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }

    pub fn car_id(&self) -> &str {
        &self.car_id
    }

    /// Render the header text.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Overwrite `path` with the rendered header.
    pub fn write_to(&self, path: &Path) -> Result<(), HeaderError> {
        std::fs::write(path, self.render()).map_err(|e| HeaderError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl fmt::Display for FobHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#ifndef {HEADER_GUARD}")?;
        writeln!(f, "#define {HEADER_GUARD}")?;
        writeln!(f)?;
        writeln!(f, "#define PAIRED {}", u8::from(self.paired))?;
        writeln!(f, "#define PAIR_PIN \"{}\"", self.pair_pin)?;
        writeln!(f, "#define CAR_ID \"{}\"", self.car_id)?;
        writeln!(f, "#define FEATURE_UNLOCK_KEY \"{}\"", self.feature_unlock_key)?;
        writeln!(f, "#define CAR_SECRET \"{}\"", self.car_secret)?;
        writeln!(f)?;
        writeln!(f, "#endif")
    }
}

/// Build the header for `mode` and write it to `header_file`.
///
/// Nothing is written unless the header was built successfully.
pub fn emit_header(mode: &DeviceMode, header_file: &Path) -> Result<FobHeader, HeaderError> {
    let header = FobHeader::for_mode(mode)?;
    header.write_to(header_file)?;
    tracing::info!(
        path = %header_file.display(),
        paired = header.is_paired(),
        "fob header written"
    );
    Ok(header)
}
