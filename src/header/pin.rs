//! Pairing PIN hashing.
//!
//! Paired fob firmware compares against the MD5 digest of the PIN's UTF-8
//! bytes. MD5 is kept for byte compatibility with existing paired firmware;
//! changing it requires a coordinated firmware change.

use crate::constants::SECRET_WIDTH;
use crate::secrets::array::format_byte_array;

/// 16-byte digest of a pairing PIN.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PinHash([u8; SECRET_WIDTH]);

impl std::fmt::Debug for PinHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PinHash([REDACTED])")
    }
}

impl PinHash {
    /// Hash the UTF-8 encoding of `pin`.
    pub fn of(pin: &str) -> Self {
        Self(md5::compute(pin.as_bytes()).0)
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_WIDTH] {
        &self.0
    }

    /// Array-string rendering emitted as `PAIR_PIN`.
    pub fn to_array_string(&self) -> String {
        format_byte_array(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest_of_1234() {
        // md5("1234") = 81dc9bdb52d04dc20036dbd8313ed055
        let hash = PinHash::of("1234");
        assert_eq!(hex::encode(hash.as_bytes()), "81dc9bdb52d04dc20036dbd8313ed055");
        assert_eq!(
            hash.to_array_string(),
            "[129,220,155,219,82,208,77,194,0,54,219,216,49,62,208,85]"
        );
    }

    #[test]
    fn empty_pin_hashes() {
        assert_eq!(
            hex::encode(PinHash::of("").as_bytes()),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(PinHash::of("00ff42"), PinHash::of("00ff42"));
        assert_ne!(PinHash::of("1234"), PinHash::of("4321"));
    }

    #[test]
    fn non_ascii_pin_hashes_utf8_bytes() {
        let hash = PinHash::of("pïn");
        assert_eq!(hash.as_bytes(), &md5::compute("pïn".as_bytes()).0);
    }

    #[test]
    fn debug_redacts_digest() {
        assert_eq!(format!("{:?}", PinHash::of("1234")), "PinHash([REDACTED])");
    }
}
