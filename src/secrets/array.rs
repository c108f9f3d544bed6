//! Array-string codec.
//!
//! Firmware builds embed byte arrays as a bracketed list of unsigned
//! decimal bytes: `[b0,b1,...,bn]`. No whitespace, no padding, no leading
//! zeros and no trailing comma.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[((?:0|[1-9][0-9]{0,2})(?:,(?:0|[1-9][0-9]{0,2}))*)?\]$").unwrap()
});

/// Errors from parsing an array string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArrayStringError {
    #[error("not a bracketed decimal byte array: {0:?}")]
    Malformed(String),

    #[error("entry {index} is {value}, outside 0..=255")]
    OutOfRange { index: usize, value: u16 },

    #[error("expected {expected} entries, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Render bytes in canonical array-string form.
pub fn format_byte_array(bytes: &[u8]) -> String {
    let entries: Vec<String> = bytes.iter().map(u8::to_string).collect();
    format!("[{}]", entries.join(","))
}

/// Parse a canonical array string back into bytes.
pub fn parse_byte_array(input: &str) -> Result<Vec<u8>, ArrayStringError> {
    let caps = ARRAY_RE
        .captures(input)
        .ok_or_else(|| ArrayStringError::Malformed(input.to_string()))?;

    let Some(body) = caps.get(1) else {
        return Ok(Vec::new());
    };

    body.as_str()
        .split(',')
        .enumerate()
        .map(|(index, entry)| {
            // The regex caps entries at three digits, so u16 cannot overflow.
            let value: u16 = entry
                .parse()
                .map_err(|_| ArrayStringError::Malformed(input.to_string()))?;
            u8::try_from(value).map_err(|_| ArrayStringError::OutOfRange { index, value })
        })
        .collect()
}

/// Parse an array string that must hold exactly `N` bytes.
pub fn parse_fixed_byte_array<const N: usize>(input: &str) -> Result<[u8; N], ArrayStringError> {
    let bytes = parse_byte_array(input)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| ArrayStringError::LengthMismatch { expected: N, actual })
}
