//! Bluetooth UUIDs and the short identifiers characteristics are keyed by
//!
//! Characteristic and service definitions are looked up by their short, upper-case hex form
//! (`2A37`). Callers may pass either that form or a full 128-bit UUID string; [`short_uuid`]
//! normalizes both.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// Represents a 128-bit Bluetooth UUID.
///
/// Internally, the UUID is always stored as a 128-bit value in little-endian byte order.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Uuid {
    bytes: [u8; 16],
}

/// The base UUID used for constructing 128-bit UUIDs from 16-bit and 32-bit values.
/// Defined as "00000000-0000-1000-8000-00805F9B34FB" (little-endian representation).
const BASE_UUID_BYTES: [u8; 16] = [
    0xFB, 0x34, 0x9B, 0x5F, 0x80, 0x00, 0x00, 0x80, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Offset within the base UUID where the 16/32-bit value is inserted.
const BASE_OFFSET: usize = 12;

impl Uuid {
    /// Creates a new 128-bit UUID directly from 16 bytes (big-endian).
    pub fn from_bytes_be(mut bytes: [u8; 16]) -> Self {
        bytes.reverse();
        Uuid { bytes }
    }

    /// Creates a 128-bit UUID from a 16-bit SIG-assigned value.
    pub const fn from_u16(uuid16: u16) -> Self {
        Self::from_u32(uuid16 as u32)
    }

    /// Creates a 128-bit UUID from a 32-bit SIG-assigned value.
    /// Formula: `value * 2^96 + BASE_UUID`
    pub const fn from_u32(uuid32: u32) -> Self {
        let mut bytes = BASE_UUID_BYTES;
        bytes[BASE_OFFSET] = uuid32 as u8;
        bytes[BASE_OFFSET + 1] = (uuid32 >> 8) as u8;
        bytes[BASE_OFFSET + 2] = (uuid32 >> 16) as u8;
        bytes[BASE_OFFSET + 3] = (uuid32 >> 24) as u8;
        Uuid { bytes }
    }

    /// Returns the underlying 16 bytes in big-endian order.
    pub fn as_bytes_be(&self) -> [u8; 16] {
        let mut bytes = self.bytes;
        bytes.reverse();
        bytes
    }

    /// Checks if the UUID is derived from the standard Bluetooth base UUID.
    fn is_sig_assigned(&self) -> bool {
        self.bytes[0..BASE_OFFSET] == BASE_UUID_BYTES[0..BASE_OFFSET]
    }

    /// Tries to represent the UUID as a 32-bit value.
    ///
    /// Returns `Some(u32)` if the UUID is derived from the Bluetooth base UUID.
    pub fn as_u32(&self) -> Option<u32> {
        if self.is_sig_assigned() {
            Some(u32::from_le_bytes([
                self.bytes[BASE_OFFSET],
                self.bytes[BASE_OFFSET + 1],
                self.bytes[BASE_OFFSET + 2],
                self.bytes[BASE_OFFSET + 3],
            ]))
        } else {
            None
        }
    }

    /// The identifier definitions are registered under, in upper-case hex without leading zeros:
    /// the assigned value for SIG-assigned UUIDs, the first 32 bits otherwise.
    pub fn short_form(&self) -> String {
        let value = self.as_u32().unwrap_or_else(|| {
            let b = self.as_bytes_be();
            u32::from_be_bytes([b[0], b[1], b[2], b[3]])
        });
        format!("{:X}", value)
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.as_bytes_be();
        write!(
            f,
            "{}-{}-{}-{}-{}",
            hex::encode(&b[0..4]),
            hex::encode(&b[4..6]),
            hex::encode(&b[6..8]),
            hex::encode(&b[8..10]),
            hex::encode(&b[10..16])
        )
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_u32() {
            Some(value) if value <= u16::MAX as u32 => write!(f, "Uuid(0x{:04X})", value),
            Some(value) => write!(f, "Uuid(0x{:08X})", value),
            None => fmt::Display::fmt(self, f),
        }
    }
}

#[derive(Debug, Error)]
pub enum UuidParseError {
    #[error("invalid UUID length")]
    InvalidLength,
    #[error("invalid UUID format")]
    InvalidFormat,
    #[error("invalid UUID hex: {0}")]
    HexError(#[from] hex::FromHexError),
}

impl From<ParseIntError> for UuidParseError {
    fn from(_: ParseIntError) -> Self {
        UuidParseError::InvalidFormat
    }
}

impl FromStr for Uuid {
    type Err = UuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            return Err(UuidParseError::InvalidFormat);
        }
        let cleaned: String = s.chars().filter(|c| c.is_ascii_hexdigit()).collect();

        match cleaned.len() {
            1..=4 => Ok(Uuid::from_u16(u16::from_str_radix(&cleaned, 16)?)),
            5..=8 => Ok(Uuid::from_u32(u32::from_str_radix(&cleaned, 16)?)),
            32 => {
                let mut bytes_be = [0u8; 16];
                hex::decode_to_slice(&cleaned, &mut bytes_be)?;
                Ok(Uuid::from_bytes_be(bytes_be))
            }
            _ => Err(UuidParseError::InvalidLength),
        }
    }
}

/// Normalize a characteristic or service identifier to its short, upper-case form.
///
/// Identifiers shorter than 8 characters are only upper-cased. Longer ones are reduced to the
/// value of their first 8 hex digits, so `0000180d-0000-1000-8000-00805f9b34fb` becomes `180D`.
pub fn short_uuid(uuid: &str) -> String {
    let uuid = uuid.trim();
    if uuid.len() < 8 {
        return uuid.to_uppercase();
    }
    if let Ok(parsed) = uuid.parse::<Uuid>() {
        return parsed.short_form();
    }
    match uuid.get(0..8).map(|head| u32::from_str_radix(head, 16)) {
        Some(Ok(value)) => format!("{:X}", value),
        _ => uuid.to_uppercase(),
    }
}
