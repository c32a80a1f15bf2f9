//! Characteristic codecs
//!
//! [`GenericCharacteristicParser`] decodes and encodes any characteristic from its field
//! definitions. [`BluetoothGattParser`] routes each characteristic UUID either to it or to a
//! custom [`CharacteristicParser`] registered in a [`ParserRegistry`].

pub mod dispatcher;
pub mod generic;
pub mod raw;
pub mod registry;


use crate::error::Result;
use crate::field::FieldHolder;
use crate::schema::Characteristic;

pub use self::dispatcher::BluetoothGattParser;
pub use self::generic::GenericCharacteristicParser;
pub use self::raw::{format_raw, parse_raw};
pub use self::registry::ParserRegistry;

/// Default maximum payload of a single write
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 20;

/// Codec configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Encoded values longer than this are truncated
    pub max_payload_len: usize,
    /// Whether [`BluetoothGattParser::serialize`] rejects requests that fail validation
    pub strict_by_default: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            strict_by_default: true,
        }
    }
}

/// A codec for characteristic values.
///
/// Implementations are interchangeable: the dispatcher calls the same two methods whether the
/// generic codec or a custom one serves a characteristic.
pub trait CharacteristicParser: Send + Sync {
    /// Decode a raw value into field holders, in field order
    fn parse(&self, characteristic: &Characteristic, raw: &[u8]) -> Result<Vec<FieldHolder>>;

    /// Encode the holders that have a value
    fn serialize(&self, holders: &[FieldHolder]) -> Result<Vec<u8>>;
}
