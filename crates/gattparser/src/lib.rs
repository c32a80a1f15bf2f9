//! GattParser - A Rust library for decoding and encoding Bluetooth GATT characteristic values
//!
//! Characteristic values are byte strings whose layout is described by field definitions: bit
//! widths, numeric encodings and rules deciding which optional fields are present. This library
//! turns raw values into named, typed fields and back, driven by those definitions.
//! It includes arbitrary-width two's complement integers, IEEE-754 and IEEE-11073 floats,
//! flags-driven optional fields, nested characteristic references and a registry for custom
//! codecs. It does not talk to devices; pair it with a Bluetooth stack for that.

pub mod bits;
pub mod error;
pub mod field;
pub mod flags;
pub mod num;
pub mod parser;
pub mod schema;
pub mod uuid;

// Re-export common types for convenience
pub use error::{ErrorKind, GattParserError, Result};
pub use field::{FieldHolder, FieldValue, GattRequest, GattResponse};
pub use num::Integer;
pub use parser::{
    format_raw, parse_raw, BluetoothGattParser, CharacteristicParser, GenericCharacteristicParser,
    ParserConfig, ParserRegistry,
};
pub use schema::{
    Characteristic, Field, FieldFormat, FieldSize, FieldType, InMemorySpecificationReader,
    Properties, Service, SpecificationReader,
};
pub use uuid::{short_uuid, Uuid};
