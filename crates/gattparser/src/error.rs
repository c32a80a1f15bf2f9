//! Error types for the gattparser library
//!
//! This module defines the error types used throughout the library.

use thiserror::Error;

/// Broad classes of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The characteristic is unknown or not usable for the requested operation
    SchemaRead,
    /// The raw bytes or a field value do not conform to the schema
    DataFormat,
    /// The schema declares something no formatter can handle
    Configuration,
    /// A request is missing required fields
    Validation,
}

/// Errors that can occur when parsing or serializing characteristic values
#[derive(Error, Debug)]
pub enum GattParserError {
    #[error("Unknown characteristic: {0}")]
    UnknownCharacteristic(String),

    #[error("Characteristic is not valid for read: {0}")]
    NotValidForRead(String),

    #[error("Characteristic is not valid for write: {0}")]
    NotValidForWrite(String),

    #[error("Unknown referenced characteristic type: {0}")]
    UnknownReference(String),

    #[error(
        "Not enough bits to parse field \"{field}\": required {required_bits}, available {available_bits}"
    )]
    InsufficientData {
        field: String,
        required_bits: usize,
        available_bits: usize,
    },

    #[error("Field \"{field}\" is not a valid {encoding} string")]
    InvalidString { field: String, encoding: &'static str },

    #[error("Value {value} cannot be represented in {size} bits (signed: {signed})")]
    ValueOutOfRange {
        value: String,
        size: usize,
        signed: bool,
    },

    #[error("Value {0} cannot be represented as an IEEE-11073 number")]
    UnrepresentableFloat(f64),

    #[error("Field \"{field}\" holds {actual}, requested {expected}")]
    FieldTypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Field \"{0}\" has no value set")]
    FieldValueUnset(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid raw byte string: {0}")]
    InvalidRawString(String),

    #[error("{formatter} formatter does not support {size}-bit numbers")]
    UnsupportedFloatSize {
        formatter: &'static str,
        size: usize,
    },

    #[error("Field \"{field}\" of kind {kind} cannot have this size")]
    UnsupportedFieldSize { field: String, kind: &'static str },

    #[error("GATT request is not valid: {0}")]
    InvalidRequest(String),
}

impl GattParserError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GattParserError::UnknownCharacteristic(_)
            | GattParserError::NotValidForRead(_)
            | GattParserError::NotValidForWrite(_)
            | GattParserError::UnknownReference(_) => ErrorKind::SchemaRead,
            GattParserError::InsufficientData { .. }
            | GattParserError::InvalidString { .. }
            | GattParserError::ValueOutOfRange { .. }
            | GattParserError::UnrepresentableFloat(_)
            | GattParserError::FieldTypeMismatch { .. }
            | GattParserError::FieldValueUnset(_)
            | GattParserError::UnknownField(_)
            | GattParserError::InvalidRawString(_) => ErrorKind::DataFormat,
            GattParserError::UnsupportedFloatSize { .. }
            | GattParserError::UnsupportedFieldSize { .. } => ErrorKind::Configuration,
            GattParserError::InvalidRequest(_) => ErrorKind::Validation,
        }
    }
}

/// Result type used across the library
pub type Result<T> = std::result::Result<T, GattParserError>;
