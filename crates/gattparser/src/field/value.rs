//! Typed field values

use crate::num::Integer;
use num_bigint::BigInt;
use std::fmt;

/// The value of one characteristic field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Boolean(bool),
    Integer(Integer),
    Float(f32),
    Double(f64),
    String(String),
    /// Opaque struct data, passed through untouched
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Name of the value kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Double(_) => "double",
            FieldValue::String(_) => "string",
            FieldValue::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Double(v) => write!(f, "{}", v),
            FieldValue::String(v) => write!(f, "{}", v),
            FieldValue::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Integer> for FieldValue {
    fn from(value: Integer) -> Self {
        FieldValue::Integer(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Integer(Integer::$variant(<$target>::from(value)))
                }
            }
        )*
    };
}

impl_from_int!(
    u8 => Int as i32,
    i8 => Int as i32,
    u16 => Int as i32,
    i16 => Int as i32,
    i32 => Int as i32,
    u32 => Long as i64,
    i64 => Long as i64,
);

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Integer(Integer::Big(BigInt::from(value)))
    }
}

impl From<BigInt> for FieldValue {
    fn from(value: BigInt) -> Self {
        FieldValue::Integer(Integer::Big(value))
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue::Bytes(value.to_vec())
    }
}
