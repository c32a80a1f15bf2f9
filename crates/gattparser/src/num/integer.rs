//! Width-dependent integer representation

use crate::error::{GattParserError, Result};
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use std::fmt;

/// The native representation chosen for an integer field of a given width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerRepr {
    /// Up to 31 unsigned or 32 signed bits
    Int,
    /// Up to 63 unsigned or 64 signed bits
    Long,
    /// Anything wider
    Big,
}

impl IntegerRepr {
    /// Pick the representation for a field of `size` bits
    pub fn for_size(size: usize, signed: bool) -> Self {
        if (signed && size <= 32) || (!signed && size < 32) {
            IntegerRepr::Int
        } else if (signed && size <= 64) || (!signed && size < 64) {
            IntegerRepr::Long
        } else {
            IntegerRepr::Big
        }
    }
}

/// A decoded integer value.
///
/// Equality compares numeric values, so `Integer::Int(5) == Integer::Long(5)`.
#[derive(Debug, Clone)]
pub enum Integer {
    Int(i32),
    Long(i64),
    Big(BigInt),
}

impl Integer {
    /// Check that `value` fits in `size` bits and wrap it in the representation that width uses
    pub fn fit(value: BigInt, size: usize, signed: bool) -> Result<Self> {
        let (min, max) = bounds(size, signed);
        if value < min || value > max {
            return Err(GattParserError::ValueOutOfRange {
                value: value.to_string(),
                size,
                signed,
            });
        }
        // in range, so the narrowing conversions cannot fail
        Ok(match IntegerRepr::for_size(size, signed) {
            IntegerRepr::Int => Integer::Int(value.to_i32().unwrap_or_default()),
            IntegerRepr::Long => Integer::Long(value.to_i64().unwrap_or_default()),
            IntegerRepr::Big => Integer::Big(value),
        })
    }

    pub fn to_big(&self) -> BigInt {
        match self {
            Integer::Int(v) => BigInt::from(*v),
            Integer::Long(v) => BigInt::from(*v),
            Integer::Big(v) => v.clone(),
        }
    }

    pub fn to_i32(&self) -> Option<i32> {
        match self {
            Integer::Int(v) => Some(*v),
            Integer::Long(v) => i32::try_from(*v).ok(),
            Integer::Big(v) => v.to_i32(),
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Integer::Int(v) => Some(i64::from(*v)),
            Integer::Long(v) => Some(*v),
            Integer::Big(v) => v.to_i64(),
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Integer::Int(v) => f64::from(*v),
            Integer::Long(v) => *v as f64,
            Integer::Big(v) => v.to_f64().unwrap_or(f64::NAN),
        }
    }
}

/// Inclusive range of values representable in `size` bits
pub(crate) fn bounds(size: usize, signed: bool) -> (BigInt, BigInt) {
    if size == 0 {
        return (BigInt::zero(), BigInt::zero());
    }
    if signed {
        let half = BigInt::one() << (size - 1);
        (-half.clone(), half - BigInt::one())
    } else {
        (BigInt::zero(), (BigInt::one() << size) - BigInt::one())
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        match (self.to_i64(), other.to_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_big() == other.to_big(),
        }
    }
}

impl Eq for Integer {}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Integer::Int(value)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer::Long(value)
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Integer::Long(i64::from(value))
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Integer::Big(value)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integer::Int(v) => write!(f, "{}", v),
            Integer::Long(v) => write!(f, "{}", v),
            Integer::Big(v) => write!(f, "{}", v),
        }
    }
}
