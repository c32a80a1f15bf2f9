//! Two's complement integer formatter
//!
//! Reads and writes integers of arbitrary bit width. The widest bit is the sign bit for signed
//! values; unsigned values are never sign-extended. Stateless and safe to share between threads.

use super::integer::{bounds, Integer, IntegerRepr};
use crate::bits::BitBuf;
use crate::error::{GattParserError, Result};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::One;

/// Two's complement integer formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct TwosComplementNumberFormatter;

impl TwosComplementNumberFormatter {
    /// Decode the first `size` bits of `bits` using the representation that width calls for
    pub fn deserialize(&self, bits: &BitBuf, size: usize, signed: bool) -> Integer {
        match IntegerRepr::for_size(size, signed) {
            IntegerRepr::Int => Integer::Int(self.deserialize_integer(bits, size, signed)),
            IntegerRepr::Long => Integer::Long(self.deserialize_long(bits, size, signed)),
            IntegerRepr::Big => Integer::Big(self.deserialize_big_integer(bits, size, signed)),
        }
    }

    /// Decode up to 32 bits
    pub fn deserialize_integer(&self, bits: &BitBuf, size: usize, signed: bool) -> i32 {
        self.deserialize_long(bits, size.min(32), signed) as i32
    }

    /// Decode up to 64 bits
    pub fn deserialize_long(&self, bits: &BitBuf, size: usize, signed: bool) -> i64 {
        let size = size.min(64);
        let raw = bits.slice(0, size).to_u64();
        if signed && size > 0 && size < 64 && raw & (1 << (size - 1)) != 0 {
            (raw | (u64::MAX << size)) as i64
        } else {
            raw as i64
        }
    }

    /// Decode any number of bits
    pub fn deserialize_big_integer(&self, bits: &BitBuf, size: usize, signed: bool) -> BigInt {
        let slice = bits.slice(0, size);
        let value = BigInt::from_biguint(Sign::Plus, BigUint::from_bytes_le(slice.as_bytes()));
        if signed && size > 0 && slice.get(size - 1) {
            value - (BigInt::one() << size)
        } else {
            value
        }
    }

    /// Encode `value` into exactly `size` bits.
    ///
    /// Fails if the value is outside the range `size` bits can represent.
    pub fn serialize(&self, value: &Integer, size: usize, signed: bool) -> Result<BitBuf> {
        let value = value.to_big();
        let (min, max) = bounds(size, signed);
        if value < min || value > max {
            return Err(GattParserError::ValueOutOfRange {
                value: value.to_string(),
                size,
                signed,
            });
        }
        let unsigned = if value.sign() == Sign::Minus {
            value + (BigInt::one() << size)
        } else {
            value
        };
        let (_, bytes) = unsigned.to_bytes_le();
        let mut buf = BitBuf::from_bytes(&bytes);
        buf.resize(size);
        Ok(buf)
    }
}
