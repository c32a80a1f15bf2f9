//! IEEE-754 binary floating point formatter
//!
//! Reinterprets bit patterns as standard binary32/binary64 values. Half precision is not
//! supported.

use super::FloatingPointNumberFormatter;
use crate::bits::BitBuf;
use crate::error::{GattParserError, Result};
use byteorder::{ByteOrder, LittleEndian};

/// IEEE-754 floating point number formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct Ieee754FloatingPointNumberFormatter;

impl Ieee754FloatingPointNumberFormatter {
    fn unsupported(size: usize) -> GattParserError {
        GattParserError::UnsupportedFloatSize {
            formatter: "IEEE-754",
            size,
        }
    }
}

impl FloatingPointNumberFormatter for Ieee754FloatingPointNumberFormatter {
    fn deserialize_sfloat(&self, _bits: &BitBuf) -> Result<f32> {
        Err(Self::unsupported(16))
    }

    fn deserialize_float(&self, bits: &BitBuf) -> Result<f32> {
        Ok(LittleEndian::read_f32(bits.slice(0, 32).as_bytes()))
    }

    fn deserialize_double(&self, bits: &BitBuf) -> Result<f64> {
        Ok(LittleEndian::read_f64(bits.slice(0, 64).as_bytes()))
    }

    fn serialize_sfloat(&self, _number: f32) -> Result<BitBuf> {
        Err(Self::unsupported(16))
    }

    fn serialize_float(&self, number: f32) -> Result<BitBuf> {
        let mut bytes = [0u8; 4];
        LittleEndian::write_f32(&mut bytes, number);
        Ok(BitBuf::from_bytes(&bytes))
    }

    fn serialize_double(&self, number: f64) -> Result<BitBuf> {
        let mut bytes = [0u8; 8];
        LittleEndian::write_f64(&mut bytes, number);
        Ok(BitBuf::from_bytes(&bytes))
    }
}
