//! IEEE-11073 medical floating point formatter
//!
//! Personal health devices (ISO/IEEE 11073-20601) encode decimal numbers as a two's complement
//! mantissa and a base-10 exponent:
//!
//! - SFLOAT: 16 bits, 4-bit exponent (high nibble) and 12-bit mantissa
//! - FLOAT: 32 bits, 8-bit exponent (high byte) and 24-bit mantissa
//!
//! A handful of raw values with a zero exponent are reserved for NaN, NRes (not at this
//! resolution) and the infinities. NaN, NRes and the reserved value all decode to `NaN`.
//! There is no 64-bit variant.

use super::twos_complement::TwosComplementNumberFormatter;
use super::FloatingPointNumberFormatter;
use crate::bits::BitBuf;
use crate::error::{GattParserError, Result};

pub const SFLOAT_NAN: u16 = 0x07FF;
pub const SFLOAT_NRES: u16 = 0x0800;
pub const SFLOAT_POSITIVE_INFINITY: u16 = 0x07FE;
pub const SFLOAT_NEGATIVE_INFINITY: u16 = 0x0802;
pub const SFLOAT_RESERVED: u16 = 0x0801;

pub const FLOAT_NAN: u32 = 0x007F_FFFF;
pub const FLOAT_NRES: u32 = 0x0080_0000;
pub const FLOAT_POSITIVE_INFINITY: u32 = 0x007F_FFFE;
pub const FLOAT_NEGATIVE_INFINITY: u32 = 0x0080_0002;
pub const FLOAT_RESERVED: u32 = 0x0080_0001;

/// Layout of one of the two encodings
struct Layout {
    mantissa_bits: usize,
    exponent_bits: usize,
    /// Largest mantissa magnitude that is not a reserved value
    mantissa_max: i64,
    nan: u32,
    nres: u32,
    positive_infinity: u32,
    negative_infinity: u32,
    reserved: u32,
}

impl Layout {
    fn exponent_range(&self) -> (i32, i32) {
        let half = 1i32 << (self.exponent_bits - 1);
        (-half, half - 1)
    }

    fn size(&self) -> usize {
        self.mantissa_bits + self.exponent_bits
    }
}

const SFLOAT: Layout = Layout {
    mantissa_bits: 12,
    exponent_bits: 4,
    mantissa_max: 2045,
    nan: SFLOAT_NAN as u32,
    nres: SFLOAT_NRES as u32,
    positive_infinity: SFLOAT_POSITIVE_INFINITY as u32,
    negative_infinity: SFLOAT_NEGATIVE_INFINITY as u32,
    reserved: SFLOAT_RESERVED as u32,
};

const FLOAT: Layout = Layout {
    mantissa_bits: 24,
    exponent_bits: 8,
    mantissa_max: 8_388_605,
    nan: FLOAT_NAN,
    nres: FLOAT_NRES,
    positive_infinity: FLOAT_POSITIVE_INFINITY,
    negative_infinity: FLOAT_NEGATIVE_INFINITY,
    reserved: FLOAT_RESERVED,
};

/// IEEE-11073 floating point number formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct Ieee11073FloatingPointNumberFormatter {
    twos_complement: TwosComplementNumberFormatter,
}

impl Ieee11073FloatingPointNumberFormatter {
    fn decode(&self, layout: &Layout, bits: &BitBuf) -> f64 {
        let raw = bits.slice(0, layout.size()).to_u64() as u32;
        if raw == layout.positive_infinity {
            return f64::INFINITY;
        }
        if raw == layout.negative_infinity {
            return f64::NEG_INFINITY;
        }
        if raw == layout.nan || raw == layout.nres || raw == layout.reserved {
            return f64::NAN;
        }
        let mantissa = self.twos_complement.deserialize_long(
            &bits.slice(0, layout.mantissa_bits),
            layout.mantissa_bits,
            true,
        );
        let exponent = self.twos_complement.deserialize_long(
            &bits.slice(layout.mantissa_bits, layout.size()),
            layout.exponent_bits,
            true,
        );
        scale(mantissa, exponent as i32)
    }

    fn encode(&self, layout: &Layout, number: f64) -> Result<BitBuf> {
        let raw = if number.is_nan() {
            layout.nan
        } else if number == f64::INFINITY {
            layout.positive_infinity
        } else if number == f64::NEG_INFINITY {
            layout.negative_infinity
        } else {
            let (mantissa, exponent) = to_decimal(layout, number)?;
            let mantissa_mask = (1u32 << layout.mantissa_bits) - 1;
            let exponent_mask = (1u32 << layout.exponent_bits) - 1;
            ((exponent as u32 & exponent_mask) << layout.mantissa_bits)
                | (mantissa as u32 & mantissa_mask)
        };
        Ok(BitBuf::from_u64(u64::from(raw), layout.size()))
    }

    fn unsupported(size: usize) -> GattParserError {
        GattParserError::UnsupportedFloatSize {
            formatter: "IEEE-11073",
            size,
        }
    }
}

/// `mantissa * 10^exponent`, dividing for negative exponents to keep decimal fractions exact
fn scale(mantissa: i64, exponent: i32) -> f64 {
    if exponent < 0 {
        mantissa as f64 / 10f64.powi(-exponent)
    } else {
        mantissa as f64 * 10f64.powi(exponent)
    }
}

/// Find the most precise mantissa/exponent pair for `number`, then drop trailing zeros
fn to_decimal(layout: &Layout, number: f64) -> Result<(i64, i32)> {
    if number == 0.0 {
        return Ok((0, 0));
    }
    let (min_exponent, max_exponent) = layout.exponent_range();
    for exponent in min_exponent..=max_exponent {
        let mantissa = if exponent < 0 {
            (number * 10f64.powi(-exponent)).round()
        } else {
            (number / 10f64.powi(exponent)).round()
        };
        if mantissa.abs() > layout.mantissa_max as f64 {
            continue;
        }
        let mut mantissa = mantissa as i64;
        if mantissa == 0 {
            return Ok((0, 0));
        }
        let mut exponent = exponent;
        while mantissa % 10 == 0 && exponent < max_exponent {
            mantissa /= 10;
            exponent += 1;
        }
        return Ok((mantissa, exponent));
    }
    Err(GattParserError::UnrepresentableFloat(number))
}

impl FloatingPointNumberFormatter for Ieee11073FloatingPointNumberFormatter {
    fn deserialize_sfloat(&self, bits: &BitBuf) -> Result<f32> {
        Ok(self.decode(&SFLOAT, bits) as f32)
    }

    fn deserialize_float(&self, bits: &BitBuf) -> Result<f32> {
        Ok(self.decode(&FLOAT, bits) as f32)
    }

    fn deserialize_double(&self, _bits: &BitBuf) -> Result<f64> {
        Err(Self::unsupported(64))
    }

    fn serialize_sfloat(&self, number: f32) -> Result<BitBuf> {
        self.encode(&SFLOAT, shortest_f64(number))
    }

    fn serialize_float(&self, number: f32) -> Result<BitBuf> {
        self.encode(&FLOAT, shortest_f64(number))
    }

    fn serialize_double(&self, _number: f64) -> Result<BitBuf> {
        Err(Self::unsupported(64))
    }
}

/// Widen an `f32` through its shortest decimal form so 36.6f32 becomes 36.6, not 36.59999847
fn shortest_f64(number: f32) -> f64 {
    if !number.is_finite() {
        return f64::from(number);
    }
    number.to_string().parse().unwrap_or_else(|_| f64::from(number))
}
