//! Numeric formatters
//!
//! Stateless converters between bit sequences and numbers: two's complement integers of any
//! width, IEEE-754 binary floats and IEEE-11073 medical floats. A field's declared bit width
//! selects which conversion applies; a width the formatter cannot handle is reported as a
//! configuration error.

pub mod ieee11073;
pub mod ieee754;
pub mod integer;
pub mod twos_complement;


use crate::bits::BitBuf;
use crate::error::Result;

pub use self::ieee11073::Ieee11073FloatingPointNumberFormatter;
pub use self::ieee754::Ieee754FloatingPointNumberFormatter;
pub use self::integer::{Integer, IntegerRepr};
pub use self::twos_complement::TwosComplementNumberFormatter;

/// A floating point format with 16, 32 and 64-bit variants.
///
/// Implementations return a configuration error for variants they do not define.
pub trait FloatingPointNumberFormatter: Send + Sync {
    /// Read a 16-bit number
    fn deserialize_sfloat(&self, bits: &BitBuf) -> Result<f32>;

    /// Read a 32-bit number
    fn deserialize_float(&self, bits: &BitBuf) -> Result<f32>;

    /// Read a 64-bit number
    fn deserialize_double(&self, bits: &BitBuf) -> Result<f64>;

    /// Write a 16-bit number
    fn serialize_sfloat(&self, number: f32) -> Result<BitBuf>;

    /// Write a 32-bit number
    fn serialize_float(&self, number: f32) -> Result<BitBuf>;

    /// Write a 64-bit number
    fn serialize_double(&self, number: f64) -> Result<BitBuf>;
}
