//! A characteristic field together with its value

use super::value::FieldValue;
use crate::error::{GattParserError, Result};
use crate::num::Integer;
use crate::schema::{Enumeration, Field, FieldSize, FieldType};
use num_bigint::BigInt;
use num_traits::FromPrimitive;
use std::fmt;
use std::sync::Arc;

/// One field of a characteristic and, optionally, its value.
///
/// A value that is set is always representable in the field's declared kind and width; the
/// setters convert or reject anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldHolder {
    field: Arc<Field>,
    value: Option<FieldValue>,
}

impl FieldHolder {
    /// Create a holder with no value
    pub fn new(field: Arc<Field>) -> Self {
        Self { field, value: None }
    }

    /// Create a holder for a value the decoder produced
    pub(crate) fn with_value(field: Arc<Field>, value: FieldValue) -> Self {
        Self {
            field,
            value: Some(value),
        }
    }

    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    pub fn name(&self) -> &str {
        &self.field.name
    }

    pub fn value(&self) -> Option<&FieldValue> {
        self.value.as_ref()
    }

    pub fn is_value_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    fn require_value(&self) -> Result<&FieldValue> {
        self.value
            .as_ref()
            .ok_or_else(|| GattParserError::FieldValueUnset(self.field.name.clone()))
    }

    fn mismatch(&self, expected: &'static str, actual: &FieldValue) -> GattParserError {
        GattParserError::FieldTypeMismatch {
            field: self.field.name.clone(),
            expected,
            actual: actual.kind(),
        }
    }

    pub fn get_boolean(&self) -> Result<bool> {
        match self.require_value()? {
            FieldValue::Boolean(v) => Ok(*v),
            other => Err(self.mismatch("boolean", other)),
        }
    }

    /// The integer value in whichever representation the field width uses
    pub fn get_integer_value(&self) -> Result<&Integer> {
        match self.require_value()? {
            FieldValue::Integer(v) => Ok(v),
            other => Err(self.mismatch("integer", other)),
        }
    }

    pub fn get_integer(&self) -> Result<i32> {
        let value = self.get_integer_value()?;
        value.to_i32().ok_or_else(|| self.out_of_range(value, 32))
    }

    pub fn get_long(&self) -> Result<i64> {
        let value = self.get_integer_value()?;
        value.to_i64().ok_or_else(|| self.out_of_range(value, 64))
    }

    pub fn get_big_integer(&self) -> Result<BigInt> {
        Ok(self.get_integer_value()?.to_big())
    }

    fn out_of_range(&self, value: &Integer, size: usize) -> GattParserError {
        GattParserError::ValueOutOfRange {
            value: value.to_string(),
            size,
            signed: true,
        }
    }

    pub fn get_float(&self) -> Result<f32> {
        match self.require_value()? {
            FieldValue::Float(v) => Ok(*v),
            other => Err(self.mismatch("float", other)),
        }
    }

    /// The value as a double.
    ///
    /// Integer values are scaled by the field's multiplier, decimal exponent and binary exponent,
    /// so a `uint16` with decimal exponent -2 holding 2250 reads as 22.5.
    pub fn get_double(&self) -> Result<f64> {
        match self.require_value()? {
            FieldValue::Double(v) => Ok(*v),
            FieldValue::Float(v) => Ok(f64::from(*v)),
            FieldValue::Integer(v) => Ok(v.to_f64() * self.scale()),
            other => Err(self.mismatch("double", other)),
        }
    }

    pub fn get_string(&self) -> Result<&str> {
        match self.require_value()? {
            FieldValue::String(v) => Ok(v),
            other => Err(self.mismatch("string", other)),
        }
    }

    pub fn get_bytes(&self) -> Result<&[u8]> {
        match self.require_value()? {
            FieldValue::Bytes(v) => Ok(v),
            other => Err(self.mismatch("bytes", other)),
        }
    }

    /// Enumeration entry matching the current integer value
    pub fn enumeration(&self) -> Option<&Enumeration> {
        match &self.value {
            Some(FieldValue::Integer(v)) => v.to_i64().and_then(|key| self.field.enumeration(key)),
            _ => None,
        }
    }

    /// Requirement token activated by the current value, if any
    pub fn enumeration_requires(&self) -> Option<&str> {
        self.enumeration()
            .and_then(|enumeration| enumeration.requires.as_deref())
    }

    /// Factor applied to raw integers: multiplier × 10^decimal exponent × 2^binary exponent
    fn scale(&self) -> f64 {
        let mut scale = f64::from(self.field.multiplier.unwrap_or(1));
        if let Some(exponent) = self.field.decimal_exponent {
            scale *= 10f64.powi(exponent);
        }
        if let Some(exponent) = self.field.binary_exponent {
            scale *= 2f64.powi(exponent);
        }
        scale
    }

    /// Set the value, converting it to what the field declares.
    ///
    /// Integers must fit the field width; floating point values set on an integer field are
    /// divided by the field's scale and rounded.
    pub fn set_value(&mut self, value: impl Into<FieldValue>) -> Result<()> {
        let value = self.convert(value.into())?;
        self.value = Some(value);
        Ok(())
    }

    pub fn set_boolean(&mut self, value: bool) -> Result<()> {
        self.set_value(value)
    }

    pub fn set_integer(&mut self, value: impl Into<Integer>) -> Result<()> {
        self.set_value(FieldValue::Integer(value.into()))
    }

    pub fn set_float(&mut self, value: f32) -> Result<()> {
        self.set_value(value)
    }

    pub fn set_double(&mut self, value: f64) -> Result<()> {
        self.set_value(value)
    }

    pub fn set_string(&mut self, value: impl Into<String>) -> Result<()> {
        self.set_value(FieldValue::String(value.into()))
    }

    pub fn set_bytes(&mut self, value: impl Into<Vec<u8>>) -> Result<()> {
        self.set_value(FieldValue::Bytes(value.into()))
    }

    fn fixed_size(&self) -> Result<usize> {
        match self.field.format.size {
            FieldSize::Bits(size) => Ok(size),
            FieldSize::Full => Err(GattParserError::UnsupportedFieldSize {
                field: self.field.name.clone(),
                kind: self.field.format.field_type.name(),
            }),
        }
    }

    fn convert(&self, value: FieldValue) -> Result<FieldValue> {
        let field_type = self.field.format.field_type;
        match (field_type, value) {
            (FieldType::Boolean, value @ FieldValue::Boolean(_)) => Ok(value),
            (FieldType::UInt | FieldType::SInt, FieldValue::Integer(v)) => {
                self.fit_integer(v.to_big())
            }
            (FieldType::UInt | FieldType::SInt, FieldValue::Float(v)) => {
                self.fit_scaled(f64::from(v))
            }
            (FieldType::UInt | FieldType::SInt, FieldValue::Double(v)) => self.fit_scaled(v),
            (FieldType::FloatIeee754 | FieldType::FloatIeee11073, value) => {
                let number = match value {
                    FieldValue::Float(v) => f64::from(v),
                    FieldValue::Double(v) => v,
                    FieldValue::Integer(ref v) => v.to_f64(),
                    other => return Err(self.mismatch("float", &other)),
                };
                if self.fixed_size()? == 64 {
                    Ok(FieldValue::Double(number))
                } else {
                    Ok(FieldValue::Float(number as f32))
                }
            }
            (FieldType::Utf8s, FieldValue::String(v)) => {
                self.check_length(v.len())?;
                Ok(FieldValue::String(v))
            }
            (FieldType::Utf16s, FieldValue::String(v)) => {
                self.check_length(v.encode_utf16().count() * 2)?;
                Ok(FieldValue::String(v))
            }
            (FieldType::Struct, FieldValue::Bytes(v)) => {
                self.check_length(v.len())?;
                Ok(FieldValue::Bytes(v))
            }
            (field_type, other) => Err(self.mismatch(field_type.name(), &other)),
        }
    }

    fn fit_integer(&self, value: BigInt) -> Result<FieldValue> {
        let size = self.fixed_size()?;
        let signed = self.field.format.field_type == FieldType::SInt;
        Ok(FieldValue::Integer(Integer::fit(value, size, signed)?))
    }

    fn fit_scaled(&self, value: f64) -> Result<FieldValue> {
        let raw = (value / self.scale()).round();
        let raw = BigInt::from_f64(raw).ok_or(GattParserError::UnrepresentableFloat(value))?;
        self.fit_integer(raw)
    }

    /// Fixed-size strings and structs must fit their declared width
    fn check_length(&self, bytes: usize) -> Result<()> {
        if let FieldSize::Bits(size) = self.field.format.size {
            if bytes * 8 > size {
                return Err(GattParserError::ValueOutOfRange {
                    value: format!("{} bytes", bytes),
                    size,
                    signed: false,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for FieldHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {}", self.field.name, value)?,
            None => write!(f, "{}: <unset>", self.field.name)?,
        }
        if let (Some(unit), true) = (&self.field.unit, self.value.is_some()) {
            write!(f, " ({})", unit)?;
        }
        Ok(())
    }
}
