//! Schema-driven codec for any characteristic

use super::{CharacteristicParser, ParserConfig};
use crate::bits::BitBuf;
use crate::error::{GattParserError, Result};
use crate::field::{FieldHolder, FieldValue};
use crate::flags;
use crate::num::{
    FloatingPointNumberFormatter, Ieee11073FloatingPointNumberFormatter,
    Ieee754FloatingPointNumberFormatter, TwosComplementNumberFormatter,
};
use crate::schema::{Characteristic, Field, FieldSize, FieldType, SpecificationReader};
use log::debug;
use std::sync::Arc;

/// How much of the input a field list consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Consumed {
    Bits(usize),
    /// A full-size field took the rest of the input
    Full,
}

/// Decodes and encodes characteristic values by walking their field definitions.
///
/// Fields are laid out back to back in little-endian bit order. Optional fields are present only
/// when their requirement tokens are active, references are decoded in place, and a full-size
/// field ends the value.
pub struct GenericCharacteristicParser {
    reader: Arc<dyn SpecificationReader>,
    config: ParserConfig,
    twos_complement: TwosComplementNumberFormatter,
    ieee754: Ieee754FloatingPointNumberFormatter,
    ieee11073: Ieee11073FloatingPointNumberFormatter,
}

impl GenericCharacteristicParser {
    pub fn new(reader: Arc<dyn SpecificationReader>) -> Self {
        Self::with_config(reader, ParserConfig::default())
    }

    pub fn with_config(reader: Arc<dyn SpecificationReader>, config: ParserConfig) -> Self {
        Self {
            reader,
            config,
            twos_complement: TwosComplementNumberFormatter,
            ieee754: Ieee754FloatingPointNumberFormatter,
            ieee11073: Ieee11073FloatingPointNumberFormatter::default(),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn parse_fields(
        &self,
        characteristic: &Characteristic,
        bits: &BitBuf,
        holders: &mut Vec<FieldHolder>,
    ) -> Result<Consumed> {
        let active = flags::read_flags(&characteristic.fields, bits);
        let available = bits.len();
        let mut offset = 0;
        for field in &characteristic.fields {
            if !flags::is_required(field, &active) {
                debug!("Skipping field \"{}\": requirements not met", field.name);
                continue;
            }

            if let Some(type_name) = &field.reference {
                let referenced = self
                    .reader
                    .characteristic_by_type(type_name.trim())
                    .ok_or_else(|| GattParserError::UnknownReference(type_name.clone()))?;
                let remainder = bits.slice(offset, available.max(offset));
                match self.parse_fields(&referenced, &remainder, holders)? {
                    Consumed::Full => return Ok(Consumed::Full),
                    Consumed::Bits(size) => offset += size,
                }
                continue;
            }

            let size = match field.format.size {
                FieldSize::Bits(size) => size,
                FieldSize::Full => {
                    if !field.is_flags() {
                        let remainder = bits.slice(offset, available.max(offset));
                        let value = self.decode_value(field, &remainder)?;
                        debug!(
                            "Decoded field \"{}\" from the remaining {} bits",
                            field.name,
                            remainder.len()
                        );
                        holders.push(FieldHolder::with_value(field.clone(), value));
                    }
                    return Ok(Consumed::Full);
                }
            };

            if offset + size > available {
                return Err(GattParserError::InsufficientData {
                    field: field.name.clone(),
                    required_bits: offset + size,
                    available_bits: available,
                });
            }
            if field.is_flags() {
                offset += size;
                continue;
            }
            let value = self.decode_value(field, &bits.slice(offset, offset + size))?;
            debug!("Decoded field \"{}\" at bit {}: {}", field.name, offset, value);
            holders.push(FieldHolder::with_value(field.clone(), value));
            offset += size;
        }
        Ok(Consumed::Bits(offset))
    }

    fn decode_value(&self, field: &Field, bits: &BitBuf) -> Result<FieldValue> {
        let size = bits.len();
        let field_type = field.format.field_type;
        let value = match field_type {
            FieldType::Boolean if !field.format.is_full_size() => FieldValue::Boolean(bits.get(0)),
            FieldType::UInt | FieldType::SInt if !field.format.is_full_size() => {
                let signed = field_type == FieldType::SInt;
                FieldValue::Integer(self.twos_complement.deserialize(bits, size, signed))
            }
            FieldType::FloatIeee754 => self.decode_float(&self.ieee754, field, bits)?,
            FieldType::FloatIeee11073 => self.decode_float(&self.ieee11073, field, bits)?,
            FieldType::Utf8s => FieldValue::String(decode_utf8(field, bits.as_bytes())?),
            FieldType::Utf16s => FieldValue::String(decode_utf16(field, bits.as_bytes())?),
            FieldType::Struct => FieldValue::Bytes(bits.to_bytes()),
            _ => return Err(unsupported_size(field)),
        };
        Ok(value)
    }

    fn decode_float(
        &self,
        formatter: &dyn FloatingPointNumberFormatter,
        field: &Field,
        bits: &BitBuf,
    ) -> Result<FieldValue> {
        match field.format.size {
            FieldSize::Bits(16) => Ok(FieldValue::Float(formatter.deserialize_sfloat(bits)?)),
            FieldSize::Bits(32) => Ok(FieldValue::Float(formatter.deserialize_float(bits)?)),
            FieldSize::Bits(64) => Ok(FieldValue::Double(formatter.deserialize_double(bits)?)),
            _ => Err(unsupported_size(field)),
        }
    }

    fn encode_value(&self, holder: &FieldHolder) -> Result<BitBuf> {
        let field = holder.field();
        let field_type = field.format.field_type;
        let size = field.format.bits();
        match (field_type, size) {
            (FieldType::Boolean, Some(_)) => {
                Ok(BitBuf::from_u64(u64::from(holder.get_boolean()?), 1))
            }
            (FieldType::UInt | FieldType::SInt, Some(size)) => self.twos_complement.serialize(
                holder.get_integer_value()?,
                size,
                field_type == FieldType::SInt,
            ),
            (FieldType::FloatIeee754, _) => self.encode_float(&self.ieee754, holder),
            (FieldType::FloatIeee11073, _) => self.encode_float(&self.ieee11073, holder),
            (FieldType::Utf8s, _) => Ok(BitBuf::from_bytes(holder.get_string()?.as_bytes())),
            (FieldType::Utf16s, _) => {
                let bytes: Vec<u8> = holder
                    .get_string()?
                    .encode_utf16()
                    .flat_map(u16::to_le_bytes)
                    .collect();
                Ok(BitBuf::from_bytes(&bytes))
            }
            (FieldType::Struct, _) => Ok(BitBuf::from_bytes(holder.get_bytes()?)),
            _ => Err(unsupported_size(field)),
        }
    }

    fn encode_float(
        &self,
        formatter: &dyn FloatingPointNumberFormatter,
        holder: &FieldHolder,
    ) -> Result<BitBuf> {
        match holder.field().format.size {
            FieldSize::Bits(16) => formatter.serialize_sfloat(holder.get_float()?),
            FieldSize::Bits(32) => formatter.serialize_float(holder.get_float()?),
            FieldSize::Bits(64) => formatter.serialize_double(holder.get_double()?),
            _ => Err(unsupported_size(holder.field())),
        }
    }
}

impl CharacteristicParser for GenericCharacteristicParser {
    fn parse(&self, characteristic: &Characteristic, raw: &[u8]) -> Result<Vec<FieldHolder>> {
        let mut holders = Vec::with_capacity(characteristic.fields.len());
        self.parse_fields(characteristic, &BitBuf::from_bytes(raw), &mut holders)?;
        Ok(holders)
    }

    fn serialize(&self, holders: &[FieldHolder]) -> Result<Vec<u8>> {
        let mut buf = BitBuf::new();
        let mut offset = 0;
        for holder in holders.iter().filter(|h| h.is_value_set()) {
            let serialized = self.encode_value(holder)?;
            let size = match holder.field().format.size {
                FieldSize::Bits(size) => size,
                FieldSize::Full => serialized.len(),
            };
            buf.concat(&serialized, offset, size);
            debug!("Encoded field \"{}\" at bit {} ({} bits)", holder.name(), offset, size);
            offset += size;
        }

        if offset == 0 {
            return Ok(vec![0]);
        }
        let mut data = buf.into_bytes();
        if data.len() > self.config.max_payload_len {
            debug!(
                "Encoded value is {} bytes, truncating to {}",
                data.len(),
                self.config.max_payload_len
            );
            data.truncate(self.config.max_payload_len);
        }
        Ok(data)
    }
}

fn unsupported_size(field: &Field) -> GattParserError {
    GattParserError::UnsupportedFieldSize {
        field: field.name.clone(),
        kind: field.format.field_type.name(),
    }
}

/// Decode UTF-8, dropping trailing NUL padding
fn decode_utf8(field: &Field, bytes: &[u8]) -> Result<String> {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    String::from_utf8(bytes[..end].to_vec()).map_err(|_| GattParserError::InvalidString {
        field: field.name.clone(),
        encoding: "UTF-8",
    })
}

/// Decode UTF-16, little-endian unless a byte order mark says otherwise
fn decode_utf16(field: &Field, bytes: &[u8]) -> Result<String> {
    let (big_endian, bytes) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (true, rest),
        [0xFF, 0xFE, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };
    if bytes.len() % 2 != 0 {
        return Err(GattParserError::InvalidString {
            field: field.name.clone(),
            encoding: "UTF-16",
        });
    }
    let units = bytes.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });
    let decoded: String = char::decode_utf16(units)
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| GattParserError::InvalidString {
            field: field.name.clone(),
            encoding: "UTF-16",
        })?;
    Ok(decoded.trim_end_matches('\0').to_string())
}
