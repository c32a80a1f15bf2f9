//! Characteristic and field definitions
//!
//! These types mirror the GATT XML definitions published for standard services and
//! characteristics. The codec only reads them; producing them (for example from XML files) is the
//! job of a [`SpecificationReader`](super::SpecificationReader).

use bitflags::bitflags;
use std::fmt;
use std::sync::Arc;

/// Requirement token every mandatory field carries
pub const MANDATORY: &str = "Mandatory";

/// Value kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Boolean,
    UInt,
    SInt,
    FloatIeee754,
    FloatIeee11073,
    Utf8s,
    Utf16s,
    Struct,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::UInt => "uint",
            FieldType::SInt => "sint",
            FieldType::FloatIeee754 => "IEEE-754 float",
            FieldType::FloatIeee11073 => "IEEE-11073 float",
            FieldType::Utf8s => "utf8s",
            FieldType::Utf16s => "utf16s",
            FieldType::Struct => "struct",
        }
    }
}

/// Width of a field in bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSize {
    /// A fixed number of bits
    Bits(usize),
    /// Everything that remains in the buffer; only valid for the last field
    Full,
}

/// Kind and width of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldFormat {
    pub field_type: FieldType,
    pub size: FieldSize,
}

impl FieldFormat {
    pub const fn new(field_type: FieldType, size: FieldSize) -> Self {
        Self { field_type, size }
    }

    pub const fn boolean() -> Self {
        Self::new(FieldType::Boolean, FieldSize::Bits(1))
    }

    pub const fn uint(bits: usize) -> Self {
        Self::new(FieldType::UInt, FieldSize::Bits(bits))
    }

    pub const fn sint(bits: usize) -> Self {
        Self::new(FieldType::SInt, FieldSize::Bits(bits))
    }

    pub const fn utf8s() -> Self {
        Self::new(FieldType::Utf8s, FieldSize::Full)
    }

    pub const fn utf16s() -> Self {
        Self::new(FieldType::Utf16s, FieldSize::Full)
    }

    pub const fn opaque() -> Self {
        Self::new(FieldType::Struct, FieldSize::Full)
    }

    /// Parse a format name as used in GATT XML definitions (`uint8`, `SFLOAT`, `utf8s` and so on)
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let format = match name {
            "boolean" => Self::boolean(),
            "2bit" => Self::uint(2),
            "nibble" => Self::uint(4),
            "duint16" => Self::uint(32),
            "gatt_uuid" => Self::uint(16),
            "float32" => Self::new(FieldType::FloatIeee754, FieldSize::Bits(32)),
            "float64" => Self::new(FieldType::FloatIeee754, FieldSize::Bits(64)),
            "SFLOAT" => Self::new(FieldType::FloatIeee11073, FieldSize::Bits(16)),
            "FLOAT" => Self::new(FieldType::FloatIeee11073, FieldSize::Bits(32)),
            "utf8s" => Self::utf8s(),
            "utf16s" => Self::utf16s(),
            "struct" | "variable" | "reg-cert-data-list" => Self::opaque(),
            _ => {
                let (field_type, bits) = if let Some(bits) = name.strip_prefix("uint") {
                    (FieldType::UInt, bits)
                } else if let Some(bits) = name.strip_prefix("sint") {
                    (FieldType::SInt, bits)
                } else if let Some(bits) = name.strip_prefix("int") {
                    (FieldType::SInt, bits)
                } else {
                    return None;
                };
                match bits.parse::<usize>() {
                    Ok(bits) if bits > 0 => Self::new(field_type, FieldSize::Bits(bits)),
                    _ => return None,
                }
            }
        };
        Some(format)
    }

    /// Fixed width in bits, or `None` for full-size fields
    pub fn bits(&self) -> Option<usize> {
        match self.size {
            FieldSize::Bits(bits) => Some(bits),
            FieldSize::Full => None,
        }
    }

    pub fn is_full_size(&self) -> bool {
        self.size == FieldSize::Full
    }
}

/// One entry of a field or bit enumeration table
#[derive(Debug, Clone, PartialEq)]
pub struct Enumeration {
    pub key: i64,
    pub value: String,
    /// Requirement token activated by this entry
    pub requires: Option<String>,
}

impl Enumeration {
    pub fn new(key: i64, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
            requires: None,
        }
    }

    pub fn with_requires(mut self, requires: impl Into<String>) -> Self {
        self.requires = Some(requires.into());
        self
    }
}

/// A sub-field of a flags field: `size` bits starting at bit `index`
#[derive(Debug, Clone, PartialEq)]
pub struct Bit {
    pub index: usize,
    pub size: usize,
    pub name: String,
    pub enumerations: Vec<Enumeration>,
}

impl Bit {
    pub fn new(index: usize, size: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            size,
            name: name.into(),
            enumerations: Vec::new(),
        }
    }

    pub fn with_enumeration(mut self, enumeration: Enumeration) -> Self {
        self.enumerations.push(enumeration);
        self
    }

    /// Requirement token for the given value of this bit group
    pub fn flag(&self, value: i64) -> Option<&str> {
        self.enumerations
            .iter()
            .find(|enumeration| enumeration.key == value)
            .and_then(|enumeration| enumeration.requires.as_deref())
    }
}

/// Per-bit layout of a flags field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BitField {
    pub bits: Vec<Bit>,
}

impl BitField {
    pub fn new(bits: Vec<Bit>) -> Self {
        Self { bits }
    }
}

/// A field of a characteristic value
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub format: FieldFormat,
    /// The field exists only when all of these tokens are active; empty means always
    pub requirements: Vec<String>,
    /// Type name of another characteristic whose fields take this field's place
    pub reference: Option<String>,
    pub bit_field: Option<BitField>,
    pub enumerations: Vec<Enumeration>,
    pub unit: Option<String>,
    pub decimal_exponent: Option<i32>,
    pub binary_exponent: Option<i32>,
    pub multiplier: Option<i32>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl Field {
    pub fn new(name: impl Into<String>, format: FieldFormat) -> Self {
        Self {
            name: name.into(),
            format,
            requirements: Vec::new(),
            reference: None,
            bit_field: None,
            enumerations: Vec::new(),
            unit: None,
            decimal_exponent: None,
            binary_exponent: None,
            multiplier: None,
            minimum: None,
            maximum: None,
        }
    }

    /// A placeholder for the fields of the characteristic named `type_name`
    pub fn reference(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldFormat::opaque());
        field.reference = Some(type_name.into());
        field
    }

    pub fn with_requirement(mut self, requirement: impl Into<String>) -> Self {
        self.requirements.push(requirement.into());
        self
    }

    pub fn mandatory(self) -> Self {
        self.with_requirement(MANDATORY)
    }

    pub fn with_bit_field(mut self, bit_field: BitField) -> Self {
        self.bit_field = Some(bit_field);
        self
    }

    pub fn with_enumeration(mut self, enumeration: Enumeration) -> Self {
        self.enumerations.push(enumeration);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_decimal_exponent(mut self, exponent: i32) -> Self {
        self.decimal_exponent = Some(exponent);
        self
    }

    pub fn with_binary_exponent(mut self, exponent: i32) -> Self {
        self.binary_exponent = Some(exponent);
        self
    }

    pub fn with_multiplier(mut self, multiplier: i32) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn has_requirement(&self, requirement: &str) -> bool {
        self.requirements.iter().any(|r| r == requirement)
    }

    /// A flags field is named "Flags" and carries a bit field table
    pub fn is_flags(&self) -> bool {
        self.bit_field.is_some() && self.name.trim().eq_ignore_ascii_case("flags")
    }

    /// An op code field is named "Op Code", "Op Codes" or "OpCode"
    pub fn is_op_codes(&self) -> bool {
        let name = self.name.trim().to_ascii_lowercase();
        matches!(name.as_str(), "op code" | "op codes" | "opcode" | "opcodes")
    }

    /// Requirement token associated with an op code value
    pub fn enumeration_requires(&self, key: i64) -> Option<&str> {
        self.enumeration(key)
            .and_then(|enumeration| enumeration.requires.as_deref())
    }

    pub fn enumeration(&self, key: i64) -> Option<&Enumeration> {
        self.enumerations
            .iter()
            .find(|enumeration| enumeration.key == key)
    }
}

bitflags! {
    /// Properties declared for a characteristic
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Properties: u16 {
        const BROADCAST = 0x0001;
        const READ = 0x0002;
        const WRITE_WITHOUT_RESPONSE = 0x0004;
        const WRITE = 0x0008;
        const NOTIFY = 0x0010;
        const INDICATE = 0x0020;
        const SIGNED_WRITE = 0x0040;
        const RELIABLE_WRITE = 0x0080;
        const WRITABLE_AUXILIARIES = 0x0100;
    }
}

/// A GATT characteristic definition
#[derive(Debug, Clone)]
pub struct Characteristic {
    pub name: String,
    /// Short form of the characteristic UUID (e.g. `2A19`)
    pub uuid: String,
    /// Type name used by references (e.g. `org.bluetooth.characteristic.battery_level`)
    pub type_name: String,
    pub fields: Vec<Arc<Field>>,
    pub properties: Properties,
    valid_for_read: bool,
    valid_for_write: bool,
}

impl Characteristic {
    pub fn new(
        name: impl Into<String>,
        uuid: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            type_name: type_name.into(),
            fields: Vec::new(),
            properties: Properties::READ,
            valid_for_read: true,
            valid_for_write: true,
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(Arc::new(field));
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Override the read/write validity determined by the schema loader
    pub fn with_validity(mut self, valid_for_read: bool, valid_for_write: bool) -> Self {
        self.valid_for_read = valid_for_read;
        self.valid_for_write = valid_for_write;
        self
    }

    pub fn is_valid_for_read(&self) -> bool {
        self.valid_for_read
    }

    pub fn is_valid_for_write(&self) -> bool {
        self.valid_for_write
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.uuid)
    }
}

/// A GATT service definition
#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    pub uuid: String,
    pub type_name: String,
    /// Short UUIDs of the characteristics this service contains
    pub characteristics: Vec<String>,
}

impl Service {
    pub fn new(
        name: impl Into<String>,
        uuid: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            type_name: type_name.into(),
            characteristics: Vec::new(),
        }
    }

    pub fn with_characteristic(mut self, uuid: impl Into<String>) -> Self {
        self.characteristics.push(uuid.into());
        self
    }
}
