//! Requirement tokens
//!
//! Optional fields name the tokens they need. On read the tokens come from the flags field of the
//! raw value; on write they come from the op code the caller chose.

use crate::bits::BitBuf;
use crate::field::GattRequest;
use crate::num::{Integer, TwosComplementNumberFormatter};
use crate::schema::{Field, FieldSize, MANDATORY};
use log::{info, trace};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Flags fields of `fields` with their bit offset and width.
///
/// Offsets are the sum of the widths of the fields before them; the scan stops at the first
/// reference or full-size field.
fn flags_fields(fields: &[Arc<Field>]) -> Vec<(usize, usize, &Arc<Field>)> {
    let mut found = Vec::new();
    let mut offset = 0;
    for field in fields {
        if field.reference.is_some() {
            break;
        }
        let FieldSize::Bits(size) = field.format.size else {
            break;
        };
        if field.is_flags() {
            found.push((offset, size, field));
        }
        offset += size;
    }
    found
}

/// Tokens activated by the flags fields of a raw value, plus [`MANDATORY`].
///
/// `bits` is the value starting at the first of `fields`.
pub fn read_flags(fields: &[Arc<Field>], bits: &BitBuf) -> BTreeSet<String> {
    let formatter = TwosComplementNumberFormatter;
    let mut active = BTreeSet::new();
    for (offset, _, field) in flags_fields(fields) {
        let Some(bit_field) = &field.bit_field else {
            continue;
        };
        for bit in &bit_field.bits {
            let from = offset + bit.index;
            let value =
                formatter.deserialize_long(&bits.slice(from, from + bit.size), bit.size, false);
            if let Some(requires) = bit.flag(value) {
                active.insert(requires.to_string());
            }
        }
    }
    active.insert(MANDATORY.to_string());
    trace!("Active requirements: {:?}", active);
    active
}

/// Raw unsigned value of every flags field of a raw value
pub fn flag_values<'a>(fields: &'a [Arc<Field>], bits: &BitBuf) -> Vec<(&'a Arc<Field>, Integer)> {
    let formatter = TwosComplementNumberFormatter;
    flags_fields(fields)
        .into_iter()
        .map(|(offset, size, field)| {
            let value = formatter.deserialize(&bits.slice(offset, offset + size), size, false);
            (field, value)
        })
        .collect()
}

/// A field is present when every token it requires is active
pub fn is_required(field: &Field, active: &BTreeSet<String>) -> bool {
    field.requirements.iter().all(|r| active.contains(r))
}

/// Check that a request has every field its op code and the mandatory rule ask for
pub fn validate_request(request: &GattRequest) -> bool {
    if let Some(op_codes) = request.op_codes_holder() {
        if let Some(requirement) = op_codes.enumeration_requires() {
            let required = request.required_holders(requirement);
            if required.is_empty() {
                info!(
                    "GATT request is invalid; could not find any field by requirement: {}",
                    requirement
                );
                return false;
            }
            if let Some(missing) = required.iter().find(|h| !h.is_value_set()) {
                info!(
                    "GATT request is invalid; field is not set: {} ({})",
                    missing.name(),
                    requirement
                );
                return false;
            }
        }
    }
    if let Some(missing) = request
        .required_holders(MANDATORY)
        .into_iter()
        .find(|h| !h.is_value_set())
    {
        info!(
            "GATT request is invalid; mandatory field is not set: {}",
            missing.name()
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Bit, BitField, Enumeration, FieldFormat};

    fn flags_field(bits: Vec<Bit>) -> Arc<Field> {
        Arc::new(
            Field::new("Flags", FieldFormat::uint(8))
                .mandatory()
                .with_bit_field(BitField::new(bits)),
        )
    }

    #[test]
    fn test_bit_set_activates_token() {
        let fields = vec![flags_field(vec![Bit::new(0, 1, "Extended")
            .with_enumeration(Enumeration::new(1, "Present").with_requires("ext"))])];

        let active = read_flags(&fields, &BitBuf::from_bytes(&[0x01]));
        assert!(active.contains("ext"));
        assert!(active.contains(MANDATORY));

        let active = read_flags(&fields, &BitBuf::from_bytes(&[0x00]));
        assert!(!active.contains("ext"));
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_zero_valued_bits_and_groups() {
        let fields = vec![flags_field(vec![
            Bit::new(0, 1, "Value Format")
                .with_enumeration(Enumeration::new(0, "UINT8").with_requires("C1"))
                .with_enumeration(Enumeration::new(1, "UINT16").with_requires("C2")),
            Bit::new(1, 2, "Contact")
                .with_enumeration(Enumeration::new(3, "Detected").with_requires("C3")),
        ])];

        let active = read_flags(&fields, &BitBuf::from_bytes(&[0b0000_0110]));
        assert_eq!(
            active.into_iter().collect::<Vec<_>>(),
            vec!["C1", "C3", "Mandatory"]
        );

        let active = read_flags(&fields, &BitBuf::from_bytes(&[0b0000_0011]));
        assert_eq!(active.into_iter().collect::<Vec<_>>(), vec!["C2", "Mandatory"]);
    }

    #[test]
    fn test_flags_after_fixed_fields() {
        let fields = vec![
            Arc::new(Field::new("Op Code", FieldFormat::uint(8))),
            flags_field(vec![Bit::new(0, 1, "More")
                .with_enumeration(Enumeration::new(1, "Yes").with_requires("C1"))]),
        ];
        assert!(read_flags(&fields, &BitBuf::from_bytes(&[0x01, 0x00])).len() == 1);
        assert!(read_flags(&fields, &BitBuf::from_bytes(&[0x00, 0x01])).contains("C1"));
    }

    #[test]
    fn test_flag_values() {
        let fields = vec![
            Arc::new(Field::new("Op Code", FieldFormat::uint(8))),
            flags_field(vec![Bit::new(0, 1, "More")]),
            Arc::new(Field::new("Rest", FieldFormat::utf8s())),
            flags_field(vec![Bit::new(0, 1, "Ignored")]),
        ];
        let values = flag_values(&fields, &BitBuf::from_bytes(&[0x07, 0x81, b'x']));
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].0.name, "Flags");
        assert_eq!(values[0].1, Integer::Int(0x81));
    }

    #[test]
    fn test_field_presence() {
        let active: BTreeSet<String> = ["Mandatory", "C1"].iter().map(|s| s.to_string()).collect();
        assert!(is_required(&Field::new("A", FieldFormat::uint(8)), &active));
        assert!(is_required(
            &Field::new("B", FieldFormat::uint(8)).with_requirement("C1"),
            &active
        ));
        assert!(!is_required(
            &Field::new("C", FieldFormat::uint(8))
                .with_requirement("C1")
                .with_requirement("C2"),
            &active
        ));
        assert!(!is_required(
            &Field::new("D", FieldFormat::uint(8)).with_requirement("Optional"),
            &active
        ));
    }

    fn control_point() -> GattRequest {
        GattRequest::new(
            "2A55",
            vec![
                Arc::new(
                    Field::new("Op Code", FieldFormat::uint(8))
                        .mandatory()
                        .with_enumeration(Enumeration::new(1, "Start"))
                        .with_enumeration(Enumeration::new(2, "Set Rate").with_requires("C1"))
                        .with_enumeration(Enumeration::new(3, "Calibrate").with_requires("C9")),
                ),
                Arc::new(Field::new("Rate", FieldFormat::uint(16)).with_requirement("C1")),
            ],
        )
    }

    #[test]
    fn test_validate_mandatory() {
        let mut request = control_point();
        assert!(!validate_request(&request));
        request.set_field("Op Code", 1).unwrap();
        assert!(validate_request(&request));
    }

    #[test]
    fn test_validate_op_code_requirements() {
        let mut request = control_point();
        request.set_field("Op Code", 2).unwrap();
        assert!(!validate_request(&request));
        request.set_field("Rate", 500).unwrap();
        assert!(validate_request(&request));
    }

    #[test]
    fn test_validate_fails_closed_without_matching_fields() {
        let mut request = control_point();
        request.set_field("Op Code", 3).unwrap();
        assert!(!validate_request(&request));
    }
}
