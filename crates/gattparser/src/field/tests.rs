//! Tests for field value containers

use super::*;
use crate::error::{ErrorKind, GattParserError};
use crate::num::Integer;
use crate::schema::{Enumeration, Field, FieldFormat, FieldSize, FieldType};
use num_bigint::BigInt;
use std::sync::Arc;
use test_case::test_case;

fn holder(field: Field) -> FieldHolder {
    FieldHolder::new(Arc::new(field))
}

#[test]
fn test_unset_is_distinct_from_wrong_type() {
    let mut level = holder(Field::new("Level", FieldFormat::uint(8)));
    assert!(matches!(
        level.get_integer(),
        Err(GattParserError::FieldValueUnset(name)) if name == "Level"
    ));

    level.set_integer(51).unwrap();
    assert_eq!(level.get_integer().unwrap(), 51);
    assert_eq!(level.get_long().unwrap(), 51);
    assert!(matches!(
        level.get_string(),
        Err(GattParserError::FieldTypeMismatch { expected: "string", actual: "integer", .. })
    ));
    assert!(level.get_boolean().is_err());

    level.clear();
    assert!(!level.is_value_set());
}

#[test_case(FieldFormat::uint(8), 255, true; "uint8 max")]
#[test_case(FieldFormat::uint(8), 256, false; "uint8 overflow")]
#[test_case(FieldFormat::uint(8), -1, false; "uint8 negative")]
#[test_case(FieldFormat::sint(8), -128, true; "sint8 min")]
#[test_case(FieldFormat::sint(8), -129, false; "sint8 underflow")]
#[test_case(FieldFormat::sint(12), 2047, true; "sint12 max")]
#[test_case(FieldFormat::sint(12), 2048, false; "sint12 overflow")]
fn test_integer_width_is_enforced(format: FieldFormat, value: i64, accepted: bool) {
    let mut field = holder(Field::new("Value", format));
    let result = field.set_integer(value);
    assert_eq!(result.is_ok(), accepted);
    if let Err(err) = result {
        assert_eq!(err.kind(), ErrorKind::DataFormat);
        assert!(!field.is_value_set());
    }
}

#[test]
fn test_wide_integers_use_big_representation() {
    let mut field = holder(Field::new("Id", FieldFormat::uint(128)));
    let value = BigInt::from(u64::MAX) * BigInt::from(4);
    field.set_value(value.clone()).unwrap();
    assert!(matches!(field.get_integer_value().unwrap(), Integer::Big(_)));
    assert_eq!(field.get_big_integer().unwrap(), value);
    assert!(field.get_long().is_err());
}

#[test]
fn test_kind_mismatch_on_set() {
    let mut flag = holder(Field::new("Enabled", FieldFormat::boolean()));
    assert!(flag.set_string("yes").is_err());
    flag.set_boolean(true).unwrap();
    assert!(flag.get_boolean().unwrap());

    let mut name = holder(Field::new("Name", FieldFormat::utf8s()));
    assert!(name.set_integer(1).is_err());
    assert!(name.set_bytes(vec![1, 2]).is_err());
}

#[test]
fn test_scaled_integer_values() {
    let mut temperature = holder(
        Field::new("Temperature", FieldFormat::sint(16))
            .with_decimal_exponent(-2)
            .with_unit("celsius"),
    );
    temperature.set_double(-22.5).unwrap();
    assert_eq!(temperature.get_integer().unwrap(), -2250);
    assert!((temperature.get_double().unwrap() + 22.5).abs() < 1e-9);

    let mut interval = holder(
        Field::new("Interval", FieldFormat::uint(16))
            .with_multiplier(5)
            .with_binary_exponent(1),
    );
    interval.set_double(100.0).unwrap();
    assert_eq!(interval.get_integer().unwrap(), 10);
    assert_eq!(interval.get_double().unwrap(), 100.0);
}

#[test]
fn test_float_fields_store_by_width() {
    let mut sfloat = holder(Field::new(
        "Weight",
        FieldFormat::new(FieldType::FloatIeee11073, FieldSize::Bits(16)),
    ));
    sfloat.set_double(36.6).unwrap();
    assert_eq!(sfloat.get_float().unwrap(), 36.6f32);

    let mut double = holder(Field::new(
        "Position",
        FieldFormat::new(FieldType::FloatIeee754, FieldSize::Bits(64)),
    ));
    double.set_double(1.25).unwrap();
    assert!(double.get_float().is_err());
    assert_eq!(double.get_double().unwrap(), 1.25);

    let mut full = holder(Field::new(
        "Samples",
        FieldFormat::new(FieldType::FloatIeee754, FieldSize::Full),
    ));
    assert_eq!(
        full.set_float(1.0).unwrap_err().kind(),
        ErrorKind::Configuration
    );
}

#[test]
fn test_fixed_size_strings_must_fit() {
    let mut code = holder(Field::new(
        "Code",
        FieldFormat::new(FieldType::Utf8s, FieldSize::Bits(16)),
    ));
    code.set_string("ab").unwrap();
    assert!(code.set_string("abc").is_err());
    assert_eq!(code.get_string().unwrap(), "ab");

    let mut wide = holder(Field::new(
        "Wide",
        FieldFormat::new(FieldType::Utf16s, FieldSize::Bits(32)),
    ));
    wide.set_string("hi").unwrap();
    assert!(wide.set_string("hey").is_err());
}

#[test]
fn test_enumeration_of_current_value() {
    let mut op_code = holder(
        Field::new("Op Code", FieldFormat::uint(8))
            .with_enumeration(Enumeration::new(1, "Reset"))
            .with_enumeration(Enumeration::new(2, "Set Interval").with_requires("C1")),
    );
    assert!(op_code.enumeration().is_none());
    op_code.set_integer(1).unwrap();
    assert_eq!(op_code.enumeration().unwrap().value, "Reset");
    assert_eq!(op_code.enumeration_requires(), None);
    op_code.set_integer(2).unwrap();
    assert_eq!(op_code.enumeration_requires(), Some("C1"));
}

#[test]
fn test_holder_display() {
    let mut level = holder(Field::new("Level", FieldFormat::uint(8)).with_unit("percentage"));
    assert_eq!(level.to_string(), "Level: <unset>");
    level.set_integer(80).unwrap();
    assert_eq!(level.to_string(), "Level: 80 (percentage)");

    let mut blob = holder(Field::new("Blob", FieldFormat::opaque()));
    blob.set_bytes(vec![0xde, 0xad]).unwrap();
    assert_eq!(blob.to_string(), "Blob: 0xdead");
}

#[test]
fn test_response_keeps_order_and_replaces_duplicates() {
    let year = Arc::new(Field::new("Year", FieldFormat::uint(16)));
    let month = Arc::new(Field::new("Month", FieldFormat::uint(8)));
    let response = GattResponse::from_holders(vec![
        FieldHolder::with_value(year.clone(), FieldValue::from(2019u16)),
        FieldHolder::with_value(month, FieldValue::from(7u8)),
        FieldHolder::with_value(year, FieldValue::from(2020u16)),
    ]);

    assert_eq!(response.len(), 2);
    assert_eq!(response.field_names().collect::<Vec<_>>(), vec!["Year", "Month"]);
    assert_eq!(response.holder("Year").unwrap().get_integer().unwrap(), 2020);
    assert!(response.contains("Month"));
    assert!(matches!(
        response.holder("Day"),
        Err(GattParserError::UnknownField(name)) if name == "Day"
    ));
}

#[test]
fn test_request_fields() {
    let fields = vec![
        Arc::new(
            Field::new("Op Code", FieldFormat::uint(8))
                .mandatory()
                .with_enumeration(Enumeration::new(2, "Set").with_requires("C1")),
        ),
        Arc::new(Field::new("Interval", FieldFormat::uint(16)).with_requirement("C1")),
        Arc::new(Field::new("Note", FieldFormat::utf8s())),
    ];
    let mut request = GattRequest::new("2A99", fields);

    assert_eq!(request.characteristic_uuid(), "2A99");
    assert_eq!(request.all_field_holders().len(), 3);
    assert!(request.field_holders().is_empty());
    assert_eq!(request.op_codes_holder().unwrap().name(), "Op Code");
    assert_eq!(request.required_holders("C1").len(), 1);
    assert_eq!(request.required_holders("Mandatory").len(), 1);

    request.set_field("Op Code", 2).unwrap();
    request.set_field("Note", "hello").unwrap();
    assert_eq!(request.field_holders().len(), 2);
    assert_eq!(request.op_codes_holder().unwrap().enumeration_requires(), Some("C1"));

    assert!(matches!(
        request.set_field("Missing", 1),
        Err(GattParserError::UnknownField(_))
    ));
    assert!(request.set_field("Interval", 70000).is_err());
    assert!(request.has_field("Interval"));
    assert!(!request.field("Interval").unwrap().is_value_set());
}
