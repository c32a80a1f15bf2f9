//! End-to-end decoding and encoding of standard characteristics

use gattparser::schema::{Bit, BitField, Enumeration};
use gattparser::{
    format_raw, parse_raw, short_uuid, BluetoothGattParser, Characteristic, CharacteristicParser,
    ErrorKind, Field, FieldFormat, FieldHolder, FieldSize, FieldType, GattParserError,
    InMemorySpecificationReader, Properties, Result, Service,
};
use std::sync::Arc;
use test_case::test_case;

fn reader() -> Arc<InMemorySpecificationReader> {
    let reader = InMemorySpecificationReader::new();
    reader.add_service(
        Service::new("Battery Service", "180F", "org.bluetooth.service.battery_service")
            .with_characteristic("2A19"),
    );
    reader.add_service(
        Service::new("Health Thermometer", "1809", "org.bluetooth.service.health_thermometer")
            .with_characteristic("2A1C"),
    );
    reader.add_characteristic(
        Characteristic::new("Battery Level", "2A19", "org.bluetooth.characteristic.battery_level")
            .with_properties(Properties::READ | Properties::NOTIFY)
            .with_field(
                Field::new("Level", FieldFormat::uint(8))
                    .mandatory()
                    .with_range(0.0, 100.0)
                    .with_unit("org.bluetooth.unit.percentage"),
            ),
    );
    reader.add_characteristic(
        Characteristic::new(
            "Temperature Measurement",
            "2A1C",
            "org.bluetooth.characteristic.temperature_measurement",
        )
        .with_properties(Properties::INDICATE)
        .with_field(
            Field::new("Flags", FieldFormat::uint(8))
                .mandatory()
                .with_bit_field(BitField::new(vec![
                    Bit::new(0, 1, "Temperature Units Flag")
                        .with_enumeration(Enumeration::new(0, "Celsius").with_requires("C1"))
                        .with_enumeration(Enumeration::new(1, "Fahrenheit").with_requires("C2")),
                    Bit::new(1, 1, "Time Stamp Flag")
                        .with_enumeration(Enumeration::new(1, "Present").with_requires("C3")),
                    Bit::new(2, 1, "Temperature Type Flag")
                        .with_enumeration(Enumeration::new(1, "Present").with_requires("C4")),
                ])),
        )
        .with_field(
            Field::new(
                "Temperature Measurement Value (Celsius)",
                FieldFormat::new(FieldType::FloatIeee11073, FieldSize::Bits(32)),
            )
            .with_requirement("C1"),
        )
        .with_field(
            Field::new(
                "Temperature Measurement Value (Fahrenheit)",
                FieldFormat::new(FieldType::FloatIeee11073, FieldSize::Bits(32)),
            )
            .with_requirement("C2"),
        )
        .with_field(
            Field::reference("Time Stamp", "org.bluetooth.characteristic.date_time")
                .with_requirement("C3"),
        )
        .with_field(Field::new("Temperature Type", FieldFormat::uint(8)).with_requirement("C4")),
    );
    reader.add_characteristic(
        Characteristic::new("Date Time", "2A08", "org.bluetooth.characteristic.date_time")
            .with_field(Field::new("Year", FieldFormat::uint(16)))
            .with_field(Field::new("Month", FieldFormat::uint(8)))
            .with_field(Field::new("Day", FieldFormat::uint(8)))
            .with_field(Field::new("Hours", FieldFormat::uint(8)))
            .with_field(Field::new("Minutes", FieldFormat::uint(8)))
            .with_field(Field::new("Seconds", FieldFormat::uint(8))),
    );
    reader.add_characteristic(
        Characteristic::new("Device Name", "2A00", "org.bluetooth.characteristic.gap.device_name")
            .with_field(Field::new("Name", FieldFormat::utf8s()).mandatory()),
    );
    reader.add_characteristic(
        Characteristic::new(
            "Record Access Control Point",
            "2A52",
            "org.bluetooth.characteristic.record_access_control_point",
        )
        .with_properties(Properties::WRITE | Properties::INDICATE)
        .with_field(
            Field::new("Op Code", FieldFormat::uint(8))
                .mandatory()
                .with_enumeration(Enumeration::new(1, "Report stored records").with_requires("C1"))
                .with_enumeration(Enumeration::new(3, "Abort operation")),
        )
        .with_field(Field::new("Operator", FieldFormat::uint(8)).with_requirement("C1"))
        .with_field(Field::new("Operand", FieldFormat::opaque()).with_requirement("C1")),
    );
    Arc::new(reader)
}

fn parser() -> BluetoothGattParser {
    BluetoothGattParser::new(reader())
}

#[test]
fn test_battery_level() {
    let parser = parser();
    let response = parser.parse("2A19", &[0x33]).unwrap();
    let level = response.holder("Level").unwrap();
    assert_eq!(level.get_integer().unwrap(), 51);
    assert_eq!(level.field().maximum, Some(100.0));

    let mut request = parser.prepare("2A19").unwrap();
    assert!(!parser.validate(&request));
    request.set_field("Level", 51).unwrap();
    assert!(parser.validate(&request));
    assert_eq!(parser.serialize(&request).unwrap(), vec![0x33]);
}

#[test]
fn test_services() {
    let parser = parser();
    assert!(parser.is_known_service("0000180f-0000-1000-8000-00805f9b34fb"));
    assert!(!parser.is_known_service("180A"));
    let service = parser.get_service("180f").unwrap();
    assert_eq!(service.name, "Battery Service");
    for uuid in &service.characteristics {
        assert!(parser.is_known_characteristic(uuid));
    }
    assert!(parser
        .get_characteristic("2A19")
        .unwrap()
        .properties
        .contains(Properties::NOTIFY));
}

#[test]
fn test_temperature_celsius() {
    // 36.6 °C as FLOAT, no time stamp or type
    let response = parser()
        .parse("2A1C", &[0x00, 0x6e, 0x01, 0x00, 0xff])
        .unwrap();
    assert_eq!(response.len(), 1);
    let value = response
        .holder("Temperature Measurement Value (Celsius)")
        .unwrap()
        .get_float()
        .unwrap();
    assert!((value - 36.6).abs() < 1e-4);
}

#[test]
fn test_temperature_with_time_stamp_and_type() {
    let raw = [
        0x07, // Fahrenheit, time stamp, type
        0xd3, 0x03, 0x00, 0xff, // 97.9
        0xe4, 0x07, 0x02, 0x1d, 0x0c, 0x1e, 0x00, // 2020-02-29 12:30:00
        0x02, // body
    ];
    let response = parser().parse("2A1C", &raw).unwrap();
    assert_eq!(
        response.field_names().collect::<Vec<_>>(),
        vec![
            "Temperature Measurement Value (Fahrenheit)",
            "Year",
            "Month",
            "Day",
            "Hours",
            "Minutes",
            "Seconds",
            "Temperature Type",
        ]
    );
    let fahrenheit = response
        .holder("Temperature Measurement Value (Fahrenheit)")
        .unwrap()
        .get_float()
        .unwrap();
    assert!((fahrenheit - 97.9).abs() < 1e-4);
    assert_eq!(response.holder("Year").unwrap().get_integer().unwrap(), 2020);
    assert_eq!(response.holder("Day").unwrap().get_integer().unwrap(), 29);
    assert_eq!(response.holder("Temperature Type").unwrap().get_integer().unwrap(), 2);
}

#[test]
fn test_truncated_temperature_is_rejected() {
    let err = parser().parse("2A1C", &[0x02, 0x6e, 0x01, 0x00, 0xff, 0xe4]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataFormat);
    assert!(matches!(err, GattParserError::InsufficientData { .. }));
}

#[test]
fn test_device_name() {
    let parser = parser();
    let response = parser.parse("2A00", "Thermo ☀".as_bytes()).unwrap();
    assert_eq!(response.holder("Name").unwrap().get_string().unwrap(), "Thermo ☀");

    let mut request = parser.prepare("2A00").unwrap();
    request.set_field("Name", "Thermo ☀").unwrap();
    assert_eq!(parser.serialize(&request).unwrap(), "Thermo ☀".as_bytes());
}

#[test]
fn test_record_access_control_point() {
    let parser = parser();
    let mut request = parser.prepare("2A52").unwrap();
    request.set_field("Op Code", 1).unwrap();
    request.set_field("Operator", 1).unwrap();
    assert!(!parser.validate(&request));
    assert!(matches!(
        parser.serialize(&request),
        Err(GattParserError::InvalidRequest(_))
    ));

    request.set_field("Operand", vec![0x01u8, 0x02]).unwrap();
    assert!(parser.validate(&request));
    assert_eq!(
        parser.serialize(&request).unwrap(),
        vec![0x01, 0x01, 0x01, 0x02]
    );

    let mut abort = parser.prepare("2A52").unwrap();
    abort.set_field("Op Code", 3).unwrap();
    assert_eq!(parser.serialize(&abort).unwrap(), vec![0x03]);
}

#[test_case(&[0x01, 0x05, 0xab], "[01, 05, ab]"; "hex bytes")]
#[test_case(&[0x00], "[00]"; "single zero")]
fn test_raw_text_round_trip(raw: &[u8], text: &str) {
    assert_eq!(format_raw(raw, 16).unwrap(), text);
    assert_eq!(parse_raw(text, 16).unwrap(), raw);
}

#[test_case("2a19", "2A19"; "short lower case")]
#[test_case("00002A37-0000-1000-8000-00805F9B34FB", "2A37"; "standard full form")]
#[test_case("f000aa01-0451-4000-b000-000000000000", "F000AA01"; "vendor full form")]
fn test_uuid_normalization(uuid: &str, expected: &str) {
    assert_eq!(short_uuid(uuid), expected);
}

/// Battery level reported in tenths of a percent by a vendor device
struct TenthsParser;

impl CharacteristicParser for TenthsParser {
    fn parse(&self, characteristic: &Characteristic, raw: &[u8]) -> Result<Vec<FieldHolder>> {
        let mut holder = FieldHolder::new(characteristic.fields[0].clone());
        let tenths = u16::from_le_bytes([raw[0], raw[1]]);
        holder.set_integer(i32::from(tenths / 10))?;
        Ok(vec![holder])
    }

    fn serialize(&self, holders: &[FieldHolder]) -> Result<Vec<u8>> {
        let level = holders[0].get_integer()? as u16;
        Ok((level * 10).to_le_bytes().to_vec())
    }
}

#[test]
fn test_custom_parser() {
    let parser = parser();
    parser.register_parser("2A19", Arc::new(TenthsParser));

    let response = parser.parse("2A19", &[0xf4, 0x01]).unwrap();
    assert_eq!(response.holder("Level").unwrap().get_integer().unwrap(), 50);

    let mut request = parser.prepare("2A19").unwrap();
    request.set_field("Level", 50).unwrap();
    assert_eq!(parser.serialize(&request).unwrap(), vec![0xf4, 0x01]);
}
