//! Example decoding Heart Rate Measurement notifications
//!
//! This example registers the Heart Rate Measurement characteristic in an in-memory schema and
//! decodes a few notification payloads with different flag combinations.

use gattparser::schema::{Bit, BitField, Enumeration};
use gattparser::{
    format_raw, BluetoothGattParser, Characteristic, Field, FieldFormat,
    InMemorySpecificationReader, Properties,
};
use std::sync::Arc;

fn heart_rate_measurement() -> Characteristic {
    let flags = BitField::new(vec![
        Bit::new(0, 1, "Heart Rate Value Format bit")
            .with_enumeration(Enumeration::new(0, "UINT8").with_requires("C1"))
            .with_enumeration(Enumeration::new(1, "UINT16").with_requires("C2")),
        Bit::new(1, 2, "Sensor Contact Status bits")
            .with_enumeration(Enumeration::new(2, "Not detected"))
            .with_enumeration(Enumeration::new(3, "Detected")),
        Bit::new(3, 1, "Energy Expended Status bit")
            .with_enumeration(Enumeration::new(1, "Present").with_requires("C3")),
        Bit::new(4, 1, "RR-Interval bit")
            .with_enumeration(Enumeration::new(1, "Present").with_requires("C4")),
    ]);

    Characteristic::new(
        "Heart Rate Measurement",
        "2A37",
        "org.bluetooth.characteristic.heart_rate_measurement",
    )
    .with_properties(Properties::NOTIFY)
    .with_field(Field::new("Flags", FieldFormat::uint(8)).mandatory().with_bit_field(flags))
    .with_field(
        Field::new("Heart Rate Measurement Value (uint8)", FieldFormat::uint(8))
            .with_requirement("C1")
            .with_unit("org.bluetooth.unit.period.beats_per_minute"),
    )
    .with_field(
        Field::new("Heart Rate Measurement Value (uint16)", FieldFormat::uint(16))
            .with_requirement("C2")
            .with_unit("org.bluetooth.unit.period.beats_per_minute"),
    )
    .with_field(
        Field::new("Energy Expended", FieldFormat::uint(16))
            .with_requirement("C3")
            .with_unit("org.bluetooth.unit.energy.joule"),
    )
    .with_field(
        Field::new("RR-Interval", FieldFormat::uint(16))
            .with_requirement("C4")
            .with_binary_exponent(-10)
            .with_unit("org.bluetooth.unit.time.second"),
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    // Load the schema
    let reader = Arc::new(InMemorySpecificationReader::new());
    reader.add_characteristic(heart_rate_measurement());
    let parser = BluetoothGattParser::new(reader);
    println!("Heart Rate Measurement known: {}", parser.is_known_characteristic("2A37"));

    let notifications: [&[u8]; 3] = [
        &[0x16, 0x48, 0x00, 0x04],
        &[0x01, 0x2c, 0x01],
        &[0x08, 0x5a, 0x10, 0x00],
    ];

    for raw in notifications {
        println!("Notification {}", format_raw(raw, 16)?);
        let response = parser.parse("00002a37-0000-1000-8000-00805f9b34fb", raw)?;
        for holder in &response {
            println!("  {}", holder);
        }
        if let Some(rr) = response.get("RR-Interval") {
            println!("  RR-Interval in seconds: {:.3}", rr.get_double()?);
        }
    }

    Ok(())
}
