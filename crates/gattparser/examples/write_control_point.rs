//! Example preparing writes to a control point characteristic
//!
//! The op code chosen decides which parameter fields are required. This example shows validation
//! catching a missing parameter, then the encoded bytes of a complete request.

use gattparser::schema::Enumeration;
use gattparser::{
    format_raw, BluetoothGattParser, Characteristic, Field, FieldFormat,
    InMemorySpecificationReader, Properties,
};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let reader = Arc::new(InMemorySpecificationReader::new());
    reader.add_characteristic(
        Characteristic::new(
            "Fitness Machine Control Point",
            "2AD9",
            "org.bluetooth.characteristic.fitness_machine_control_point",
        )
        .with_properties(Properties::WRITE | Properties::INDICATE)
        .with_field(
            Field::new("Op Code", FieldFormat::uint(8))
                .mandatory()
                .with_enumeration(Enumeration::new(0x00, "Request Control"))
                .with_enumeration(Enumeration::new(0x01, "Reset"))
                .with_enumeration(Enumeration::new(0x02, "Set Target Speed").with_requires("C1"))
                .with_enumeration(
                    Enumeration::new(0x03, "Set Target Inclination").with_requires("C2"),
                ),
        )
        .with_field(
            Field::new("Target Speed", FieldFormat::uint(16))
                .with_requirement("C1")
                .with_decimal_exponent(-2)
                .with_unit("org.bluetooth.unit.velocity.kilometre_per_hour"),
        )
        .with_field(
            Field::new("Target Inclination", FieldFormat::sint(16))
                .with_requirement("C2")
                .with_decimal_exponent(-1)
                .with_unit("org.bluetooth.unit.percentage"),
        ),
    );
    let parser = BluetoothGattParser::new(reader);

    // Choose an op code but forget its parameter
    let mut request = parser.prepare("2AD9")?;
    request.set_field("Op Code", 0x02)?;
    println!("Request valid without speed: {}", parser.validate(&request));
    if let Err(err) = parser.serialize(&request) {
        println!("Serialization rejected: {}", err);
    }

    // Fill in the parameter; the scaled value is stored as 1250 hundredths
    request
        .field_mut("Target Speed")
        .ok_or("missing Target Speed field")?
        .set_double(12.5)?;
    println!("Request valid with speed: {}", parser.validate(&request));
    let data = parser.serialize(&request)?;
    println!("Write payload: {}", format_raw(&data, 16)?);

    for holder in request.field_holders() {
        println!("  {}", holder);
    }

    Ok(())
}
