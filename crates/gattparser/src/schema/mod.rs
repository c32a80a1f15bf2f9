//! GATT characteristic and service definitions
//!
//! This module describes the layout of characteristic values (fields, formats, requirement tokens
//! and flag tables) and the [`SpecificationReader`] interface the codec uses to look them up.

pub mod reader;
pub mod types;


pub use self::reader::{InMemorySpecificationReader, SpecificationReader};
pub use self::types::{
    Bit, BitField, Characteristic, Enumeration, Field, FieldFormat, FieldSize, FieldType,
    Properties, Service, MANDATORY,
};
