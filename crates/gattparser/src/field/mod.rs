//! Field value containers
//!
//! [`FieldHolder`] pairs a field definition with a typed value. Decoding produces a
//! [`GattResponse`]; writes start from a [`GattRequest`] the caller fills in.

pub mod holder;
pub mod request;
pub mod response;
pub mod value;

#[cfg(test)]
mod tests;

pub use self::holder::FieldHolder;
pub use self::request::GattRequest;
pub use self::response::GattResponse;
pub use self::value::FieldValue;
