//! Characteristic values being prepared for a write

use super::holder::FieldHolder;
use super::value::FieldValue;
use crate::error::{GattParserError, Result};
use crate::schema::Field;
use std::sync::Arc;

/// A characteristic value under construction.
///
/// Holds one holder per field in layout order, all unset until the caller fills them. The op code
/// holder, when the characteristic has one, drives which optional fields become required.
#[derive(Debug, Clone, PartialEq)]
pub struct GattRequest {
    characteristic_uuid: String,
    holders: Vec<FieldHolder>,
    op_codes_index: Option<usize>,
}

impl GattRequest {
    /// Create a request with an unset holder for each field
    pub fn new(characteristic_uuid: impl Into<String>, fields: Vec<Arc<Field>>) -> Self {
        Self::from_holders(
            characteristic_uuid,
            fields.into_iter().map(FieldHolder::new).collect(),
        )
    }

    /// Create a request from existing holders, for example ones decoded from an initial value
    pub fn from_holders(characteristic_uuid: impl Into<String>, holders: Vec<FieldHolder>) -> Self {
        let mut deduped: Vec<FieldHolder> = Vec::with_capacity(holders.len());
        for holder in holders {
            match deduped.iter_mut().find(|h| h.name() == holder.name()) {
                Some(existing) => *existing = holder,
                None => deduped.push(holder),
            }
        }
        let op_codes_index = deduped.iter().position(|h| h.field().is_op_codes());
        Self {
            characteristic_uuid: characteristic_uuid.into(),
            holders: deduped,
            op_codes_index,
        }
    }

    pub fn characteristic_uuid(&self) -> &str {
        &self.characteristic_uuid
    }

    /// Set the value of the named field
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        self.field_mut(name)
            .ok_or_else(|| GattParserError::UnknownField(name.to_string()))?
            .set_value(value)
    }

    pub fn field(&self, name: &str) -> Option<&FieldHolder> {
        self.holders.iter().find(|holder| holder.name() == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldHolder> {
        self.holders.iter_mut().find(|holder| holder.name() == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Every holder, set or not, in layout order
    pub fn all_field_holders(&self) -> &[FieldHolder] {
        &self.holders
    }

    /// Holders that have a value
    pub fn field_holders(&self) -> Vec<&FieldHolder> {
        self.holders.iter().filter(|h| h.is_value_set()).collect()
    }

    /// Holders whose field carries the given requirement token
    pub fn required_holders(&self, requirement: &str) -> Vec<&FieldHolder> {
        self.holders
            .iter()
            .filter(|h| h.field().has_requirement(requirement))
            .collect()
    }

    pub fn op_codes_holder(&self) -> Option<&FieldHolder> {
        self.op_codes_index.map(|index| &self.holders[index])
    }
}
