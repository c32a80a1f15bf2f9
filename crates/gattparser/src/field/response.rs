//! Decoded characteristic values

use super::holder::FieldHolder;
use crate::error::{GattParserError, Result};

/// Result of parsing a characteristic value: field holders by name, in field order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GattResponse {
    holders: Vec<FieldHolder>,
}

impl GattResponse {
    /// Build a response from decoded holders.
    ///
    /// A holder whose name was already seen replaces the earlier one in place.
    pub fn from_holders(holders: impl IntoIterator<Item = FieldHolder>) -> Self {
        let mut response = Self::default();
        for holder in holders {
            match response
                .holders
                .iter_mut()
                .find(|existing| existing.name() == holder.name())
            {
                Some(existing) => *existing = holder,
                None => response.holders.push(holder),
            }
        }
        response
    }

    pub fn get(&self, name: &str) -> Option<&FieldHolder> {
        self.holders.iter().find(|holder| holder.name() == name)
    }

    /// Like [`get`](Self::get), but a missing field is an error
    pub fn holder(&self, name: &str) -> Result<&FieldHolder> {
        self.get(name)
            .ok_or_else(|| GattParserError::UnknownField(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.holders.iter().map(FieldHolder::name)
    }

    pub fn holders(&self) -> &[FieldHolder] {
        &self.holders
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldHolder> {
        self.holders.iter()
    }
}

impl IntoIterator for GattResponse {
    type Item = FieldHolder;
    type IntoIter = std::vec::IntoIter<FieldHolder>;

    fn into_iter(self) -> Self::IntoIter {
        self.holders.into_iter()
    }
}

impl<'a> IntoIterator for &'a GattResponse {
    type Item = &'a FieldHolder;
    type IntoIter = std::slice::Iter<'a, FieldHolder>;

    fn into_iter(self) -> Self::IntoIter {
        self.holders.iter()
    }
}
