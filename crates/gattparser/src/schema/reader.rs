//! Lookup of characteristic and service definitions

use super::types::{Characteristic, Field, Service};
use crate::uuid::short_uuid;
use log::warn;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Source of characteristic and service definitions.
///
/// UUID arguments are already normalized with [`short_uuid`].
pub trait SpecificationReader: Send + Sync {
    /// Find a characteristic by its short UUID
    fn characteristic_by_uuid(&self, uuid: &str) -> Option<Arc<Characteristic>>;

    /// Find a characteristic by its type name, as used by field references
    fn characteristic_by_type(&self, type_name: &str) -> Option<Arc<Characteristic>>;

    /// Find a service by its short UUID
    fn service(&self, uuid: &str) -> Option<Arc<Service>>;

    /// Fields of a characteristic with every reference replaced by the referenced fields
    fn fields(&self, characteristic: &Characteristic) -> Vec<Arc<Field>> {
        let mut fields = Vec::with_capacity(characteristic.fields.len());
        for field in &characteristic.fields {
            match &field.reference {
                Some(type_name) => match self.characteristic_by_type(type_name.trim()) {
                    Some(referenced) => fields.extend(self.fields(&referenced)),
                    None => warn!(
                        "Characteristic \"{}\" references unknown type \"{}\"",
                        characteristic.name, type_name
                    ),
                },
                None => fields.push(field.clone()),
            }
        }
        fields
    }
}

/// Definitions held in memory, registered at runtime
#[derive(Default)]
pub struct InMemorySpecificationReader {
    characteristics_by_uuid: RwLock<HashMap<String, Arc<Characteristic>>>,
    characteristics_by_type: RwLock<HashMap<String, Arc<Characteristic>>>,
    services: RwLock<HashMap<String, Arc<Service>>>,
}

impl InMemorySpecificationReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a characteristic, replacing any definition with the same UUID or type name
    pub fn add_characteristic(&self, characteristic: Characteristic) -> Arc<Characteristic> {
        let characteristic = Arc::new(characteristic);
        self.characteristics_by_uuid
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(short_uuid(&characteristic.uuid), characteristic.clone());
        self.characteristics_by_type
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(characteristic.type_name.clone(), characteristic.clone());
        characteristic
    }

    /// Register a service, replacing any definition with the same UUID
    pub fn add_service(&self, service: Service) -> Arc<Service> {
        let service = Arc::new(service);
        self.services
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(short_uuid(&service.uuid), service.clone());
        service
    }
}

impl SpecificationReader for InMemorySpecificationReader {
    fn characteristic_by_uuid(&self, uuid: &str) -> Option<Arc<Characteristic>> {
        self.characteristics_by_uuid
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uuid)
            .cloned()
    }

    fn characteristic_by_type(&self, type_name: &str) -> Option<Arc<Characteristic>> {
        self.characteristics_by_type
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
    }

    fn service(&self, uuid: &str) -> Option<Arc<Service>> {
        self.services
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uuid)
            .cloned()
    }
}
