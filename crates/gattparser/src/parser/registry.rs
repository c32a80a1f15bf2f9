//! Custom codecs by characteristic UUID

use super::CharacteristicParser;
use crate::uuid::short_uuid;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Custom codecs that take over from the generic one for specific characteristics.
///
/// Create one at start-up and share it with the dispatchers that should see the same overrides.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: RwLock<HashMap<String, Arc<dyn CharacteristicParser>>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a codec for a characteristic, returning the one it replaces
    pub fn register(
        &self,
        characteristic_uuid: &str,
        parser: Arc<dyn CharacteristicParser>,
    ) -> Option<Arc<dyn CharacteristicParser>> {
        self.parsers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(short_uuid(characteristic_uuid), parser)
    }

    /// Remove the codec registered for a characteristic
    pub fn unregister(&self, characteristic_uuid: &str) -> Option<Arc<dyn CharacteristicParser>> {
        self.parsers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&short_uuid(characteristic_uuid))
    }

    /// The codec registered for a characteristic, if any
    pub fn get(&self, characteristic_uuid: &str) -> Option<Arc<dyn CharacteristicParser>> {
        self.parsers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&short_uuid(characteristic_uuid))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.parsers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
