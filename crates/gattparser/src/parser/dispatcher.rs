//! Entry point for decoding and encoding characteristic values

use super::generic::GenericCharacteristicParser;
use super::registry::ParserRegistry;
use super::{CharacteristicParser, ParserConfig};
use crate::bits::BitBuf;
use crate::error::{GattParserError, Result};
use crate::field::{GattRequest, GattResponse};
use crate::flags;
use crate::schema::{Characteristic, Field, Service, SpecificationReader};
use crate::uuid::short_uuid;
use log::error;
use std::sync::Arc;

/// Decodes and encodes characteristic values by UUID.
///
/// Every call normalizes the UUID with [`short_uuid`], so full 128-bit forms of standard UUIDs
/// work too. A codec registered for a UUID in the [`ParserRegistry`] takes precedence over the
/// generic one.
pub struct BluetoothGattParser {
    reader: Arc<dyn SpecificationReader>,
    default_parser: Arc<dyn CharacteristicParser>,
    registry: Arc<ParserRegistry>,
    config: ParserConfig,
}

impl BluetoothGattParser {
    /// Create a parser with the default configuration and its own registry
    pub fn new(reader: Arc<dyn SpecificationReader>) -> Self {
        Self::with_config(reader, ParserConfig::default())
    }

    pub fn with_config(reader: Arc<dyn SpecificationReader>, config: ParserConfig) -> Self {
        Self::with_registry(reader, Arc::new(ParserRegistry::new()), config)
    }

    /// Create a parser that shares a registry of custom codecs
    pub fn with_registry(
        reader: Arc<dyn SpecificationReader>,
        registry: Arc<ParserRegistry>,
        config: ParserConfig,
    ) -> Self {
        let default_parser = Arc::new(GenericCharacteristicParser::with_config(
            reader.clone(),
            config,
        ));
        Self {
            reader,
            default_parser,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<ParserRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Use a custom codec for a characteristic, replacing any earlier registration
    pub fn register_parser(
        &self,
        characteristic_uuid: &str,
        parser: Arc<dyn CharacteristicParser>,
    ) {
        self.registry.register(characteristic_uuid, parser);
    }

    pub fn is_known_characteristic(&self, characteristic_uuid: &str) -> bool {
        self.get_characteristic(characteristic_uuid).is_some()
    }

    pub fn is_known_service(&self, service_uuid: &str) -> bool {
        self.get_service(service_uuid).is_some()
    }

    pub fn get_service(&self, service_uuid: &str) -> Option<Arc<Service>> {
        self.reader.service(&short_uuid(service_uuid))
    }

    pub fn get_characteristic(&self, characteristic_uuid: &str) -> Option<Arc<Characteristic>> {
        self.reader
            .characteristic_by_uuid(&short_uuid(characteristic_uuid))
    }

    /// Fields of a characteristic with references replaced by the referenced fields
    pub fn get_fields(&self, characteristic_uuid: &str) -> Option<Vec<Arc<Field>>> {
        self.get_characteristic(characteristic_uuid)
            .map(|characteristic| self.reader.fields(&characteristic))
    }

    pub fn is_valid_for_read(&self, characteristic_uuid: &str) -> bool {
        self.get_characteristic(characteristic_uuid)
            .is_some_and(|c| c.is_valid_for_read())
    }

    pub fn is_valid_for_write(&self, characteristic_uuid: &str) -> bool {
        self.get_characteristic(characteristic_uuid)
            .is_some_and(|c| c.is_valid_for_write())
    }

    fn parser_for(&self, uuid: &str) -> Arc<dyn CharacteristicParser> {
        self.registry
            .get(uuid)
            .unwrap_or_else(|| self.default_parser.clone())
    }

    fn characteristic(&self, uuid: &str) -> Result<Arc<Characteristic>> {
        self.reader
            .characteristic_by_uuid(uuid)
            .ok_or_else(|| GattParserError::UnknownCharacteristic(uuid.to_string()))
    }

    /// Decode a raw characteristic value
    pub fn parse(&self, characteristic_uuid: &str, raw: &[u8]) -> Result<GattResponse> {
        let uuid = short_uuid(characteristic_uuid);
        let characteristic = self.characteristic(&uuid)?;
        if !characteristic.is_valid_for_read() {
            error!("Characteristic cannot be parsed: \"{}\"", characteristic.name);
            return Err(GattParserError::NotValidForRead(uuid));
        }
        let holders = self.parser_for(&uuid).parse(&characteristic, raw)?;
        Ok(GattResponse::from_holders(holders))
    }

    /// A request with an unset holder for every field of the characteristic
    pub fn prepare(&self, characteristic_uuid: &str) -> Result<GattRequest> {
        let uuid = short_uuid(characteristic_uuid);
        let characteristic = self.characteristic(&uuid)?;
        Ok(GattRequest::new(uuid, self.reader.fields(&characteristic)))
    }

    /// Like [`prepare`](Self::prepare), with the fields present in `initial` already set.
    ///
    /// Flags fields keep their raw value, so serializing the request reproduces `initial`.
    pub fn prepare_with_initial(
        &self,
        characteristic_uuid: &str,
        initial: &[u8],
    ) -> Result<GattRequest> {
        let mut request = self.prepare(characteristic_uuid)?;
        for decoded in self.parse(characteristic_uuid, initial)? {
            if let (Some(holder), Some(value)) =
                (request.field_mut(decoded.name()), decoded.value())
            {
                holder.set_value(value.clone())?;
            }
        }

        let characteristic = self.characteristic(&short_uuid(characteristic_uuid))?;
        let raw = BitBuf::from_bytes(initial);
        for (field, value) in flags::flag_values(&characteristic.fields, &raw) {
            if let Some(holder) = request.field_mut(&field.name) {
                holder.set_integer(value)?;
            }
        }
        Ok(request)
    }

    /// Check that a request has every field its op code and the mandatory rule ask for
    pub fn validate(&self, request: &GattRequest) -> bool {
        flags::validate_request(request)
    }

    /// Encode a request, validating it first when the configuration is strict
    pub fn serialize(&self, request: &GattRequest) -> Result<Vec<u8>> {
        self.serialize_with(request, self.config.strict_by_default)
    }

    /// Encode a request.
    ///
    /// In strict mode an invalid request, or a characteristic not valid for write, is rejected.
    pub fn serialize_with(&self, request: &GattRequest, strict: bool) -> Result<Vec<u8>> {
        let uuid = short_uuid(request.characteristic_uuid());
        if strict {
            if !self.validate(request) {
                return Err(GattParserError::InvalidRequest(uuid));
            }
            if !self.is_valid_for_write(&uuid) {
                error!("Characteristic cannot be serialized: \"{}\"", uuid);
                return Err(GattParserError::NotValidForWrite(uuid));
            }
        }
        self.parser_for(&uuid)
            .serialize(request.all_field_holders())
    }
}
