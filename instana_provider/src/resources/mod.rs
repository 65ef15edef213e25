// src/resources/mod.rs
//! Resource handles and CRUD orchestration
//!
//! A [`ResourceHandle`] binds one resource kind to its schema, its REST
//! resource path and its two mapping directions. [`ResourceOperations`]
//! drives create/read/update/delete for any handle.

pub mod custom_event_specification;
pub mod operations;

pub use custom_event_specification::CustomEventSpecificationHandle;
pub use operations::ResourceOperations;

use crate::error::{MappingError, SchemaError};
use crate::resource_data::ResourceData;
use crate::schema::ResourceSchema;
use instana_restapi::{InstanaApi, InstanaDataObject, RestResource};

/// Static description of a resource kind
#[derive(Debug, Clone)]
pub struct ResourceMetaData {
    /// Name under which the resource is registered
    pub resource_name: &'static str,
    pub schema: ResourceSchema,
    pub schema_version: u32,
}

/// Binding between a resource kind and its REST data object
pub trait ResourceHandle: Send + Sync {
    type DataObject: InstanaDataObject;

    fn meta_data(&self) -> &ResourceMetaData;

    /// REST resource path the data objects live under
    fn resource_path(&self) -> &'static str;

    /// Reflect a data object into the configuration tree, including its id
    fn update_state(
        &self,
        data: &mut ResourceData,
        object: &Self::DataObject,
    ) -> Result<(), MappingError>;

    /// Build a data object from the configuration tree
    fn map_state_to_data_object(
        &self,
        data: &ResourceData,
    ) -> Result<Self::DataObject, MappingError>;

    /// Identity used to address the object below the resource path
    fn resource_identity<'a>(&self, object: &'a Self::DataObject) -> &'a str {
        object.id_for_resource_path()
    }

    /// Check the configuration tree against the schema
    fn validate_state(&self, data: &ResourceData) -> Result<(), SchemaError> {
        self.meta_data().schema.validate(data.attributes())
    }

    fn get_rest_resource(&self, api: &InstanaApi) -> RestResource<Self::DataObject> {
        api.resource(self.resource_path())
    }
}
