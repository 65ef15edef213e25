// src/resources/operations.rs
//! Create/read/update/delete of a resource through its handle
//!
//! Failures are logged once here, with their code, and then returned.

use super::ResourceHandle;
use crate::error::ResourceError;
use crate::resource_data::ResourceData;
use crate::{log_debug, log_error, log_info};
use instana_restapi::{InstanaApi, RestResource};

pub struct ResourceOperations<H: ResourceHandle> {
    handle: H,
    resource: RestResource<H::DataObject>,
}

impl<H: ResourceHandle> ResourceOperations<H> {
    pub fn new(handle: H, api: &InstanaApi) -> Self {
        let resource = handle.get_rest_resource(api);
        Self { handle, resource }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Create the resource; the server assigns its id
    pub fn create(&self, data: &mut ResourceData) -> Result<(), ResourceError> {
        let result = self.write(data, |resource, object| resource.create(object));
        self.finish("create", data, result)
    }

    /// Refresh the state from the server
    ///
    /// A resource without id is not looked up. A resource the server no
    /// longer knows loses its id.
    pub fn read(&self, data: &mut ResourceData) -> Result<(), ResourceError> {
        if data.id().is_empty() {
            log_debug!("Skipping read of resource without id",
                "resource" => self.resource_name()
            );
            return Ok(());
        }

        let result: Result<(), ResourceError> = match self.resource.get_one(data.id()) {
            Ok(object) => self.handle.update_state(data, &object).map_err(Into::into),
            Err(err) if err.is_not_found() => {
                log_info!("Resource no longer exists",
                    "resource" => self.resource_name(),
                    "id" => data.id()
                );
                data.clear_id();
                Ok(())
            }
            Err(err) => Err(err.into()),
        };
        self.finish("read", data, result)
    }

    /// Replace the resource addressed by the current id
    pub fn update(&self, data: &mut ResourceData) -> Result<(), ResourceError> {
        let result = if data.id().is_empty() {
            Err(ResourceError::MissingIdentity {
                operation: "update",
                resource: self.resource_name(),
            })
        } else {
            self.write(data, |resource, object| resource.update(object))
        };
        self.finish("update", data, result)
    }

    pub fn delete(&self, data: &mut ResourceData) -> Result<(), ResourceError> {
        if data.id().is_empty() {
            return Ok(());
        }

        let result = self
            .resource
            .delete_by_id(data.id())
            .map_err(ResourceError::from);
        if result.is_ok() {
            data.clear_id();
        }
        self.finish("delete", data, result)
    }

    /// Map the state, send it and reflect the response
    ///
    /// The identity of the response is kept even when the response cannot be
    /// mapped, so a created object stays reachable for delete.
    fn write<F>(&self, data: &mut ResourceData, send: F) -> Result<(), ResourceError>
    where
        F: FnOnce(
            &RestResource<H::DataObject>,
            &H::DataObject,
        ) -> Result<H::DataObject, instana_restapi::RestApiError>,
    {
        self.handle
            .meta_data()
            .schema
            .apply_defaults(data.attributes_mut());
        self.handle.validate_state(data)?;

        let object = self.handle.map_state_to_data_object(data)?;
        let response = send(&self.resource, &object)?;
        data.set_id(self.handle.resource_identity(&response));
        self.handle.update_state(data, &response)?;
        Ok(())
    }

    fn finish(
        &self,
        operation: &str,
        data: &ResourceData,
        result: Result<(), ResourceError>,
    ) -> Result<(), ResourceError> {
        match &result {
            Ok(()) => log_debug!("Resource operation completed",
                "operation" => operation,
                "resource" => self.resource_name(),
                "id" => data.id()
            ),
            Err(err) => log_error!(err.code(), "Resource operation failed",
                "operation" => operation,
                "resource" => self.resource_name(),
                "error" => err
            ),
        }
        result
    }

    fn resource_name(&self) -> &'static str {
        self.handle.meta_data().resource_name
    }
}
