// src/api.rs
//! Entry point to the Instana REST API

use crate::model::{CustomEventSpecification, CUSTOM_EVENT_SPECIFICATION_RESOURCE_PATH};
use crate::rest_resource::{InstanaDataObject, RestClient, RestResource};
use std::sync::Arc;

/// Hands out typed resources sharing one transport
#[derive(Clone)]
pub struct InstanaApi {
    client: Arc<dyn RestClient>,
}

impl InstanaApi {
    pub fn new(client: Arc<dyn RestClient>) -> Self {
        Self { client }
    }

    /// Typed resource below an arbitrary resource path
    pub fn resource<T: InstanaDataObject>(&self, resource_path: &'static str) -> RestResource<T> {
        RestResource::new(resource_path, Arc::clone(&self.client))
    }

    pub fn custom_event_specifications(&self) -> RestResource<CustomEventSpecification> {
        self.resource(CUSTOM_EVENT_SPECIFICATION_RESOURCE_PATH)
    }
}
