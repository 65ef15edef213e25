// src/rest_resource.rs
//! Typed access to a single REST resource collection
//!
//! The HTTP transport is injected through [`RestClient`]; this module only
//! deals with encoding, decoding and validation of data objects.

use crate::error::RestApiError;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// A document that can be stored under a REST resource path
pub trait InstanaDataObject: Serialize + Sized {
    /// Identity used to address the object below the resource path
    fn id_for_resource_path(&self) -> &str;

    /// Check the object before it is sent to the server
    fn validate(&self) -> Result<(), RestApiError>;

    /// Decode a server payload
    fn from_json(value: Value) -> Result<Self, RestApiError>;
}

/// Raw transport used by [`RestResource`]
///
/// Implementations return [`RestApiError::NotFound`] when the server does not
/// know the addressed object.
pub trait RestClient: Send + Sync {
    fn get_one(&self, id: &str, resource_path: &str) -> Result<Vec<u8>, RestApiError>;

    /// Create a new object; the server assigns its identity
    fn post(&self, resource_path: &str, body: Vec<u8>) -> Result<Vec<u8>, RestApiError>;

    fn put(&self, id: &str, resource_path: &str, body: Vec<u8>) -> Result<Vec<u8>, RestApiError>;

    fn delete(&self, id: &str, resource_path: &str) -> Result<(), RestApiError>;
}

/// Typed resource collection for data objects of type `T`
pub struct RestResource<T> {
    resource_path: &'static str,
    client: Arc<dyn RestClient>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: InstanaDataObject> RestResource<T> {
    pub fn new(resource_path: &'static str, client: Arc<dyn RestClient>) -> Self {
        Self {
            resource_path,
            client,
            _marker: PhantomData,
        }
    }

    pub fn resource_path(&self) -> &'static str {
        self.resource_path
    }

    pub fn get_one(&self, id: &str) -> Result<T, RestApiError> {
        let body = self.client.get_one(id, self.resource_path)?;
        self.unmarshal(&body)
    }

    pub fn create(&self, data: &T) -> Result<T, RestApiError> {
        data.validate()?;
        let body = self.marshal(data)?;
        let response = self.client.post(self.resource_path, body)?;
        self.unmarshal(&response)
    }

    pub fn update(&self, data: &T) -> Result<T, RestApiError> {
        data.validate()?;
        let body = self.marshal(data)?;
        let response = self
            .client
            .put(data.id_for_resource_path(), self.resource_path, body)?;
        self.unmarshal(&response)
    }

    pub fn delete(&self, data: &T) -> Result<(), RestApiError> {
        self.delete_by_id(data.id_for_resource_path())
    }

    pub fn delete_by_id(&self, id: &str) -> Result<(), RestApiError> {
        self.client.delete(id, self.resource_path)
    }

    fn marshal(&self, data: &T) -> Result<Vec<u8>, RestApiError> {
        serde_json::to_vec(data).map_err(RestApiError::Encode)
    }

    fn unmarshal(&self, body: &[u8]) -> Result<T, RestApiError> {
        let value: Value = serde_json::from_slice(body)?;
        T::from_json(value)
    }
}

impl<T> Clone for RestResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource_path: self.resource_path,
            client: Arc::clone(&self.client),
            _marker: PhantomData,
        }
    }
}
