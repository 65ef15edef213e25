// src/provider.rs
//! Provider entry point
//!
//! Validates the configuration, asks the host for a transport bound to the
//! resolved connection settings and hands out resource operations.

use crate::config::{ConfigError, ConnectionSettings, ProviderConfig};
use crate::resources::{CustomEventSpecificationHandle, ResourceOperations};
use crate::{log_error, log_info};
use instana_restapi::{InstanaApi, RestClient};
use std::sync::Arc;

pub struct Provider {
    settings: ConnectionSettings,
    api: InstanaApi,
}

#[cfg(test)]
impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider").finish_non_exhaustive()
    }
}

impl Provider {
    /// Build a provider; `connect` creates the transport for the settings
    pub fn new<F>(config: &ProviderConfig, connect: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&ConnectionSettings) -> Arc<dyn RestClient>,
    {
        if let Err(err) = config.validate() {
            log_error!(err.code(), "Invalid provider configuration", "error" => err);
            return Err(err);
        }

        let settings = config.connection_settings();
        let api = InstanaApi::new(connect(&settings));

        log_info!("Provider configured",
            "base_url" => settings.base_url,
            "tls_skip_verify" => settings.tls_skip_verify
        );
        Ok(Self { settings, api })
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn api(&self) -> &InstanaApi {
        &self.api
    }

    pub fn custom_event_specifications(
        &self,
    ) -> ResourceOperations<CustomEventSpecificationHandle> {
        ResourceOperations::new(CustomEventSpecificationHandle::new(), &self.api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use crate::resource_data::ResourceData;
    use assert_matches::assert_matches;
    use instana_restapi::RestApiError;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Answers POST with the request body plus a fixed id
    #[derive(Default)]
    struct EchoClient {
        posted: Mutex<Vec<String>>,
    }

    impl RestClient for EchoClient {
        fn get_one(&self, id: &str, resource_path: &str) -> Result<Vec<u8>, RestApiError> {
            Err(RestApiError::NotFound {
                resource_path: resource_path.to_string(),
                id: id.to_string(),
            })
        }

        fn post(&self, resource_path: &str, body: Vec<u8>) -> Result<Vec<u8>, RestApiError> {
            self.posted.lock().unwrap().push(resource_path.to_string());
            let mut object: Value = serde_json::from_slice(&body)?;
            object["id"] = json!("echo-1");
            Ok(serde_json::to_vec(&object).unwrap())
        }

        fn put(
            &self,
            _id: &str,
            _resource_path: &str,
            body: Vec<u8>,
        ) -> Result<Vec<u8>, RestApiError> {
            Ok(body)
        }

        fn delete(&self, _id: &str, _resource_path: &str) -> Result<(), RestApiError> {
            Ok(())
        }
    }

    #[test]
    fn test_transport_receives_resolved_settings() {
        init_test_logging();
        let config = ProviderConfig::new("token", "tenant.instana.io").with_tls_skip_verify(true);
        let client = Arc::new(EchoClient::default());
        let mut seen = None;

        let provider = Provider::new(&config, |settings| {
            seen = Some(settings.clone());
            client.clone() as Arc<dyn RestClient>
        })
        .unwrap();

        let seen = seen.unwrap();
        assert_eq!(seen.base_url, "https://tenant.instana.io");
        assert_eq!(seen.api_token, "token");
        assert!(seen.tls_skip_verify);
        assert_eq!(provider.settings(), &seen);
    }

    #[test]
    fn test_invalid_config_never_connects() {
        init_test_logging();
        let config = ProviderConfig::new("", "tenant.instana.io");
        let mut connected = false;

        let result = Provider::new(&config, |_| {
            connected = true;
            Arc::new(EchoClient::default()) as Arc<dyn RestClient>
        });

        assert_matches!(result, Err(ConfigError::MissingValue { field: "api_token" }));
        assert!(!connected);
    }

    #[test]
    fn test_operations_use_the_connected_transport() {
        init_test_logging();
        let config = ProviderConfig::new("token", "tenant.instana.io");
        let client = Arc::new(EchoClient::default());
        let provider = Provider::new(&config, |_| client.clone() as Arc<dyn RestClient>).unwrap();
        let mut data = ResourceData::from_json(json!({
            "name": "name",
            "entity_type": "any",
            "rules": [{ "system": [{ "severity": "warning", "system_rule_id": "id" }] }]
        }));

        provider.custom_event_specifications().create(&mut data).unwrap();

        assert_eq!(data.id(), "echo-1");
        assert_eq!(
            *client.posted.lock().unwrap(),
            vec!["/api/events/settings/event-specifications/custom".to_string()]
        );
    }
}
