//! # Instana REST API
//!
//! Data model exchanged with the Instana event settings API, the severity
//! codec shared by all rule variants, and typed resource access on top of an
//! injected transport.

pub mod api;
pub mod error;
pub mod model;
pub mod rest_resource;
pub mod severity;

// Convenience re-exports
pub use api::InstanaApi;
pub use error::RestApiError;
pub use model::{
    CustomEventSpecification, EntityVerificationRule, MetricPattern, RuleSpecification,
    RuleType, SystemRule, ThresholdRule, CUSTOM_EVENT_SPECIFICATION_RESOURCE_PATH,
};
pub use rest_resource::{InstanaDataObject, RestClient, RestResource};
pub use severity::{InvalidSeverity, Severity};
