//! # Instana Provider
//!
//! Maps the declarative configuration tree of Instana custom event
//! specifications onto the REST data model and back, validates the tree
//! against its schema and drives create/read/update/delete through an
//! injected REST transport.

pub mod config;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod provider;
pub mod resource_data;
pub mod resources;
pub mod schema;

// Convenience re-exports
pub use config::{ConfigError, ConnectionSettings, ProviderConfig};
pub use error::{MappingError, ResourceError, SchemaError, SchemaViolation, ViolationKind};
pub use provider::Provider;
pub use resource_data::{Block, ResourceData};
pub use resources::{
    CustomEventSpecificationHandle, ResourceHandle, ResourceMetaData, ResourceOperations,
};
pub use schema::{fields::Field, FieldSchema, ResourceSchema, ValueType};

pub mod prelude {
    pub use crate::error::{MappingError, ResourceError};
    pub use crate::mapping::{from_option_list, to_option_list, BlockReader, RuleGroup};
    pub use crate::resource_data::{Block, ResourceData};
    pub use crate::resources::{
        CustomEventSpecificationHandle, ResourceHandle, ResourceOperations,
    };
    pub use crate::schema::fields::Field;

    pub use instana_restapi::{
        CustomEventSpecification, InstanaApi, RestClient, RuleSpecification, Severity,
    };
}
