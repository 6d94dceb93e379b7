//! # verity-plugin
//!
//! Service-provider packaging for the verity validator.
//!
//! ## Core Types
//!
//! - [`Container`]: named singleton bindings resolved by type
//! - [`ServiceProvider`]: register-then-boot unit of startup
//! - [`ProviderRegistry`]: runs providers in two phases over one container
//! - [`ValidationServiceProvider`]: binds a shared
//!   [`Validator`](verity_validator::Validator) as `"validation"` and attaches
//!   the `"database"` binding when it can count rows
//! - [`PluginMetadata`]: name, semver version, description, dependencies
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use verity_plugin::{
//!     BINDING, ConnectionSource, DATABASE_BINDING, ProviderRegistry, ValidationServiceProvider,
//! };
//! use verity_validator::Validator;
//! use verity_validator::database::RowCounter;
//!
//! struct NoCounting;
//!
//! impl ConnectionSource for NoCounting {
//!     fn row_counter(&self) -> Option<Arc<dyn RowCounter>> {
//!         None
//!     }
//! }
//!
//! let mut registry = ProviderRegistry::new();
//! let source: Arc<dyn ConnectionSource> = Arc::new(NoCounting);
//! registry.container_mut().instance(DATABASE_BINDING, source);
//! registry.add(ValidationServiceProvider::new([]).unwrap()).unwrap();
//! registry.boot().unwrap();
//!
//! let validator: Arc<Validator> = registry.container().make(BINDING).unwrap();
//! assert!(!validator.has_database());
//! ```

#![warn(missing_docs)]

mod container;
mod error;
mod metadata;
mod provider;
mod registry;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use container::Container;
pub use error::{ContainerError, PluginError};
pub use metadata::{PluginMetadata, PluginMetadataBuilder};
pub use provider::{
    BINDING, ConnectionSource, DATABASE_BINDING, ServiceProvider, VERSION,
    ValidationServiceProvider,
};
pub use registry::ProviderRegistry;
