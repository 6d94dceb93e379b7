//! Service providers and the validation provider.

use std::sync::Arc;

use verity_validator::database::RowCounter;
use verity_validator::{ConfigOption, Validator};

use crate::container::Container;
use crate::error::{ContainerError, PluginError};
use crate::metadata::PluginMetadata;

/// Binding name of the shared [`Validator`].
pub const BINDING: &str = "validation";

/// Binding name probed for a database during boot.
pub const DATABASE_BINDING: &str = "database";

/// Version of this crate, reported in provider metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A unit of startup: binds services, then wires them together.
///
/// All providers run `register` before any runs `boot`, so `boot` can rely on
/// every binding being present.
///
/// This trait is **object-safe** so providers can be stored as
/// `Arc<dyn ServiceProvider>`.
pub trait ServiceProvider: Send + Sync + 'static {
    /// Static metadata.
    fn metadata(&self) -> &PluginMetadata;

    /// Adds bindings to `container`.
    fn register(&self, container: &mut Container) -> Result<(), PluginError>;

    /// Wires bindings once every provider has registered.
    fn boot(&self, _container: &Container) -> Result<(), PluginError> {
        Ok(())
    }

    /// Provider name.
    fn name(&self) -> &str {
        self.metadata().name()
    }
}

/// A database binding that may be able to count rows.
///
/// Bind it as `Arc<dyn ConnectionSource>` under [`DATABASE_BINDING`].
pub trait ConnectionSource: Send + Sync {
    /// The default connection as a row counter, if it supports counting.
    fn row_counter(&self) -> Option<Arc<dyn RowCounter>>;
}

/// Installs a shared [`Validator`] under [`BINDING`] and attaches the
/// database bound under [`DATABASE_BINDING`], when there is one.
///
/// The database binding is probed as `Arc<dyn ConnectionSource>` first, then
/// as `Arc<dyn RowCounter>`. A missing binding, or one offering neither, is
/// logged and leaves the validator without a database.
#[derive(Debug)]
pub struct ValidationServiceProvider {
    metadata: PluginMetadata,
    options: Vec<ConfigOption>,
}

impl ValidationServiceProvider {
    /// A provider building its validator with `options`.
    pub fn new(options: impl IntoIterator<Item = ConfigOption>) -> Result<Self, PluginError> {
        let metadata = PluginMetadata::builder(BINDING, VERSION)
            .description("Request validation with database-backed rules")
            .dependency(DATABASE_BINDING)
            .build()?;
        Ok(Self {
            metadata,
            options: options.into_iter().collect(),
        })
    }

    /// Options applied to the validator.
    pub fn options(&self) -> &[ConfigOption] {
        &self.options
    }
}

fn probe_row_counter(container: &Container) -> Result<Option<Arc<dyn RowCounter>>, ContainerError> {
    match container.make::<Arc<dyn ConnectionSource>>(DATABASE_BINDING) {
        Ok(source) => return Ok(source.row_counter()),
        Err(ContainerError::TypeMismatch { .. }) => {}
        Err(e) => return Err(e),
    }
    match container.make::<Arc<dyn RowCounter>>(DATABASE_BINDING) {
        Ok(counter) => Ok(Some(counter)),
        Err(ContainerError::TypeMismatch { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

impl ServiceProvider for ValidationServiceProvider {
    fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    fn register(&self, container: &mut Container) -> Result<(), PluginError> {
        let options = self.options.clone();
        container.singleton(BINDING, move |_| Ok(Arc::new(Validator::new(options.clone()))));
        Ok(())
    }

    fn boot(&self, container: &Container) -> Result<(), PluginError> {
        if !container.has(DATABASE_BINDING) {
            tracing::debug!(
                binding = DATABASE_BINDING,
                "no database bound, database rules follow the missing-database policy"
            );
            return Ok(());
        }

        let Some(counter) = probe_row_counter(container)? else {
            tracing::warn!(
                binding = DATABASE_BINDING,
                "database binding cannot count rows, database rules follow the missing-database policy"
            );
            return Ok(());
        };

        let validator: Arc<Validator> = container.make(BINDING)?;
        validator.attach_database(counter);
        tracing::info!(binding = DATABASE_BINDING, "database attached to validation");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata() {
        let provider = ValidationServiceProvider::new([]).unwrap();
        assert_eq!(provider.name(), "validation");
        assert_eq!(provider.metadata().version().to_string(), VERSION);
        assert_eq!(provider.metadata().dependencies(), ["database"]);
    }

    #[test]
    fn test_boot_without_database_is_fine() {
        let provider = ValidationServiceProvider::new([]).unwrap();
        let mut container = Container::new();
        provider.register(&mut container).unwrap();
        provider.boot(&container).unwrap();

        let validator: Arc<Validator> = container.make(BINDING).unwrap();
        assert!(!validator.has_database());
    }

    #[test]
    fn test_boot_ignores_unrelated_database_binding() {
        let provider = ValidationServiceProvider::new([]).unwrap();
        let mut container = Container::new();
        container.instance(DATABASE_BINDING, String::from("postgres://localhost"));
        provider.register(&mut container).unwrap();
        provider.boot(&container).unwrap();

        let validator: Arc<Validator> = container.make(BINDING).unwrap();
        assert!(!validator.has_database());
    }
}
