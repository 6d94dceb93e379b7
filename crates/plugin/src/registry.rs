//! Two-phase provider startup.

use std::sync::Arc;

use crate::container::Container;
use crate::error::PluginError;
use crate::provider::ServiceProvider;

/// Ordered set of providers sharing one [`Container`].
///
/// [`ProviderRegistry::boot`] runs every `register` step, then every `boot`
/// step, in the order providers were added. It runs once.
///
/// ```
/// use std::sync::Arc;
/// use verity_plugin::{ProviderRegistry, ValidationServiceProvider, BINDING};
/// use verity_validator::Validator;
///
/// let mut registry = ProviderRegistry::new();
/// registry.add(ValidationServiceProvider::new([]).unwrap()).unwrap();
/// registry.boot().unwrap();
///
/// let validator: Arc<Validator> = registry.container().make(BINDING).unwrap();
/// assert!(validator.registry().contains("slug"));
/// ```
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ServiceProvider>>,
    container: Container,
    booted: bool,
}

impl ProviderRegistry {
    /// An empty registry with an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry around an existing container.
    #[must_use]
    pub fn with_container(container: Container) -> Self {
        Self {
            container,
            ..Self::default()
        }
    }

    /// Adds a provider. Names must be unique and providers cannot be added
    /// after boot.
    pub fn add<P: ServiceProvider>(&mut self, provider: P) -> Result<(), PluginError> {
        if self.booted {
            return Err(PluginError::AlreadyBooted);
        }
        if self.get(provider.name()).is_some() {
            return Err(PluginError::AlreadyRegistered(provider.name().to_owned()));
        }
        tracing::debug!(provider = provider.name(), "provider added");
        self.providers.push(Arc::new(provider));
        Ok(())
    }

    /// Runs every `register` step, then every `boot` step.
    pub fn boot(&mut self) -> Result<(), PluginError> {
        if self.booted {
            return Err(PluginError::AlreadyBooted);
        }
        self.booted = true;

        for provider in &self.providers {
            provider
                .register(&mut self.container)
                .map_err(|e| lifecycle(provider.as_ref(), "register", e))?;
        }

        for provider in &self.providers {
            for dependency in provider.metadata().dependencies() {
                if !self.container.has(dependency) {
                    tracing::debug!(
                        provider = provider.name(),
                        dependency = %dependency,
                        "optional dependency not bound"
                    );
                }
            }
            provider
                .boot(&self.container)
                .map_err(|e| lifecycle(provider.as_ref(), "boot", e))?;
        }

        tracing::info!(providers = self.providers.len(), "providers booted");
        Ok(())
    }

    /// True once [`ProviderRegistry::boot`] has been called.
    pub fn is_booted(&self) -> bool {
        self.booted
    }

    /// Provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ServiceProvider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    /// Provider names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Shared container.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Mutable container, for bindings made before boot.
    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no provider was added.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

fn lifecycle(provider: &dyn ServiceProvider, phase: &'static str, source: PluginError) -> PluginError {
    tracing::error!(provider = provider.name(), phase, error = %source, "provider failed");
    PluginError::Lifecycle {
        provider: provider.name().to_owned(),
        phase,
        source: Box::new(source),
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .field("booted", &self.booted)
            .field("container", &self.container)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PluginMetadata;
    use parking_lot::Mutex;

    /// Appends `name:phase` to a shared log.
    struct Recorder {
        meta: PluginMetadata,
        log: Arc<Mutex<Vec<String>>>,
        fail_boot: bool,
    }

    impl Recorder {
        fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                meta: PluginMetadata::builder(name, "1.0.0").build().unwrap(),
                log: Arc::clone(log),
                fail_boot: false,
            }
        }
    }

    impl ServiceProvider for Recorder {
        fn metadata(&self) -> &PluginMetadata {
            &self.meta
        }

        fn register(&self, container: &mut Container) -> Result<(), PluginError> {
            self.log.lock().push(format!("{}:register", self.name()));
            container.instance(self.name().to_owned(), 1_u8);
            Ok(())
        }

        fn boot(&self, container: &Container) -> Result<(), PluginError> {
            self.log.lock().push(format!("{}:boot", self.name()));
            if self.fail_boot {
                container.make::<u8>("missing")?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_registers_all_before_booting_any() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ProviderRegistry::new();
        registry.add(Recorder::new("a", &log)).unwrap();
        registry.add(Recorder::new("b", &log)).unwrap();
        registry.boot().unwrap();

        assert_eq!(
            *log.lock(),
            ["a:register", "b:register", "a:boot", "b:boot"]
        );
        assert_eq!(registry.container().names(), ["a", "b"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ProviderRegistry::new();
        registry.add(Recorder::new("a", &log)).unwrap();
        let err = registry.add(Recorder::new("a", &log)).unwrap_err();
        assert!(matches!(err, PluginError::AlreadyRegistered(name) if name == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_boots_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ProviderRegistry::new();
        registry.add(Recorder::new("a", &log)).unwrap();
        registry.boot().unwrap();

        assert!(matches!(registry.boot(), Err(PluginError::AlreadyBooted)));
        assert!(matches!(
            registry.add(Recorder::new("b", &log)),
            Err(PluginError::AlreadyBooted)
        ));
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn test_boot_failure_names_provider() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut failing = Recorder::new("flaky", &log);
        failing.fail_boot = true;

        let mut registry = ProviderRegistry::new();
        registry.add(failing).unwrap();
        let err = registry.boot().unwrap_err();
        assert!(matches!(
            err,
            PluginError::Lifecycle { ref provider, phase: "boot", .. } if provider == "flaky"
        ));
    }
}
