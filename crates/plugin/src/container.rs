//! Named service bindings.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ContainerError;

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Arc<dyn Fn(&Container) -> Result<Instance, ContainerError> + Send + Sync>;

struct Binding {
    factory: Option<Factory>,
    instance: Mutex<Option<Instance>>,
}

impl Binding {
    fn resolve(&self, container: &Container, name: &str) -> Result<Instance, ContainerError> {
        let mut slot = self.instance.lock();
        if let Some(instance) = slot.as_ref() {
            return Ok(Arc::clone(instance));
        }
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| ContainerError::NotBound(name.to_owned()))?;

        let instance = factory(container).map_err(|source| ContainerError::Factory {
            name: name.to_owned(),
            source: Box::new(source),
        })?;
        tracing::debug!(binding = name, "singleton constructed");
        *slot = Some(Arc::clone(&instance));
        Ok(instance)
    }
}

/// Named singleton bindings.
///
/// Values are stored by name and resolved by type; `make` clones the stored
/// value, so bind cheap handles such as `Arc<T>`. A singleton factory runs on
/// the first `make` and its result is reused. A factory must not resolve its
/// own binding.
///
/// ```
/// use std::sync::Arc;
/// use verity_plugin::Container;
///
/// let mut container = Container::new();
/// container.instance("greeting", Arc::new(String::from("hello")));
/// container.singleton("answer", |_| Ok(42_u32));
///
/// let greeting: Arc<String> = container.make("greeting").unwrap();
/// assert_eq!(greeting.as_str(), "hello");
/// assert_eq!(container.make::<u32>("answer").unwrap(), 42);
/// assert!(container.make::<u64>("answer").is_err());
/// ```
#[derive(Default)]
pub struct Container {
    bindings: HashMap<String, Binding>,
}

impl Container {
    /// An empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a lazily constructed singleton, replacing any previous binding.
    pub fn singleton<T, F>(&mut self, name: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |container: &Container| -> Result<Instance, ContainerError> {
            let instance: Instance = Arc::new(factory(container)?);
            Ok(instance)
        });
        self.bind(name.into(), Binding {
            factory: Some(factory),
            instance: Mutex::new(None),
        });
    }

    /// Binds an existing value, replacing any previous binding.
    pub fn instance<T>(&mut self, name: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.bind(name.into(), Binding {
            factory: None,
            instance: Mutex::new(Some(Arc::new(value))),
        });
    }

    fn bind(&mut self, name: String, binding: Binding) {
        if self.bindings.insert(name.clone(), binding).is_some() {
            tracing::debug!(binding = %name, "binding replaced");
        }
    }

    /// Resolves `name` as a `T`.
    pub fn make<T>(&self, name: &str) -> Result<T, ContainerError>
    where
        T: Any + Send + Sync + Clone,
    {
        let binding = self
            .bindings
            .get(name)
            .ok_or_else(|| ContainerError::NotBound(name.to_owned()))?;
        let instance = binding.resolve(self, name)?;
        instance
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| ContainerError::TypeMismatch {
                name: name.to_owned(),
                expected: type_name::<T>(),
            })
    }

    /// True if `name` is bound.
    pub fn has(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bound names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.names())
            .finish()
    }
}
