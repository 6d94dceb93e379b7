//! Plugin metadata and builder.

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::PluginError;

/// Static metadata describing a service provider.
///
/// Built via the builder API:
///
/// ```
/// use verity_plugin::PluginMetadata;
///
/// let meta = PluginMetadata::builder("mailer", "1.2.0")
///     .description("Outbound mail")
///     .dependency("queue")
///     .build()
///     .unwrap();
///
/// assert_eq!(meta.name(), "mailer");
/// assert_eq!(meta.version().minor, 2);
/// assert_eq!(meta.dependencies(), ["queue"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    name: String,
    version: Version,
    #[serde(default)]
    description: String,
    #[serde(default)]
    dependencies: Vec<String>,
}

impl PluginMetadata {
    /// Start building metadata with a name and a semver version string.
    pub fn builder(name: impl Into<String>, version: impl AsRef<str>) -> PluginMetadataBuilder {
        PluginMetadataBuilder {
            name: name.into(),
            version: version.as_ref().to_owned(),
            description: String::new(),
            dependencies: Vec::new(),
        }
    }

    /// Binding name the provider registers under.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider version.
    #[inline]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Short description.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Names of bindings the provider uses when present.
    #[inline]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

/// Builder for [`PluginMetadata`].
#[derive(Debug)]
pub struct PluginMetadataBuilder {
    name: String,
    version: String,
    description: String,
    dependencies: Vec<String>,
}

impl PluginMetadataBuilder {
    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a dependency name.
    pub fn dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    /// Validate and build the metadata.
    pub fn build(self) -> Result<PluginMetadata, PluginError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PluginError::InvalidMetadata {
                field: "name",
                reason: "must not be empty".into(),
            });
        }

        let version = Version::parse(self.version.trim()).map_err(|e| {
            PluginError::InvalidMetadata {
                field: "version",
                reason: format!("'{}' is not semver: {e}", self.version),
            }
        })?;

        Ok(PluginMetadata {
            name: name.to_owned(),
            version,
            description: self.description,
            dependencies: self.dependencies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_minimal() {
        let meta = PluginMetadata::builder("cache", "0.3.1").build().unwrap();
        assert_eq!(meta.name(), "cache");
        assert_eq!(meta.version(), &Version::new(0, 3, 1));
        assert!(meta.description().is_empty());
        assert!(meta.dependencies().is_empty());
    }

    #[test]
    fn test_builder_trims_name() {
        let meta = PluginMetadata::builder("  cache ", "1.0.0").build().unwrap();
        assert_eq!(meta.name(), "cache");
    }

    #[test]
    fn test_builder_rejects_empty_name() {
        let err = PluginMetadata::builder(" ", "1.0.0").build().unwrap_err();
        assert!(matches!(err, PluginError::InvalidMetadata { field: "name", .. }));
    }

    #[test]
    fn test_builder_rejects_bad_version() {
        let err = PluginMetadata::builder("cache", "v1").build().unwrap_err();
        assert!(matches!(err, PluginError::InvalidMetadata { field: "version", .. }));
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let meta: PluginMetadata =
            serde_json::from_str(r#"{"name": "cache", "version": "2.0.0"}"#).unwrap();
        assert_eq!(meta.version().major, 2);
        assert!(meta.dependencies().is_empty());
    }
}
