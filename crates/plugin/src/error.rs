//! Plugin error types.

/// Errors from resolving container bindings.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ContainerError {
    /// Nothing is bound under this name.
    #[error("no binding named '{0}'")]
    NotBound(String),

    /// The binding holds a value of another type.
    #[error("binding '{name}' is not a {expected}")]
    TypeMismatch {
        /// Binding name.
        name: String,
        /// Requested type.
        expected: &'static str,
    },

    /// The singleton factory failed.
    #[error("factory for '{name}' failed: {source}")]
    Factory {
        /// Binding name.
        name: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors from plugin operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PluginError {
    /// Metadata failed validation.
    #[error("invalid plugin metadata: {field} {reason}")]
    InvalidMetadata {
        /// Offending field.
        field: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// A provider with this name is already registered.
    #[error("provider '{0}' is already registered")]
    AlreadyRegistered(String),

    /// Providers were booted before.
    #[error("providers have already been booted")]
    AlreadyBooted,

    /// A provider's register or boot step failed.
    #[error("provider '{provider}' failed to {phase}: {source}")]
    Lifecycle {
        /// Provider name.
        provider: String,
        /// `register` or `boot`.
        phase: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<PluginError>,
    },

    /// Resolving a binding failed.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = ContainerError::TypeMismatch {
            name: "database".into(),
            expected: "u32",
        };
        assert_eq!(err.to_string(), "binding 'database' is not a u32");
    }

    #[test]
    fn test_lifecycle_display() {
        let err = PluginError::Lifecycle {
            provider: "validation".into(),
            phase: "boot",
            source: Box::new(PluginError::Container(ContainerError::NotBound(
                "validation".into(),
            ))),
        };
        assert_eq!(
            err.to_string(),
            "provider 'validation' failed to boot: no binding named 'validation'"
        );
    }
}
