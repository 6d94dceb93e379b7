//! The validator facade
//!
//! A [`Validator`] owns the configuration, the rule table, the message catalog,
//! a cache of compiled schemas and an optional database handle. It is meant to
//! be built once and shared behind an `Arc`; every method takes `&self`.
//!
//! # Examples
//!
//! ```
//! use serde::Serialize;
//! use verity_validator::{SchemaSpec, Validatable, Validator, with_stop_on_error};
//!
//! #[derive(Serialize)]
//! struct Signup {
//!     username: String,
//!     password: String,
//! }
//!
//! impl Validatable for Signup {
//!     fn schema() -> SchemaSpec {
//!         SchemaSpec::new()
//!             .field("username", "required|username")
//!             .field("password", "required|password")
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let validator = Validator::new([with_stop_on_error(false)]);
//! let err = validator
//!     .validate_struct(&Signup { username: "al".into(), password: "weak".into() })
//!     .await
//!     .unwrap_err();
//!
//! let errors = err.validation_errors().unwrap();
//! assert!(errors.has_field("username"));
//! assert!(errors.has_field("password"));
//! # }
//! ```

use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use dashmap::DashMap;
use serde_json::Value;

use crate::config::{Config, ConfigOption, MissingDatabase};
use crate::database::{DatabaseRule, RowCounter};
use crate::error::{Error, SchemaError, ValidationErrors};
use crate::messages::{self, MessageCatalog};
use crate::registry::{Rule, RuleRegistry};
use crate::rules;
use crate::schema::{Check, CompiledRule, Schema, SchemaSpec, Validatable};

/// The attached database. Wraps the trait object so it can live in an
/// `ArcSwapOption`.
struct DatabaseHandle(Arc<dyn RowCounter>);

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validates values against compiled schemas.
pub struct Validator {
    config: Config,
    registry: Arc<RuleRegistry>,
    messages: MessageCatalog,
    database: ArcSwapOption<DatabaseHandle>,
    schemas: DashMap<TypeId, Arc<Schema>>,
}

impl Validator {
    /// Default rules and messages, configured by `options` applied in order.
    pub fn new(options: impl IntoIterator<Item = ConfigOption>) -> Self {
        Self::builder().options(options).build()
    }

    /// Starts a [`ValidatorBuilder`].
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rule table schemas are compiled against.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Message catalog.
    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// Attaches or replaces the database used by database rules.
    ///
    /// Calls already running keep the handle they started with.
    pub fn attach_database(&self, counter: Arc<dyn RowCounter>) {
        let replaced = self
            .database
            .swap(Some(Arc::new(DatabaseHandle(counter))))
            .is_some();
        tracing::debug!(replaced, "database attached to validator");
    }

    /// Detaches the database, returning whether one was attached.
    pub fn detach_database(&self) -> bool {
        self.database.swap(None).is_some()
    }

    /// True if a database is attached.
    pub fn has_database(&self) -> bool {
        self.database.load().is_some()
    }

    /// Compiles `spec` against this validator's rules, bypassing the cache.
    pub fn compile(&self, spec: &SchemaSpec) -> Result<Schema, SchemaError> {
        Schema::compile(spec, &self.registry)
    }

    /// The compiled schema of `T`, compiled on first use.
    ///
    /// A compile error is not cached and is returned again on the next call.
    pub fn schema_for<T: Validatable>(&self) -> Result<Arc<Schema>, SchemaError> {
        let id = TypeId::of::<T>();
        if let Some(schema) = self.schemas.get(&id) {
            return Ok(Arc::clone(schema.value()));
        }

        let schema = match self.compile(&T::schema()) {
            Ok(schema) => Arc::new(schema),
            Err(error) => {
                tracing::error!(ty = type_name::<T>(), %error, "schema failed to compile");
                return Err(error);
            }
        };
        tracing::debug!(ty = type_name::<T>(), fields = schema.fields().len(), "schema compiled");
        Ok(Arc::clone(self.schemas.entry(id).or_insert(schema).value()))
    }

    /// Validates every field of `value`.
    pub async fn validate_struct<T: Validatable>(&self, value: &T) -> Result<(), Error> {
        self.validate_scene(value, None).await
    }

    /// Validates the fields of `scene`, or every field when `scene` is `None`.
    pub async fn validate_scene<T: Validatable>(
        &self,
        value: &T,
        scene: Option<&str>,
    ) -> Result<(), Error> {
        let root = serde_json::to_value(value)?;
        let schema = self.schema_for::<T>()?;
        self.validate_value(&schema, &root, scene).await
    }

    /// Validates a JSON value against a compiled schema.
    ///
    /// An empty scene name selects every field.
    pub async fn validate_value(
        &self,
        schema: &Schema,
        root: &Value,
        scene: Option<&str>,
    ) -> Result<(), Error> {
        let fields = schema.fields_for(scene.filter(|s| !s.is_empty()))?;
        let mut errors = ValidationErrors::new();

        for field in fields {
            let value = field.value_in(root);
            let skip_optional = self.config.skip_on_empty && rules::is_empty(value);

            for rule in field.rules() {
                if skip_optional && !rule.is_required() {
                    continue;
                }
                if !self.passes(field.name(), rule, value).await? {
                    errors.add(field.name(), rule.name(), self.message(schema, field.name(), rule));
                    break;
                }
            }

            if self.config.stop_on_error && !errors.is_empty() {
                break;
            }
        }

        if !errors.is_empty() {
            tracing::debug!(failed_fields = errors.len(), "validation failed");
        }
        errors.into_result().map_err(Error::Validation)
    }

    async fn passes(&self, field: &str, rule: &CompiledRule, value: &Value) -> Result<bool, Error> {
        Ok(match &rule.check {
            Check::Required => rules::required(value),
            Check::Predicate(predicate) => predicate(value),
            Check::MinLen(min) => rules::min_len(value, *min),
            Check::MaxLen(max) => rules::max_len(value, *max),
            Check::OneOf(options) => rules::one_of(value, options),
            Check::Database(db) => return self.check_database(field, db, value).await,
        })
    }

    async fn check_database(
        &self,
        field: &str,
        rule: &DatabaseRule,
        value: &Value,
    ) -> Result<bool, Error> {
        let name = rule.kind().name();
        let Some(handle) = self.database.load_full() else {
            return match self.config.missing_database {
                MissingDatabase::Pass => {
                    tracing::warn!(field, rule = name, "no database attached, rule skipped");
                    Ok(true)
                }
                MissingDatabase::Reject => Err(Error::DatabaseUnavailable {
                    field: field.to_owned(),
                    rule: name.to_owned(),
                }),
            };
        };

        rule.check(handle.0.as_ref(), value).await.map_err(|source| {
            tracing::error!(field, rule = name, error = %source, "database rule failed");
            Error::Database {
                field: field.to_owned(),
                rule: name.to_owned(),
                source,
            }
        })
    }

    fn message(&self, schema: &Schema, field: &str, rule: &CompiledRule) -> String {
        match schema.message(field, rule.name()) {
            Some(template) => messages::fill(template, field, rule.name(), rule.args()),
            None => self
                .messages
                .render(&self.config.locale, field, rule.name(), rule.args()),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .field("rules", &self.registry.len())
            .field("cached_schemas", &self.schemas.len())
            .field("has_database", &self.has_database())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`Validator`].
///
/// ```
/// use verity_validator::registry::Rule;
/// use verity_validator::{MissingDatabase, Validator, with_missing_database};
///
/// let validator = Validator::builder()
///     .option(with_missing_database(MissingDatabase::Pass))
///     .rule("even", Rule::predicate(|v| v.as_i64().is_some_and(|n| n % 2 == 0)))
///     .build();
///
/// assert!(validator.registry().contains("even"));
/// assert!(validator.registry().contains("slug"));
/// ```
#[derive(Default)]
#[must_use = "builder does nothing until .build() is called"]
pub struct ValidatorBuilder {
    config: Config,
    registry: Option<RuleRegistry>,
    messages: Option<MessageCatalog>,
    database: Option<Arc<dyn RowCounter>>,
}

impl ValidatorBuilder {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Applies one option.
    pub fn option(mut self, option: ConfigOption) -> Self {
        self.config.apply(option);
        self
    }

    /// Applies options in order.
    pub fn options(mut self, options: impl IntoIterator<Item = ConfigOption>) -> Self {
        self.config = self.config.with_options(options);
        self
    }

    /// Uses `registry` instead of the default rule table.
    pub fn registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Adds a rule to the table, starting from the defaults.
    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.registry
            .get_or_insert_with(RuleRegistry::with_defaults)
            .register(name, rule);
        self
    }

    /// Uses `messages` instead of the default catalog.
    pub fn messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Attaches a database at construction.
    pub fn database(mut self, counter: Arc<dyn RowCounter>) -> Self {
        self.database = Some(counter);
        self
    }

    /// Builds the validator.
    pub fn build(self) -> Validator {
        Validator {
            config: self.config,
            registry: Arc::new(self.registry.unwrap_or_else(RuleRegistry::with_defaults)),
            messages: self.messages.unwrap_or_default(),
            database: ArcSwapOption::new(self.database.map(|c| Arc::new(DatabaseHandle(c)))),
            schemas: DashMap::new(),
        }
    }
}

impl fmt::Debug for ValidatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBuilder")
            .field("config", &self.config)
            .field("custom_registry", &self.registry.is_some())
            .field("custom_messages", &self.messages.is_some())
            .field("has_database", &self.database.is_some())
            .finish()
    }
}
