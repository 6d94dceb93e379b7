//! Prelude module for convenient imports.
//!
//! ```
//! use verity_validator::prelude::*;
//!
//! let validator = Validator::new([with_skip_on_empty(true)]);
//! assert!(validator.registry().contains("slug"));
//! ```

pub use crate::config::{
    Config, ConfigOption, MissingDatabase, with_locale, with_missing_database,
    with_skip_on_empty, with_stop_on_error,
};
pub use crate::database::RowCounter;
pub use crate::error::{Error, SchemaError, ValidationErrors};
pub use crate::registry::{Rule, RuleRegistry};
pub use crate::schema::{Schema, SchemaSpec, Validatable};
pub use crate::validator::Validator;
