//! # verity-validator
//!
//! Named validation rules for request data, with database-backed uniqueness
//! and existence checks.
//!
//! ## Quick Start
//!
//! ```
//! use serde::Serialize;
//! use verity_validator::{SchemaSpec, Validatable, Validator};
//!
//! #[derive(Serialize)]
//! struct CreateUser {
//!     email: String,
//!     username: String,
//!     timezone: String,
//! }
//!
//! impl Validatable for CreateUser {
//!     fn schema() -> SchemaSpec {
//!         SchemaSpec::new()
//!             .field("email", "required|email")
//!             .field("username", "required|username")
//!             .field("timezone", "timezone")
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let validator = Validator::default();
//! let user = CreateUser {
//!     email: "ada@example.com".into(),
//!     username: "ada_l".into(),
//!     timezone: "Europe/London".into(),
//! };
//! assert!(validator.validate_struct(&user).await.is_ok());
//! # }
//! ```
//!
//! ## Rules
//!
//! - **Generic**: `required`, `string`, `int`, `email`, `min_len:n`,
//!   `max_len:n`, `in:a,b,c`
//! - **Formats**: `uuid`, `slug`, `phone`, `password`, `username`,
//!   `alpha_space`, `color_hex`, `timezone`
//! - **Denylists**: `no_sql`, `no_xss`
//! - **Database**: `unique`, `exists`, `unique_multi` (see [`database`])
//!
//! Rule lines are compiled once per type; see [`SchemaSpec`] for the syntax.

mod config;
pub mod database;
mod error;
mod messages;
pub mod prelude;
pub mod registry;
pub mod rules;
mod schema;
mod validator;

pub use config::{
    Config, ConfigOption, MissingDatabase, with_locale, with_missing_database,
    with_skip_on_empty, with_stop_on_error,
};
pub use error::{ConfigError, Error, SchemaError, ValidationErrors};
pub use messages::MessageCatalog;
pub use registry::{Rule, RuleRegistry};
pub use schema::{CompiledRule, FieldRules, Schema, SchemaSpec, Validatable};
pub use validator::{Validator, ValidatorBuilder};
