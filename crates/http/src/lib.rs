//! # verity-http
//!
//! Request binding and validation for axum.
//!
//! [`ValidatedJson`] and [`Validated`] deserialize the request, validate it
//! with the [`Validator`](verity_validator::Validator) found in router state
//! and reject with a JSON body when either step fails:
//!
//! | failure | status | body |
//! |---|---|---|
//! | body or query could not be bound | 400 | `{"message": "Invalid request data", "error": "..."}` |
//! | a field failed its rules | 422 | `{"message": "Validation failed", "errors": {field: {rule: message}}}` |
//! | the type's schema is broken | 500 | `{"message": "Validation misconfigured", "error": "..."}` |
//! | a database rule could not run | 503 | `{"message": "Validation unavailable", "error": "..."}` |
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use axum::{Router, routing::post};
//! use serde::{Deserialize, Serialize};
//! use verity_http::ValidatedJson;
//! use verity_validator::{SchemaSpec, Validatable, Validator};
//!
//! #[derive(Deserialize, Serialize)]
//! struct CreateTag {
//!     slug: String,
//! }
//!
//! impl Validatable for CreateTag {
//!     fn schema() -> SchemaSpec {
//!         SchemaSpec::new().field("slug", "required|slug")
//!     }
//! }
//!
//! async fn create_tag(ValidatedJson(tag, _): ValidatedJson<CreateTag>) -> String {
//!     tag.slug
//! }
//!
//! let app: Router = Router::new()
//!     .route("/tags", post(create_tag))
//!     .with_state(Arc::new(Validator::default()));
//! ```

mod extract;
mod rejection;
mod scene;

pub use extract::{Validated, ValidatedJson, validate_request};
pub use rejection::ValidationRejection;
pub use scene::{NoScene, Scene};
