//! HTTP rendering of binding and validation failures.

use axum::Json;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use verity_validator::{Error, ValidationErrors};

/// Why a validating extractor refused a request.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidationRejection {
    /// The body or query string could not be deserialized.
    #[error("invalid request data: {0}")]
    Bind(String),

    /// One or more fields failed their rules.
    #[error("{0}")]
    Invalid(ValidationErrors),

    /// The schema or the value itself could not be processed.
    #[error("validation misconfigured: {0}")]
    Misconfigured(String),

    /// A database rule could not run.
    #[error("validation unavailable: {0}")]
    Unavailable(String),
}

impl ValidationRejection {
    /// Response status.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Bind(_) => StatusCode::BAD_REQUEST,
            Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Field errors, for [`ValidationRejection::Invalid`].
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<Error> for ValidationRejection {
    fn from(error: Error) -> Self {
        match error {
            Error::Validation(errors) => Self::Invalid(errors),
            error @ (Error::DatabaseUnavailable { .. } | Error::Database { .. }) => {
                Self::Unavailable(error.to_string())
            }
            other => Self::Misconfigured(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ValidationRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self::Bind(rejection.body_text())
    }
}

impl From<FormRejection> for ValidationRejection {
    fn from(rejection: FormRejection) -> Self {
        Self::Bind(rejection.body_text())
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request validation could not run");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = match self {
            Self::Bind(error) => json!({"message": "Invalid request data", "error": error}),
            Self::Invalid(errors) => json!({"message": "Validation failed", "errors": errors}),
            Self::Misconfigured(error) => {
                json!({"message": "Validation misconfigured", "error": error})
            }
            Self::Unavailable(error) => json!({"message": "Validation unavailable", "error": error}),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_validator::SchemaError;

    #[test]
    fn test_error_mapping() {
        let mut errors = ValidationErrors::new();
        errors.add("slug", "slug", "slug must be a valid URL slug");

        assert_eq!(
            ValidationRejection::from(Error::Validation(errors)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ValidationRejection::from(Error::Schema(SchemaError::UnknownScene("x".into()))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ValidationRejection::from(Error::DatabaseUnavailable {
                field: "email".into(),
                rule: "unique".into(),
            })
            .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ValidationRejection::Bind("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
