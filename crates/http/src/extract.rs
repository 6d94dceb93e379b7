//! Validating extractors.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use axum::extract::{FromRef, FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use verity_validator::{Validatable, Validator};

use crate::rejection::ValidationRejection;
use crate::scene::{NoScene, Scene};

/// Validates an already bound value, for handlers that bind by hand.
pub async fn validate_request<T: Validatable>(
    validator: &Validator,
    value: &T,
    scene: Option<&str>,
) -> Result<(), ValidationRejection> {
    validator
        .validate_scene(value, scene)
        .await
        .map_err(ValidationRejection::from)
}

// ============================================================================
// JSON
// ============================================================================

/// JSON body, deserialized and validated.
///
/// The second field carries the [`Scene`]; destructure with
/// `ValidatedJson(body, _)`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T, S = NoScene>(pub T, pub PhantomData<fn() -> S>);

impl<T, S> ValidatedJson<T, S> {
    /// The validated value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> Deref for ValidatedJson<T, S> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T, S> DerefMut for ValidatedJson<T, S> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T, Sc, St> FromRequest<St> for ValidatedJson<T, Sc>
where
    T: DeserializeOwned + Validatable + Send + Sync,
    Sc: Scene,
    St: Send + Sync,
    Arc<Validator>: FromRef<St>,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        let validator = Arc::<Validator>::from_ref(state);
        validate_request(&validator, &value, Sc::NAME).await?;
        Ok(Self(value, PhantomData))
    }
}

// ============================================================================
// JSON OR FORM
// ============================================================================

/// JSON body when the content type is JSON, otherwise a urlencoded form
/// (the query string for `GET` and `HEAD`), then validated.
#[derive(Debug, Clone)]
pub struct Validated<T, S = NoScene>(pub T, pub PhantomData<fn() -> S>);

impl<T, S> Validated<T, S> {
    /// The validated value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> Deref for Validated<T, S> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T, S> DerefMut for Validated<T, S> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

impl<T, Sc, St> FromRequest<St> for Validated<T, Sc>
where
    T: DeserializeOwned + Validatable + Send + Sync,
    Sc: Scene,
    St: Send + Sync,
    Arc<Validator>: FromRef<St>,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
        let value = if is_json(&req) {
            Json::<T>::from_request(req, state).await?.0
        } else {
            Form::<T>::from_request(req, state).await?.0
        };
        let validator = Arc::<Validator>::from_ref(state);
        validate_request(&validator, &value, Sc::NAME).await?;
        Ok(Self(value, PhantomData))
    }
}
