//! Extractors whose rejections flow through the error mapper
//!
//! axum's own extractors answer with plain-text bodies. These wrappers
//! turn the rejection into a [`GatewayError`] so clients get the usual
//! JSON error body.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use http::StatusCode;
use http::request::Parts;
use portico_core::GatewayError;
use serde::de::DeserializeOwned;

use crate::ApiError;

/// JSON request body
pub struct ExtractJson<T>(pub T);

impl<S, T> FromRequest<S> for ExtractJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(json_rejection)?;

        Ok(Self(value))
    }
}

/// Path parameters
pub struct ExtractPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ExtractPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;

        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "rejected JSON body");

    if rejection.status() == StatusCode::UNSUPPORTED_MEDIA_TYPE {
        GatewayError::ClientBadType("expected content type application/json".to_owned()).into()
    } else {
        GatewayError::BadRequest(rejection.body_text()).into()
    }
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    tracing::debug!(error = %rejection, "rejected path parameters");
    GatewayError::BadRequest(rejection.body_text()).into()
}
