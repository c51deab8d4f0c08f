//! Translation of raised domain errors into JSON error responses
//!
//! Handlers return `Result<_, ApiError>`. The error travels out of the
//! handler inside the response extensions, where the error mapping
//! middleware picks it up and hands it to [`ErrorMapper`] together with
//! the request's parameters.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use portico_auth::SessionAuthority;
use portico_auth::token::fingerprint;
use http::StatusCode;
use http::header::ALLOW;
use portico_core::{ErrorBody, ErrorType, GatewayError, GatewayStatus, HttpError, RequestParameters};

use crate::parameters::collect_parameters;

/// A domain error raised by a handler
///
/// Any [`HttpError`] converts into `ApiError`, so handlers can use `?`.
#[derive(Debug, Clone)]
pub struct ApiError(Arc<dyn HttpError>);

impl ApiError {
    pub fn as_http_error(&self) -> &dyn HttpError {
        self.0.as_ref()
    }
}

impl<E> From<E> for ApiError
where
    E: HttpError + 'static,
{
    fn from(error: E) -> Self {
        Self(Arc::new(error))
    }
}

impl IntoResponse for ApiError {
    /// Render the bare error body and attach the error for the mapper
    ///
    /// Outside the error mapping middleware the client still gets the
    /// JSON body; inside it the mapper replaces this response.
    fn into_response(self) -> Response {
        let mut response = error_response(self.as_http_error());
        response.extensions_mut().insert(self);
        response
    }
}

/// Converts domain errors into HTTP responses
///
/// Authorization failures additionally tear down the session named by
/// the request's `token` parameter.
pub struct ErrorMapper {
    sessions: Arc<dyn SessionAuthority>,
}

impl ErrorMapper {
    pub fn new(sessions: Arc<dyn SessionAuthority>) -> Self {
        Self { sessions }
    }

    /// Build the response for `error`
    ///
    /// Always produces a response carrying the error's own status code,
    /// whatever the outcome of session invalidation.
    pub fn translate(&self, error: &dyn HttpError, parameters: &RequestParameters) -> Response {
        if error.is_authorization_failure() {
            self.invalidate_session(parameters.token());
        }

        tracing::debug!(
            status = error.status_code().as_u16(),
            protocol_code = error.gateway_status().map(GatewayStatus::protocol_code),
            error_type = ?error.error_type(),
            "translated error response"
        );

        error_response(error)
    }

    fn invalidate_session(&self, token: Option<&str>) {
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| self.sessions.invalidate(token)));

        match outcome {
            Ok(Ok(true)) => {
                tracing::debug!(
                    token = token.map(fingerprint).as_deref().unwrap_or_default(),
                    "implicitly invalidated session"
                );
            }
            Ok(Ok(false)) => {}
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "failed to invalidate session after authorization failure");
            }
            Err(_) => {
                tracing::warn!("session authority panicked while invalidating session");
            }
        }
    }
}

/// Serialize `error` into a JSON response with its declared status
fn error_response(error: &dyn HttpError) -> Response {
    let body = ErrorBody::from_error(error);
    (error.status_code(), Json(body)).into_response()
}

/// Middleware that routes every raised [`ApiError`] through the mapper
///
/// Collects the request parameters before the handler runs and exposes
/// them to handlers as a request extension.
pub async fn error_mapping_middleware(
    mapper: Arc<ErrorMapper>,
    form_body_limit: usize,
    request: Request,
    next: Next,
) -> Response {
    let (mut request, parameters) = match collect_parameters(request, form_body_limit).await {
        Ok(collected) => collected,
        Err(rejection) => return mapper.translate(&rejection.error, &rejection.parameters),
    };

    request.extensions_mut().insert(parameters.clone());

    let mut response = next.run(request).await;

    let Some(error) = response.extensions_mut().remove::<ApiError>() else {
        return response;
    };

    let mut translated = mapper.translate(error.as_http_error(), &parameters);

    if let Some(allow) = response.headers_mut().remove(ALLOW) {
        translated.headers_mut().insert(ALLOW, allow);
    }

    translated
}

/// Fallback for unmatched routes
pub async fn not_found_handler() -> ApiError {
    GatewayError::ResourceNotFound("no such resource".to_owned()).into()
}

/// A route matched but does not accept the request method
#[derive(Debug, thiserror::Error)]
#[error("method not allowed")]
pub struct MethodNotAllowed;

impl HttpError for MethodNotAllowed {
    fn status_code(&self) -> StatusCode {
        StatusCode::METHOD_NOT_ALLOWED
    }

    fn error_type(&self) -> ErrorType {
        ErrorType::BadRequest
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

/// Fallback for matched routes called with an unsupported method
pub async fn method_not_allowed_handler() -> ApiError {
    MethodNotAllowed.into()
}
