//! Internal session registration endpoints
//!
//! Called by the authentication backend, never by browsers. Every call
//! must present the shared gateway secret.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::{HeaderMap, StatusCode};
use portico_auth::token::generate_token;
use portico_auth::{Session, SessionAuthority, SessionStore};
use portico_core::GatewayError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::ApiError;
use crate::extract::{ExtractJson, ExtractPath};

const GATEWAY_SECRET_HEADER: &str = "x-gateway-secret";

/// Shared state for the internal session endpoints
#[derive(Clone)]
pub struct InternalState {
    pub sessions: SessionStore,
    pub gateway_secret: SecretString,
}

/// Request body for session registration
#[derive(Debug, Deserialize)]
pub struct RegisterSessionBody {
    pub username: String,
    /// Token to register; one is minted when absent
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredSession {
    pub auth_token: String,
}

/// Handle `POST /internal/sessions`
pub async fn register_session_handler(
    State(state): State<InternalState>,
    headers: HeaderMap,
    ExtractJson(body): ExtractJson<RegisterSessionBody>,
) -> Result<impl IntoResponse, ApiError> {
    verify_gateway_secret(&headers, &state.gateway_secret)?;

    let token = body.token.filter(|t| !t.is_empty()).unwrap_or_else(generate_token);
    state.sessions.insert(
        &token,
        Session {
            username: body.username,
        },
    )?;

    Ok((StatusCode::CREATED, Json(RegisteredSession { auth_token: token })))
}

/// Handle `DELETE /internal/sessions/{token}`
pub async fn revoke_session_handler(
    State(state): State<InternalState>,
    headers: HeaderMap,
    ExtractPath(token): ExtractPath<String>,
) -> Result<StatusCode, ApiError> {
    verify_gateway_secret(&headers, &state.gateway_secret)?;

    if state.sessions.invalidate(Some(token.as_str()))? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(GatewayError::ResourceNotFound("no such session".to_owned()).into())
    }
}

fn verify_gateway_secret(headers: &HeaderMap, expected: &SecretString) -> Result<(), GatewayError> {
    let secret = headers
        .get(GATEWAY_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    if secret == Some(expected.expose_secret()) {
        Ok(())
    } else {
        Err(GatewayError::Forbidden("invalid gateway secret".to_owned()))
    }
}
