use axum::extract::State;
use axum::{Extension, Json};
use portico_auth::SessionStore;
use portico_core::{GatewayError, RequestParameters};
use serde::Serialize;

use crate::ApiError;

/// Session details returned to the owner of a token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub username: String,
    pub auth_token: String,
}

/// Handle `GET /api/session`
///
/// Describes the session named by the `token` parameter. An absent or
/// unknown token is an authorization failure.
pub async fn session_handler(
    State(sessions): State<SessionStore>,
    Extension(parameters): Extension<RequestParameters>,
) -> Result<Json<SessionInfo>, ApiError> {
    let token = parameters.token().ok_or_else(permission_denied)?;
    let session = sessions.get(token).ok_or_else(permission_denied)?;

    Ok(Json(SessionInfo {
        username: session.username.clone(),
        auth_token: token.to_owned(),
    }))
}

fn permission_denied() -> GatewayError {
    GatewayError::Unauthorized("permission denied".to_owned())
}
