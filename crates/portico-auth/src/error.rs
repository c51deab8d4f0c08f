use http::StatusCode;
use portico_core::{ErrorType, GatewayStatus, HttpError};

/// Session authority errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token is empty or otherwise unusable as a session key
    #[error("malformed session token")]
    MalformedToken,

    /// Backing session storage could not be reached
    #[error("session storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl HttpError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedToken => StatusCode::BAD_REQUEST,
            Self::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn gateway_status(&self) -> Option<GatewayStatus> {
        match self {
            Self::MalformedToken => Some(GatewayStatus::ClientBadRequest),
            Self::StorageUnavailable(_) => Some(GatewayStatus::ServerBusy),
        }
    }

    fn error_type(&self) -> ErrorType {
        match self {
            Self::MalformedToken => ErrorType::BadRequest,
            Self::StorageUnavailable(_) => ErrorType::InternalError,
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::MalformedToken => self.to_string(),
            Self::StorageUnavailable(_) => "session storage is temporarily unavailable".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failure_hides_details_from_clients() {
        let error = AuthError::StorageUnavailable("redis: connection refused".to_owned());

        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!error.client_message().contains("redis"));
        assert_eq!(
            error.gateway_status().map(GatewayStatus::protocol_code),
            Some(0x0201)
        );
    }

    #[test]
    fn gateway_status_agrees_with_http_status() {
        for error in [AuthError::MalformedToken, AuthError::StorageUnavailable(String::new())] {
            let status = error.gateway_status().unwrap();
            assert_eq!(status.http_status(), error.status_code());
        }
    }
}
