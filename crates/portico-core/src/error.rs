use http::StatusCode;
use thiserror::Error;

use crate::{ErrorType, Field, GatewayStatus};

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each crate's error type. The server layer converts
/// these into actual HTTP responses, keeping domain errors decoupled
/// from axum.
pub trait HttpError: std::error::Error + Send + Sync {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error classification
    fn error_type(&self) -> ErrorType;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// Whether the caller's credentials were invalid, expired, or absent
    ///
    /// The translator tears down the caller's session for these errors.
    fn is_authorization_failure(&self) -> bool {
        false
    }

    /// Credentials the client must supply before retrying
    fn expected_fields(&self) -> &[Field] {
        &[]
    }

    /// Gateway status condition, when the error corresponds to one
    fn gateway_status(&self) -> Option<GatewayStatus> {
        None
    }
}

/// Errors raised by gateway request handling
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Unexpected failure inside the gateway
    #[error("{0}")]
    Server(String),

    /// The gateway is temporarily unable to take more work
    #[error("{0}")]
    ServerBusy(String),

    /// The requested operation is not supported
    #[error("{0}")]
    Unsupported(String),

    /// An upstream remote desktop server did not respond in time
    #[error("{0}")]
    UpstreamTimeout(String),

    /// An upstream remote desktop server reported an error
    #[error("{0}")]
    UpstreamError(String),

    /// The upstream remote desktop server could not be located
    #[error("{0}")]
    UpstreamNotFound(String),

    /// The upstream remote desktop server refused the connection
    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("{0}")]
    ResourceNotFound(String),

    #[error("{0}")]
    ResourceConflict(String),

    #[error("{0}")]
    ResourceClosed(String),

    #[error("{0}")]
    SessionConflict(String),

    #[error("{0}")]
    SessionTimeout(String),

    #[error("{0}")]
    SessionClosed(String),

    /// Malformed or otherwise unacceptable request
    #[error("{0}")]
    BadRequest(String),

    /// The authenticated caller lacks permission
    #[error("{0}")]
    Forbidden(String),

    /// The caller is not authenticated or their session is no longer valid
    #[error("{0}")]
    Unauthorized(String),

    /// Credentials were supplied but rejected
    #[error("{message}")]
    InvalidCredentials { message: String, expected: Vec<Field> },

    /// Credentials were missing or incomplete
    #[error("{message}")]
    InsufficientCredentials { message: String, expected: Vec<Field> },

    #[error("{0}")]
    ClientTimeout(String),

    /// Request exceeded a size limit
    #[error("{0}")]
    ClientOverrun(String),

    /// Request content type is not accepted
    #[error("{0}")]
    ClientBadType(String),

    /// The caller has too many concurrent sessions or requests
    #[error("{0}")]
    ClientTooMany(String),
}

impl GatewayError {
    /// Gateway status condition for this error
    pub const fn status(&self) -> GatewayStatus {
        match self {
            Self::Server(_) => GatewayStatus::ServerError,
            Self::ServerBusy(_) => GatewayStatus::ServerBusy,
            Self::Unsupported(_) => GatewayStatus::Unsupported,
            Self::UpstreamTimeout(_) => GatewayStatus::UpstreamTimeout,
            Self::UpstreamError(_) => GatewayStatus::UpstreamError,
            Self::UpstreamNotFound(_) => GatewayStatus::UpstreamNotFound,
            Self::UpstreamUnavailable(_) => GatewayStatus::UpstreamUnavailable,
            Self::ResourceNotFound(_) => GatewayStatus::ResourceNotFound,
            Self::ResourceConflict(_) => GatewayStatus::ResourceConflict,
            Self::ResourceClosed(_) => GatewayStatus::ResourceClosed,
            Self::SessionConflict(_) => GatewayStatus::SessionConflict,
            Self::SessionTimeout(_) => GatewayStatus::SessionTimeout,
            Self::SessionClosed(_) => GatewayStatus::SessionClosed,
            Self::BadRequest(_) => GatewayStatus::ClientBadRequest,
            Self::Forbidden(_) => GatewayStatus::ClientForbidden,
            Self::Unauthorized(_) | Self::InvalidCredentials { .. } | Self::InsufficientCredentials { .. } => {
                GatewayStatus::ClientUnauthorized
            }
            Self::ClientTimeout(_) => GatewayStatus::ClientTimeout,
            Self::ClientOverrun(_) => GatewayStatus::ClientOverrun,
            Self::ClientBadType(_) => GatewayStatus::ClientBadType,
            Self::ClientTooMany(_) => GatewayStatus::ClientTooMany,
        }
    }
}

impl HttpError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.status().http_status()
    }

    fn error_type(&self) -> ErrorType {
        match self {
            Self::InvalidCredentials { .. } => ErrorType::InvalidCredentials,
            Self::InsufficientCredentials { .. } => ErrorType::InsufficientCredentials,
            Self::Unauthorized(_) | Self::Forbidden(_) => ErrorType::PermissionDenied,
            Self::ResourceNotFound(_) | Self::ResourceClosed(_) | Self::SessionClosed(_) => ErrorType::NotFound,
            Self::Server(_)
            | Self::ServerBusy(_)
            | Self::Unsupported(_)
            | Self::UpstreamTimeout(_)
            | Self::UpstreamError(_)
            | Self::UpstreamNotFound(_)
            | Self::UpstreamUnavailable(_) => ErrorType::InternalError,
            Self::ResourceConflict(_)
            | Self::SessionConflict(_)
            | Self::SessionTimeout(_)
            | Self::BadRequest(_)
            | Self::ClientTimeout(_)
            | Self::ClientOverrun(_)
            | Self::ClientBadType(_)
            | Self::ClientTooMany(_) => ErrorType::BadRequest,
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn is_authorization_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_) | Self::InvalidCredentials { .. } | Self::InsufficientCredentials { .. }
        )
    }

    fn expected_fields(&self) -> &[Field] {
        match self {
            Self::InvalidCredentials { expected, .. } | Self::InsufficientCredentials { expected, .. } => expected,
            _ => &[],
        }
    }

    fn gateway_status(&self) -> Option<GatewayStatus> {
        Some(self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_are_authorization_failures() {
        let errors = [
            GatewayError::Unauthorized("permission denied".to_owned()),
            GatewayError::InvalidCredentials {
                message: "invalid login".to_owned(),
                expected: vec![Field::username("username"), Field::password("password")],
            },
            GatewayError::InsufficientCredentials {
                message: "login required".to_owned(),
                expected: Vec::new(),
            },
        ];

        for error in &errors {
            assert!(error.is_authorization_failure(), "{error:?}");
            assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
        }
    }

    #[test]
    fn forbidden_is_not_an_authorization_failure() {
        let error = GatewayError::Forbidden("read-only connection".to_owned());
        assert!(!error.is_authorization_failure());
        assert_eq!(error.error_type(), ErrorType::PermissionDenied);
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_errors_report_server_status() {
        let error = GatewayError::UpstreamUnavailable("connection refused".to_owned());
        assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(error.error_type(), ErrorType::InternalError);
        assert_eq!(error.client_message(), "connection refused");
    }

    #[test]
    fn expected_fields_only_on_credential_errors() {
        let error = GatewayError::InvalidCredentials {
            message: "invalid login".to_owned(),
            expected: vec![Field::username("username")],
        };
        assert_eq!(error.expected_fields(), &[Field::username("username")]);
        assert!(GatewayError::BadRequest("bad".to_owned()).expected_fields().is_empty());
    }

    #[test]
    fn gateway_status_carries_protocol_code() {
        let error = GatewayError::Unauthorized("permission denied".to_owned());
        assert_eq!(error.gateway_status(), Some(GatewayStatus::ClientUnauthorized));
        assert_eq!(error.gateway_status().map(GatewayStatus::protocol_code), Some(0x0301));
    }
}
