use serde::Serialize;

use crate::HttpError;

/// Machine-readable classification carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    /// The request was malformed or conflicts with current state
    BadRequest,
    /// Supplied credentials were rejected
    InvalidCredentials,
    /// More credentials are needed before the request can proceed
    InsufficientCredentials,
    /// The gateway or an upstream failed
    InternalError,
    /// The requested resource does not exist
    NotFound,
    /// The caller is not permitted to perform the request
    PermissionDenied,
}

/// A credential the client must supply to proceed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Parameter name the value is submitted under
    pub name: String,
    /// Input kind (e.g. `USERNAME`, `PASSWORD`)
    #[serde(rename = "type")]
    pub field_type: String,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }

    pub fn username(name: impl Into<String>) -> Self {
        Self::new(name, "USERNAME")
    }

    pub fn password(name: impl Into<String>) -> Self {
        Self::new(name, "PASSWORD")
    }
}

/// JSON body returned to API clients for a failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub status_code: u16,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected: Vec<Field>,
}

impl ErrorBody {
    /// Snapshot an error into its wire representation
    pub fn from_error<E: HttpError + ?Sized>(error: &E) -> Self {
        Self {
            message: error.client_message(),
            status_code: error.status_code().as_u16(),
            error_type: error.error_type(),
            expected: error.expected_fields().to_vec(),
        }
    }
}
