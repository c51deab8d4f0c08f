//! Shared types for the Portico gateway API
//!
//! Domain errors, the gateway status table, the JSON error body, and the
//! typed request parameter map consumed by the error translator

#![allow(clippy::must_use_candidate)]

mod body;
mod error;
mod params;
mod status;

pub use body::{ErrorBody, ErrorType, Field};
pub use error::{GatewayError, HttpError};
pub use params::RequestParameters;
pub use status::GatewayStatus;
