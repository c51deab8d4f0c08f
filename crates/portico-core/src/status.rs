use http::StatusCode;

/// Status conditions shared by the gateway protocol and its web API
///
/// Every condition has a fixed HTTP status and a numeric protocol code.
/// The protocol code is what remote-desktop clients see on the tunnel; the
/// web API only reports the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayStatus {
    Unsupported,
    ServerError,
    ServerBusy,
    UpstreamTimeout,
    UpstreamError,
    ResourceNotFound,
    ResourceConflict,
    ResourceClosed,
    UpstreamNotFound,
    UpstreamUnavailable,
    SessionConflict,
    SessionTimeout,
    SessionClosed,
    ClientBadRequest,
    ClientUnauthorized,
    ClientForbidden,
    ClientTimeout,
    ClientOverrun,
    ClientBadType,
    ClientTooMany,
}

impl GatewayStatus {
    /// HTTP status reported for this condition
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::Unsupported => StatusCode::NOT_IMPLEMENTED,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServerBusy => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamError | Self::UpstreamNotFound | Self::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            Self::ResourceNotFound | Self::ResourceClosed | Self::SessionClosed => StatusCode::NOT_FOUND,
            Self::ResourceConflict | Self::SessionConflict => StatusCode::CONFLICT,
            Self::SessionTimeout | Self::ClientTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::ClientBadRequest => StatusCode::BAD_REQUEST,
            Self::ClientUnauthorized | Self::ClientForbidden => StatusCode::FORBIDDEN,
            Self::ClientOverrun => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ClientBadType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::ClientTooMany => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Numeric status code used by the gateway protocol
    pub const fn protocol_code(self) -> u16 {
        match self {
            Self::Unsupported => 0x0100,
            Self::ServerError => 0x0200,
            Self::ServerBusy => 0x0201,
            Self::UpstreamTimeout => 0x0202,
            Self::UpstreamError => 0x0203,
            Self::ResourceNotFound => 0x0204,
            Self::ResourceConflict => 0x0205,
            Self::ResourceClosed => 0x0206,
            Self::UpstreamNotFound => 0x0207,
            Self::UpstreamUnavailable => 0x0208,
            Self::SessionConflict => 0x0209,
            Self::SessionTimeout => 0x020A,
            Self::SessionClosed => 0x020B,
            Self::ClientBadRequest => 0x0300,
            Self::ClientUnauthorized => 0x0301,
            Self::ClientForbidden => 0x0303,
            Self::ClientTimeout => 0x0308,
            Self::ClientOverrun => 0x030D,
            Self::ClientBadType => 0x030F,
            Self::ClientTooMany => 0x031D,
        }
    }
}
