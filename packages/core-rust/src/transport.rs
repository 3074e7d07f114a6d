//! Failures raised at the transport boundary by a resource broker.
//!
//! The broker owns the mapping from HTTP outcomes to [`TransportError`];
//! the classifier only ever looks at these variants, never at status codes.

use crate::violations::Violations;

/// A failure reported by the downstream API or the path to it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, refused, reset, timeout).
    #[error("downstream API unreachable: {message}")]
    Connectivity { message: String },
    /// 401 from the downstream API.
    #[error("downstream API rejected the gateway's credentials: {message}")]
    Unauthorized { message: String },
    /// 403 from the downstream API.
    #[error("downstream API forbade the request: {message}")]
    Forbidden { message: String },
    /// 404 with an empty body: the route itself does not exist, which points
    /// at a misconfigured base URL rather than a missing resource.
    #[error("downstream API route not found: {url}")]
    UrlNotFound { url: String },
    /// 404 with a body: the addressed resource does not exist.
    #[error("downstream API resource not found: {message}")]
    NotFound { message: String },
    /// 400 with the field errors the downstream API attached.
    #[error("downstream API rejected the request: {message}")]
    BadRequest { message: String, errors: Violations },
    /// Any other non-success status.
    #[error("downstream API returned status {status}: {message}")]
    Status { status: u16, message: String },
    /// A success response whose body could not be decoded.
    #[error("downstream API response could not be decoded: {message}")]
    Serialization { message: String },
}

impl TransportError {
    /// Failures that mean the gateway cannot talk to its dependency at all:
    /// unreachable, unauthenticated, unauthorized, or pointed at the wrong URL.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::Connectivity { .. }
                | Self::Unauthorized { .. }
                | Self::Forbidden { .. }
                | Self::UrlNotFound { .. }
        )
    }
}

/// Error type returned by every broker call.
///
/// `Unexpected` covers anything the broker did not anticipate as a transport
/// outcome; the classifier treats it as a gateway defect.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}
