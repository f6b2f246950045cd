//! Short-circuit signals raised during resolution.
//!
//! # Responsibilities
//! - Distinguish a deliberate control-response from an unhandled fault
//! - Offer constructors for the common redirect and fault cases
//!
//! # Design Decisions
//! - A control-response is propagated verbatim and never logged as an
//!   error; a fault is logged and collapses to an opaque 500

use std::fmt;

use axum::body::Body;
use axum::http::{header, Response, StatusCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why resolution stopped early.
pub enum Break {
    /// A fully formed response short-circuiting normal flow: redirects,
    /// explicit 4xx/5xx. Returned to the client as-is.
    Response(Response<Body>),
    /// Any other failure during loading or composition.
    Fault(BoxError),
}

impl Break {
    /// A redirect control-response.
    pub fn redirect(status: StatusCode, location: &str) -> Self {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = status;
        if let Ok(value) = location.parse() {
            response.headers_mut().insert(header::LOCATION, value);
        }
        Break::Response(response)
    }

    /// A bare-status control-response.
    pub fn status(status: StatusCode) -> Self {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = status;
        Break::Response(response)
    }

    /// An unhandled fault.
    pub fn fault(err: impl Into<BoxError>) -> Self {
        Break::Fault(err.into())
    }
}

impl fmt::Debug for Break {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Break::Response(response) => f
                .debug_tuple("Response")
                .field(&response.status())
                .finish(),
            Break::Fault(err) => f.debug_tuple("Fault").field(err).finish(),
        }
    }
}

impl From<serde_json::Error> for Break {
    fn from(err: serde_json::Error) -> Self {
        Break::Fault(err.into())
    }
}
