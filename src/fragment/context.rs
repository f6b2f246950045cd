//! Per-request context.
//!
//! # Responsibilities
//! - Carry the request method, URI, headers, body, and captured params
//! - Surface the request id minted by the middleware layer
//! - Detect the fragment-only signal header
//!
//! # Design Decisions
//! - Built once per request, read-only afterwards; every loader, action,
//!   and headers call borrows the same context
//! - The body is buffered before construction so actions see plain bytes

use axum::http::{request::Parts, HeaderMap, Method, Uri};
use bytes::Bytes;

use crate::http::request::X_REQUEST_ID;
use crate::routing::Params;

/// Marker header: when present, the document root fragment is dropped
/// from the chain so client-side code can swap a partial subtree.
pub const FRAGMENT_HEADER: &str = "x-weft-fragment";

/// Read-only view of one incoming request.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    params: Params,
    body: Bytes,
    request_id: String,
}

impl RequestContext {
    pub fn new(parts: Parts, body: Bytes, params: Params) -> Self {
        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            params,
            body,
            request_id,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A captured path parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Buffered request body. Empty for GET requests.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// True when the client asked for a partial render.
    pub fn is_fragment_request(&self) -> bool {
        self.headers.contains_key(FRAGMENT_HEADER)
    }
}
