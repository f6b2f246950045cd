//! Request dispatch.
//!
//! # Responsibilities
//! - Match the request path against the route table
//! - Pick the dispatch mode: streamed document, data response, or action
//! - Map resolution outcomes onto the response taxonomy
//!
//! # Design Decisions
//! - GET with a component streams HTML; GET with only a loader returns
//!   JSON; non-GET runs the leaf action alone
//! - A control-response from any loader or action is returned verbatim
//!   and never logged as an error
//! - Faults are logged with the request ID and collapse to an opaque 500

use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, Request, Response, StatusCode};
use bytes::Bytes;
use serde_json::Value;

use crate::dispatch::{stream_document, DOCTYPE_PREAMBLE};
use crate::fragment::{FragmentChain, RequestContext};
use crate::http::request::X_REQUEST_ID;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::resolve::{self, Break};
use crate::suspense::SuspenseSet;

/// Single entry point: every request the server accepts lands here.
pub async fn handle(State(state): State<AppState>, request: Request<Body>) -> Response<Body> {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Dispatching request"
    );

    let Some(matched) = state.table.match_path(&path) else {
        tracing::debug!(request_id = %request_id, path = %path, "No route matched");
        metrics::record_request(method.as_str(), 404, "none", start);
        return plain_response(StatusCode::NOT_FOUND, "not found", &request_id);
    };
    let route = matched.pattern.clone();

    let (parts, body) = request.into_parts();
    let body_bytes = if method == Method::GET {
        Bytes::new()
    } else {
        match to_bytes(body, state.config.limits.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(_) => {
                metrics::record_request(method.as_str(), 413, &route, start);
                return plain_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "payload too large",
                    &request_id,
                );
            }
        }
    };

    let ctx = RequestContext::new(parts, body_bytes, matched.params);
    let partial = ctx.is_fragment_request();
    let chain = if partial {
        matched.chain.without_document()
    } else {
        FragmentChain::clone(&matched.chain)
    };
    let leaf = chain.leaf().clone();

    let response = if method == Method::GET {
        if leaf.module().component.is_some() {
            render_document(&state, &chain, &ctx, partial).await
        } else if leaf.module().loader.is_some() {
            data_response(resolve::resolve_data(&leaf, &ctx).await, &request_id)
        } else {
            tracing::debug!(request_id = %request_id, leaf = leaf.id(), "Leaf has no GET handler");
            plain_response(StatusCode::NOT_FOUND, "not found", &request_id)
        }
    } else {
        match &leaf.module().action {
            Some(action) => data_response(action.run(&ctx).await.map(Some), &request_id),
            None => {
                tracing::debug!(request_id = %request_id, leaf = leaf.id(), "Leaf has no action");
                plain_response(StatusCode::NOT_FOUND, "not found", &request_id)
            }
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), &route, start);
    response
}

/// Resolve the chain and hand the composed document to the streaming
/// dispatcher. Fragment-only requests stream without the preamble.
async fn render_document(
    state: &AppState,
    chain: &FragmentChain,
    ctx: &RequestContext,
    partial: bool,
) -> Response<Body> {
    let suspense = SuspenseSet::new();
    let handle = suspense.handle();
    match resolve::resolve_document(chain, ctx, &handle).await {
        Ok(resolved) => {
            drop(handle);
            let preamble = if partial {
                None
            } else {
                Some(preamble_bytes(state))
            };
            let mut response = stream_document(
                resolved.body,
                suspense.into_drain(),
                resolved.headers,
                preamble,
                state.config.streaming.channel_capacity,
            );
            with_request_id(&mut response, ctx.request_id());
            response
        }
        Err(Break::Response(response)) => response,
        Err(Break::Fault(e)) => {
            tracing::error!(request_id = %ctx.request_id(), error = %e, "Resolution fault");
            opaque_error(ctx.request_id())
        }
    }
}

fn preamble_bytes(state: &AppState) -> Bytes {
    match &state.config.streaming.preamble {
        Some(preamble) => Bytes::from(preamble.clone()),
        None => Bytes::from_static(DOCTYPE_PREAMBLE.as_bytes()),
    }
}

/// Map a loader/action outcome to a JSON body, a verbatim
/// control-response, or an opaque 500.
fn data_response(result: Result<Option<Value>, Break>, request_id: &str) -> Response<Body> {
    match result {
        Ok(value) => match serde_json::to_vec(&value.unwrap_or(Value::Null)) {
            Ok(payload) => {
                let mut response = Response::new(Body::from(payload));
                response.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                with_request_id(&mut response, request_id);
                response
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Data encoding fault");
                opaque_error(request_id)
            }
        },
        Err(Break::Response(response)) => response,
        Err(Break::Fault(e)) => {
            tracing::error!(request_id = %request_id, error = %e, "Handler fault");
            opaque_error(request_id)
        }
    }
}

fn plain_response(status: StatusCode, body: &'static str, request_id: &str) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    with_request_id(&mut response, request_id);
    response
}

/// Generic 500 with no internal detail leaked.
fn opaque_error(request_id: &str) -> Response<Body> {
    plain_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal server error",
        request_id,
    )
}

fn with_request_id(response: &mut Response<Body>, request_id: &str) {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
}
