//! The byte-level response pump.
//!
//! # Responsibilities
//! - Open the one channel a response streams through
//! - Guarantee the preamble is the first bytes on the wire
//! - Forward body chunks, then suspense patches in completion order
//! - Close the channel exactly once, or abort it on failure
//!
//! # Design Decisions
//! - The preamble is enqueued before the pump task spawns, so it precedes
//!   fragment bytes no matter how slowly the body renders
//! - The suspense runtime script is emitted lazily, before the first
//!   patch; responses without deferred subtrees never carry it
//! - Channel capacity bounds how far rendering can run ahead of the
//!   client (backpressure)

use axum::body::Body;
use axum::http::header::{HeaderName, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Response};
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::render::{RenderError, Renderable};
use crate::suspense::{wire, SuspenseDrain};

/// Fixed document preamble, always the first bytes of a full document.
pub const DOCTYPE_PREAMBLE: &str = "<!doctype html>";

/// Build the streamed response for a composed document.
///
/// Headers are committed here and cannot change once the response is
/// returned; the body streams from a detached pump task. Fragment-only
/// responses pass `preamble: None` and begin at the layout's markup.
pub fn stream_document(
    body: Renderable,
    drain: SuspenseDrain,
    headers: HeaderMap,
    preamble: Option<Bytes>,
    channel_capacity: usize,
) -> Response<Body> {
    let (tx, rx) = mpsc::channel::<Result<Bytes, RenderError>>(channel_capacity.max(1));

    if let Some(preamble) = preamble {
        // fresh channel with capacity >= 1: the slot is free
        tx.try_send(Ok(preamble))
            .expect("preamble must be the first chunk enqueued");
    }

    tokio::spawn(pump(body, drain, tx));

    let mut response = Response::new(Body::from_stream(ReceiverStream::new(rx)));
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    append_all(response.headers_mut(), headers);
    response
}

/// Append every entry of `extra` onto `target`, preserving multi-values.
fn append_all(target: &mut HeaderMap, extra: HeaderMap) {
    let mut current: Option<HeaderName> = None;
    for (name, value) in extra {
        if let Some(name) = name {
            current = Some(name);
        }
        if let Some(name) = &current {
            target.append(name.clone(), value);
        }
    }
}

async fn pump(
    body: Renderable,
    mut drain: SuspenseDrain,
    tx: mpsc::Sender<Result<Bytes, RenderError>>,
) {
    let mut chunks = body.into_chunks();
    while let Some(chunk) = chunks.next().await {
        match chunk {
            Ok(bytes) => {
                if tx.send(Ok(bytes)).await.is_err() {
                    tracing::debug!("client disconnected mid-document; aborting render");
                    return;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "document stream failed; aborting response");
                let _ = tx.send(Err(e)).await;
                return;
            }
        }
    }

    // main body flushed; patch deferred subtrees as they complete
    let mut runtime_sent = false;
    while let Some(patch) = drain.next_resolved().await {
        if !runtime_sent {
            if tx
                .send(Ok(Bytes::from_static(wire::INLINE_RUNTIME.as_bytes())))
                .await
                .is_err()
            {
                return;
            }
            runtime_sent = true;
        }
        if tx
            .send(Ok(Bytes::from(wire::render_patch(&patch))))
            .await
            .is_err()
        {
            tracing::debug!("client disconnected during suspense drain");
            return;
        }
    }
    // tx drops here: the stream closes exactly once
}
