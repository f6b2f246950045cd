//! The canonical lazy text value composed by fragments.
//!
//! # Responsibilities
//! - Wrap strings, futures, chunk streams, and child sequences into one type
//! - Flatten any nesting into a single-pass chunk stream
//! - Materialize to a whole string for non-streamed consumers
//!
//! # Design Decisions
//! - Chunks are `Bytes` so the dispatcher forwards them without copying
//! - A `Renderable` is consumed exactly once; both materializers take `self`
//! - Deferred variants suspend the consumer, never block a thread

use std::fmt;
use std::future::Future;

use bytes::Bytes;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use futures_util::{stream, FutureExt, Stream, StreamExt};
use thiserror::Error;

/// A single-pass stream of markup chunks.
pub type ChunkStream = BoxStream<'static, Result<Bytes, RenderError>>;

/// Error raised while producing markup chunks.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An underlying chunk source failed mid-stream.
    #[error("markup stream failed: {0}")]
    Stream(String),
    /// A deferred renderable failed before producing output.
    #[error("deferred markup failed: {0}")]
    Deferred(String),
    /// Materialized output was not valid UTF-8.
    #[error("markup is not valid UTF-8")]
    Encoding,
}

/// A value that can produce a possibly-unbounded sequence of markup text.
///
/// Components return these; the resolver nests them; the dispatcher pulls
/// the flattened chunk stream onto the wire. Produced by the templating
/// layer in a full application, but any string converts directly.
pub struct Renderable {
    inner: Inner,
}

enum Inner {
    Text(Bytes),
    Chunks(ChunkStream),
    Deferred(BoxFuture<'static, Result<Renderable, RenderError>>),
    Sequence(Vec<Renderable>),
}

impl Renderable {
    /// A renderable producing no output.
    pub fn empty() -> Self {
        Self {
            inner: Inner::Text(Bytes::new()),
        }
    }

    /// Wrap a ready piece of markup. The text is emitted verbatim.
    pub fn text(markup: impl Into<String>) -> Self {
        Self {
            inner: Inner::Text(Bytes::from(markup.into())),
        }
    }

    /// Wrap a stream of markup chunks.
    pub fn from_chunks<S>(chunks: S) -> Self
    where
        S: Stream<Item = Result<Bytes, RenderError>> + Send + 'static,
    {
        Self {
            inner: Inner::Chunks(chunks.boxed()),
        }
    }

    /// Wrap a future resolving to more markup. The future is polled only
    /// when the consumer reaches this position in the output.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<Renderable, RenderError>> + Send + 'static,
    {
        Self {
            inner: Inner::Deferred(future.boxed()),
        }
    }

    /// Concatenate children in order.
    pub fn sequence(children: Vec<Renderable>) -> Self {
        Self {
            inner: Inner::Sequence(children),
        }
    }

    /// Flatten into the canonical single-pass chunk stream.
    pub fn into_chunks(self) -> ChunkStream {
        match self.inner {
            Inner::Text(bytes) => {
                if bytes.is_empty() {
                    stream::empty().boxed()
                } else {
                    stream::once(async move { Ok(bytes) }).boxed()
                }
            }
            Inner::Chunks(chunks) => chunks,
            Inner::Deferred(future) => stream::once(future)
                .flat_map(|resolved| match resolved {
                    Ok(renderable) => renderable.into_chunks(),
                    Err(e) => stream::once(async move { Err(e) }).boxed(),
                })
                .boxed(),
            Inner::Sequence(children) => stream::iter(children)
                .flat_map(Renderable::into_chunks)
                .boxed(),
        }
    }

    /// Materialize the whole output as one string.
    pub async fn into_string(self) -> Result<String, RenderError> {
        let mut chunks = self.into_chunks();
        let mut buf = Vec::new();
        while let Some(chunk) = chunks.next().await {
            buf.extend_from_slice(&chunk?);
        }
        String::from_utf8(buf).map_err(|_| RenderError::Encoding)
    }
}

impl From<String> for Renderable {
    fn from(markup: String) -> Self {
        Renderable::text(markup)
    }
}

impl From<&'static str> for Renderable {
    fn from(markup: &'static str) -> Self {
        Self {
            inner: Inner::Text(Bytes::from_static(markup.as_bytes())),
        }
    }
}

impl fmt::Debug for Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Text(bytes) => f.debug_tuple("Text").field(&bytes.len()).finish(),
            Inner::Chunks(_) => f.write_str("Chunks(..)"),
            Inner::Deferred(_) => f.write_str("Deferred(..)"),
            Inner::Sequence(children) => {
                f.debug_tuple("Sequence").field(&children.len()).finish()
            }
        }
    }
}
