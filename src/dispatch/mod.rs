//! Response streaming.
//!
//! # Data Flow
//! ```text
//! Resolved { body, headers } + suspense drain
//!     → stream.rs (bounded chunk channel, preamble enqueued first)
//!     → Response returned immediately, headers finalized
//!     → detached pump task: body chunks → suspense patches → close
//! ```
//!
//! # Design Decisions
//! - The response is returned before the body finishes rendering; the
//!   pump runs as its own task
//! - A failed chunk aborts the stream so the client sees truncation, not
//!   a falsely complete document
//! - A failed send means the client disconnected: the pump stops and the
//!   suspense drain is dropped, aborting outstanding subtree tasks

pub mod stream;

pub use stream::{stream_document, DOCTYPE_PREAMBLE};
