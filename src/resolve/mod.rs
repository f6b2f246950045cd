//! Fragment chain resolution.
//!
//! # Data Flow
//! ```text
//! Matched chain + request context
//!     → resolver.rs run_loaders (all loaders concurrently, aligned slots)
//!     → resolver.rs compose (fold components innermost → outermost)
//!     → resolver.rs merge_headers (append in chain order)
//!     → Resolved { body: Renderable, headers }
//!
//! Short circuits:
//!     loader raises Break::Response → returned verbatim, nothing renders
//!     loader raises Break::Fault    → whole resolution aborts, opaque 500
//! ```
//!
//! # Design Decisions
//! - Control flow is data: loaders return `Result<_, Break>` and callers
//!   match on it; nothing is thrown and caught ad hoc
//! - One failing loader aborts the whole chain; a document cannot render
//!   coherently around a missing upstream dependency

pub mod outcome;
pub mod resolver;

pub use outcome::{BoxError, Break};
pub use resolver::{compose, merge_headers, resolve_data, resolve_document, run_loaders, Resolved};
