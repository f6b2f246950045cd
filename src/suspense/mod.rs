//! Out-of-order deferred subtrees.
//!
//! # Data Flow
//! ```text
//! Component render (during composition):
//!     handle.defer(fallback, future)
//!     → key minted, computation spawned immediately
//!     → fallback emitted synchronously in render position
//!     → completion future registered in this response's pending set
//!
//! After the main body flushes (dispatcher):
//!     drain.next_resolved()  (whichever pending future finishes first)
//!     → wire.rs patch: <template> + swap marker
//!     → loop until the pending set is empty
//! ```
//!
//! # Design Decisions
//! - The pending set belongs to exactly one response lifecycle; it is
//!   created per dispatch and moved into the pump task, so concurrent
//!   requests can never collide on keys or leak entries
//! - Drain order is completion order: slow subtrees never block faster
//!   siblings
//! - A failed or panicked subtree resolves to an error-fallback patch;
//!   it cannot abort the drain loop

pub mod set;
pub mod wire;

pub use set::{SuspenseDrain, SuspenseHandle, SuspensePatch, SuspenseSet};
