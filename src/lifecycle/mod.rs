//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! ctrl-c or embedder trigger
//!     → shutdown.rs broadcast
//!     → server stops accepting, in-flight streams finish
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
