//! Lazy markup production.
//!
//! # Data Flow
//! ```text
//! Component output (strings, futures, child subtrees)
//!     → renderable.rs (wrap into one canonical lazy value)
//!     → into_chunks() (single-pass chunk stream, pulled by the dispatcher)
//!     → or into_string() (whole-document materialization)
//! ```
//!
//! # Design Decisions
//! - One canonical type for everything a component can emit
//! - Pull-based: chunks are produced only as the consumer asks for them
//! - Single forward pass, not restartable
//! - Escaping is the templating layer's job; this module moves text verbatim

pub mod renderable;

pub use renderable::{ChunkStream, RenderError, Renderable};
