//! Fragment model.
//!
//! # Data Flow
//! ```text
//! Route table construction (at startup):
//!     shared Arc<Fragment>s (document, layouts, leaves)
//!     → chain.rs (validate: root first, param declarations consistent)
//!     → Freeze as immutable FragmentChain per route
//!
//! Per request:
//!     matched chain + captured params
//!     → context.rs (read-only RequestContext)
//!     → resolver invokes each fragment's optional capabilities
//! ```
//!
//! # Design Decisions
//! - A fragment's shape is a fixed record of four optional capabilities
//!   (loader, action, component, headers), never discovered at call time
//! - Fragments are shared and read-only; one layout serves many routes
//! - The request context is built once and borrowed everywhere

pub mod chain;
pub mod context;
pub mod module;

pub use chain::{ChainError, FragmentChain};
pub use context::{RequestContext, FRAGMENT_HEADER};
pub use module::{
    Action, Component, Fragment, FragmentModule, Headers, Loader, ParamDecl, ViewContext,
};
