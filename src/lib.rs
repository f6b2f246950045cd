//! Streaming request router for nested route fragments.
//!
//! # Architecture Overview
//!
//! ```text
//!     Incoming request
//!         │
//!         ▼
//!     ┌──────────┐   chain + params   ┌───────────┐
//!     │ routing  │──────────────────▶│  resolve   │  loaders run
//!     │  table   │                    │ (compose)  │  concurrently
//!     └──────────┘                    └─────┬──────┘
//!                                           │ Renderable
//!              ┌──────────┐                 ▼
//!              │ suspense │◀──defer──┌────────────┐
//!              │   set    │          │  dispatch  │──▶ preamble,
//!              └────┬─────┘          │   (pump)   │    body chunks,
//!                   │ patches        └────────────┘    patches, close
//!                   └────────────────────▲
//!
//!     Cross-cutting: config · observability · lifecycle · http glue
//! ```
//!
//! A route table maps request paths to chains of fragments (document
//! root → layouts → leaf). Each fragment may load data, render markup,
//! answer non-GET actions, and contribute response headers. Matched
//! chains resolve concurrently, compose innermost-first, and stream as
//! one HTML response; slow subtrees render a fallback immediately and
//! patch themselves in later, out of order.

// Core engine
pub mod dispatch;
pub mod fragment;
pub mod render;
pub mod resolve;
pub mod routing;
pub mod suspense;

// Server surface
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use fragment::{Fragment, FragmentChain, FragmentModule, RequestContext};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use render::Renderable;
pub use resolve::Break;
pub use routing::{PathPattern, Route, RouteTable};
pub use suspense::{SuspenseHandle, SuspenseSet};
