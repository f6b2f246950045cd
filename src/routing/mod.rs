//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → table.rs (ordered scan, first match wins)
//!     → pattern.rs (segment-by-segment match, capture params)
//!     → Return: RouteMatch { fragment chain, params } or no match
//!
//! Table Construction (at startup):
//!     (pattern template, fragment chain)[]
//!     → Parse templates into segment lists
//!     → Sort by specificity
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in the hot path (segment comparison only)
//! - Deterministic: same path always matches the same route
//! - First match wins, so specificity is decided once, at sort time

pub mod pattern;
pub mod table;

pub use pattern::{Params, PathPattern, PatternError, WILDCARD_PARAM};
pub use table::{Route, RouteMatch, RouteTable};
