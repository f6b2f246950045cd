//! Route table lookup.
//!
//! # Responsibilities
//! - Store compiled (pattern, fragment chain) pairs
//! - Look up the matching route for a request path
//! - Return the matched chain and captured params, or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Strictly first match wins; no best-match search at lookup time
//! - Specificity is enforced once, by sorting at construction:
//!   more segments first, then literal over param over wildcard per
//!   position, then fewer optional segments
//! - Ties keep insertion order (stable sort), so a pre-sorted generated
//!   table passes through unchanged

use std::cmp::Ordering;
use std::sync::Arc;

use crate::fragment::FragmentChain;
use crate::routing::pattern::{Params, PathPattern, Segment};

/// One routable entry: a path template bound to a fragment chain.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: PathPattern,
    pub chain: Arc<FragmentChain>,
}

impl Route {
    pub fn new(pattern: PathPattern, chain: Arc<FragmentChain>) -> Self {
        Self { pattern, chain }
    }
}

/// A successful lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched chain, outermost fragment first.
    pub chain: Arc<FragmentChain>,
    /// Parameters captured from the path.
    pub params: Params,
    /// The matched template text, for logging and metrics labels.
    pub pattern: String,
}

/// Ordered, immutable route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table, ordering routes by specificity. Relative order of
    /// equally specific routes is preserved.
    pub fn new(mut routes: Vec<Route>) -> Self {
        routes.sort_by(|a, b| cmp_specificity(&a.pattern, &b.pattern));
        Self { routes }
    }

    /// Find the first route whose pattern matches `path`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        self.routes.iter().find_map(|route| {
            route.pattern.match_path(path).map(|params| RouteMatch {
                chain: route.chain.clone(),
                params,
                pattern: route.pattern.as_str().to_string(),
            })
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Matched templates in table order, for startup logging.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern.as_str())
    }
}

fn segment_rank(segment: &Segment) -> u8 {
    match segment {
        Segment::Literal { .. } => 0,
        Segment::Param { .. } => 1,
        Segment::Wildcard => 2,
    }
}

/// More segments first; then literal < param < wildcard position by
/// position; then fewer optional segments.
fn cmp_specificity(a: &PathPattern, b: &PathPattern) -> Ordering {
    b.segments()
        .len()
        .cmp(&a.segments().len())
        .then_with(|| {
            for (sa, sb) in a.segments().iter().zip(b.segments()) {
                match segment_rank(sa).cmp(&segment_rank(sb)) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            Ordering::Equal
        })
        .then_with(|| a.optional_count().cmp(&b.optional_count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{Fragment, FragmentChain, FragmentModule};

    fn chain(leaf_id: &str) -> Arc<FragmentChain> {
        let doc = Arc::new(Fragment::document("root", FragmentModule::default()));
        let leaf = Arc::new(Fragment::new(leaf_id, FragmentModule::default()));
        Arc::new(FragmentChain::new(vec![doc, leaf]).unwrap())
    }

    fn route(template: &str, leaf_id: &str) -> Route {
        Route::new(PathPattern::parse(template).unwrap(), chain(leaf_id))
    }

    fn matched_leaf(table: &RouteTable, path: &str) -> String {
        table
            .match_path(path)
            .expect("expected a match")
            .chain
            .leaf()
            .id()
            .to_string()
    }

    #[test]
    fn first_match_wins_in_table_order() {
        // both patterns match /users/new; the more specific literal route
        // must be sorted ahead of the param route and selected
        let table = RouteTable::new(vec![
            route("/users/:id", "user-detail"),
            route("/users/new", "user-new"),
        ]);
        assert_eq!(matched_leaf(&table, "/users/new"), "user-new");
        assert_eq!(matched_leaf(&table, "/users/42"), "user-detail");
    }

    #[test]
    fn longer_routes_sort_first() {
        let table = RouteTable::new(vec![
            route("/a", "short"),
            route("/a/b/c", "long"),
        ]);
        let patterns: Vec<_> = table.patterns().collect();
        assert_eq!(patterns, vec!["/a/b/c", "/a"]);
    }

    #[test]
    fn catch_all_loses_to_param_and_literal() {
        let table = RouteTable::new(vec![
            route("/docs/*", "splat"),
            route("/docs/:page", "page"),
        ]);
        assert_eq!(matched_leaf(&table, "/docs/intro"), "page");
        assert_eq!(matched_leaf(&table, "/docs/a/b"), "splat");
    }

    #[test]
    fn optional_segment_tiebreak() {
        // equal length, same ranks: the fully required pattern sorts first
        let table = RouteTable::new(vec![
            route("/docs/:lang?", "optional"),
            route("/docs/:lang", "required"),
        ]);
        let patterns: Vec<_> = table.patterns().collect();
        assert_eq!(patterns, vec!["/docs/:lang", "/docs/:lang?"]);
    }

    #[test]
    fn no_match_is_explicit() {
        let table = RouteTable::new(vec![route("/users/:id", "user")]);
        assert!(table.match_path("/orders/7").is_none());
    }
}
