//! Loader execution and chain composition.
//!
//! # Responsibilities
//! - Run every loader in a chain concurrently, slots aligned to the chain
//! - Fold components innermost-first into one Renderable
//! - Merge response headers in chain order with append semantics
//!
//! # Design Decisions
//! - Loaders never see each other's results and may settle in any order;
//!   the result vector is positional, not completion-ordered
//! - The first `Break` cancels the loader join early and propagates
//! - A fragment without a component passes its children through unchanged

use axum::http::HeaderMap;
use futures_util::future::try_join_all;
use serde_json::Value;

use crate::fragment::{Fragment, FragmentChain, RequestContext, ViewContext};
use crate::render::Renderable;
use crate::resolve::outcome::Break;
use crate::suspense::SuspenseHandle;

/// Output of a full document resolution.
pub struct Resolved {
    pub body: Renderable,
    pub headers: HeaderMap,
}

/// Run every fragment's loader concurrently. The returned vector is
/// index-aligned with the chain; fragments without a loader hold `None`.
pub async fn run_loaders(
    chain: &FragmentChain,
    ctx: &RequestContext,
) -> Result<Vec<Option<Value>>, Break> {
    try_join_all(chain.fragments().iter().map(|fragment| {
        let loader = fragment.module().loader.clone();
        async move {
            match loader {
                Some(loader) => loader.load(ctx).await.map(Some),
                None => Ok(None),
            }
        }
    }))
    .await
}

/// Fold the chain right-to-left. The leaf renders first with no children;
/// each enclosing component wraps what is already built.
pub fn compose(
    chain: &FragmentChain,
    results: &[Option<Value>],
    view: &ViewContext<'_>,
) -> Renderable {
    let mut output = Renderable::empty();
    for (fragment, data) in chain.fragments().iter().zip(results).rev() {
        if let Some(component) = &fragment.module().component {
            output = component.render(view, data.as_ref(), output);
        }
    }
    output
}

/// Invoke each fragment's headers function in chain order, appending into
/// one collection. Later fragments add values; they never replace earlier
/// entries for the same name.
pub fn merge_headers(
    chain: &FragmentChain,
    results: &[Option<Value>],
    ctx: &RequestContext,
) -> HeaderMap {
    let mut merged = HeaderMap::new();
    for (fragment, data) in chain.fragments().iter().zip(results) {
        if let Some(headers) = &fragment.module().headers {
            for (name, value) in headers.headers(ctx, data.as_ref()) {
                merged.append(name, value);
            }
        }
    }
    merged
}

/// Full document resolution: loaders, composition, headers.
pub async fn resolve_document(
    chain: &FragmentChain,
    ctx: &RequestContext,
    suspense: &SuspenseHandle,
) -> Result<Resolved, Break> {
    let results = run_loaders(chain, ctx).await?;
    let view = ViewContext {
        request: ctx,
        suspense,
    };
    let body = compose(chain, &results, &view);
    let headers = merge_headers(chain, &results, ctx);
    Ok(Resolved { body, headers })
}

/// Data-only variant for non-document requests: just the leaf loader.
/// Returns `Ok(None)` when the leaf declares no loader.
pub async fn resolve_data(
    leaf: &Fragment,
    ctx: &RequestContext,
) -> Result<Option<Value>, Break> {
    match &leaf.module().loader {
        Some(loader) => loader.load(ctx).await.map(Some),
        None => Ok(None),
    }
}
