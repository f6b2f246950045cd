//! The per-response pending set.
//!
//! # Responsibilities
//! - Mint a unique key per deferred subtree and start its computation
//!   immediately
//! - Hand out the wrapped fallback to render in place
//! - Race pending completions and yield patches first-completed-first
//!
//! # Design Decisions
//! - Declarations land in a plain mutex-guarded vector; only the drain
//!   side owns the `FuturesUnordered`, so no lock is held across an await
//! - Subtree computations run as spawned tasks; a panic or error becomes
//!   an error-fallback patch, never a drain abort
//! - Dropping the drain aborts outstanding subtree tasks: once the client
//!   is gone, no further suspense work runs for that response

use std::future::Future;
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::observability::metrics;
use crate::render::Renderable;
use crate::resolve::BoxError;
use crate::suspense::wire;

/// A resolved deferred subtree, ready to be patched into the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspensePatch {
    pub key: String,
    pub markup: String,
}

struct Shared {
    declared: Mutex<Vec<BoxFuture<'static, SuspensePatch>>>,
    aborts: Mutex<Vec<AbortHandle>>,
}

/// Pending-subtree registry for exactly one response.
pub struct SuspenseSet {
    shared: Arc<Shared>,
}

impl SuspenseSet {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                declared: Mutex::new(Vec::new()),
                aborts: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A cloneable handle components use to declare deferred subtrees.
    pub fn handle(&self) -> SuspenseHandle {
        SuspenseHandle {
            shared: self.shared.clone(),
        }
    }

    /// Convert into the drain side once composition is finished.
    pub fn into_drain(self) -> SuspenseDrain {
        SuspenseDrain {
            shared: self.shared,
            racing: FuturesUnordered::new(),
        }
    }
}

impl Default for SuspenseSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Declaration side of the pending set.
#[derive(Clone)]
pub struct SuspenseHandle {
    shared: Arc<Shared>,
}

impl SuspenseHandle {
    /// Declare a deferred subtree: the fallback renders now, `content`
    /// starts now, and the resolved markup is patched in later.
    ///
    /// Nested declarations are fine: a deferred computation may defer
    /// further subtrees through a clone of this handle.
    pub fn defer<F>(&self, fallback: Renderable, content: F) -> Renderable
    where
        F: Future<Output = Result<Renderable, BoxError>> + Send + 'static,
    {
        let key = Uuid::new_v4().simple().to_string();
        let task = tokio::spawn(content);
        self.shared
            .aborts
            .lock()
            .expect("suspense registry poisoned")
            .push(task.abort_handle());
        metrics::suspense_started();

        let completion_key = key.clone();
        let completion = async move {
            let markup = match task.await {
                Ok(Ok(renderable)) => match renderable.into_string().await {
                    Ok(markup) => markup,
                    Err(e) => {
                        tracing::warn!(error = %e, "deferred subtree failed to materialize");
                        wire::ERROR_FALLBACK_MARKUP.to_string()
                    }
                },
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "deferred subtree computation failed");
                    wire::ERROR_FALLBACK_MARKUP.to_string()
                }
                Err(join_error) => {
                    if !join_error.is_cancelled() {
                        tracing::warn!(error = %join_error, "deferred subtree task panicked");
                    }
                    wire::ERROR_FALLBACK_MARKUP.to_string()
                }
            };
            metrics::suspense_resolved();
            SuspensePatch {
                key: completion_key,
                markup,
            }
        }
        .boxed();

        self.shared
            .declared
            .lock()
            .expect("suspense registry poisoned")
            .push(completion);

        wire::wrap_fallback(&key, fallback)
    }
}

/// Drain side of the pending set, owned by the streaming pump.
pub struct SuspenseDrain {
    shared: Arc<Shared>,
    racing: FuturesUnordered<BoxFuture<'static, SuspensePatch>>,
}

impl SuspenseDrain {
    /// Wait for whichever pending subtree completes next. Returns `None`
    /// once the set is empty; declarations made while draining (nested
    /// defers) are picked up before emptiness is decided.
    pub async fn next_resolved(&mut self) -> Option<SuspensePatch> {
        loop {
            {
                let mut declared = self
                    .shared
                    .declared
                    .lock()
                    .expect("suspense registry poisoned");
                for completion in declared.drain(..) {
                    self.racing.push(completion);
                }
            }
            if self.racing.is_empty() {
                return None;
            }
            if let Some(patch) = self.racing.next().await {
                return Some(patch);
            }
        }
    }
}

impl Drop for SuspenseDrain {
    fn drop(&mut self) {
        let aborts = self
            .shared
            .aborts
            .lock()
            .expect("suspense registry poisoned");
        for handle in aborts.iter() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn defer_after(handle: &SuspenseHandle, label: &'static str, ms: u64) -> Renderable {
        handle.defer(Renderable::text(format!("waiting:{label}")), async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(Renderable::text(format!("<p>{label}</p>")))
        })
    }

    #[tokio::test]
    async fn patches_arrive_in_completion_order() {
        let set = SuspenseSet::new();
        let handle = set.handle();
        defer_after(&handle, "slow", 30);
        defer_after(&handle, "fast", 10);
        defer_after(&handle, "mid", 20);
        drop(handle);

        let mut drain = set.into_drain();
        let mut order = Vec::new();
        while let Some(patch) = drain.next_resolved().await {
            order.push(patch.markup);
        }
        assert_eq!(order, vec!["<p>fast</p>", "<p>mid</p>", "<p>slow</p>"]);
    }

    #[tokio::test]
    async fn fallback_is_wrapped_and_addressable() {
        let set = SuspenseSet::new();
        let handle = set.handle();
        let fallback = defer_after(&handle, "x", 1);
        let markup = fallback.into_string().await.unwrap();
        assert!(markup.starts_with("<div id=\"B:"));
        assert!(markup.contains("waiting:x"));
    }

    #[tokio::test]
    async fn failed_subtree_becomes_error_patch_without_blocking_siblings() {
        let set = SuspenseSet::new();
        let handle = set.handle();
        handle.defer(Renderable::text("f1"), async {
            Err::<Renderable, _>("db unavailable".into())
        });
        defer_after(&handle, "ok", 10);
        drop(handle);

        let mut drain = set.into_drain();
        let mut patches = Vec::new();
        while let Some(patch) = drain.next_resolved().await {
            patches.push(patch.markup);
        }
        assert_eq!(patches.len(), 2);
        assert!(patches.contains(&wire::ERROR_FALLBACK_MARKUP.to_string()));
        assert!(patches.contains(&"<p>ok</p>".to_string()));
    }

    #[tokio::test]
    async fn panicking_subtree_is_contained() {
        let set = SuspenseSet::new();
        let handle = set.handle();
        handle.defer(Renderable::text("f"), async {
            panic!("subtree blew up");
        });
        drop(handle);

        let mut drain = set.into_drain();
        let patch = drain.next_resolved().await.unwrap();
        assert_eq!(patch.markup, wire::ERROR_FALLBACK_MARKUP);
        assert!(drain.next_resolved().await.is_none());
    }

    #[tokio::test]
    async fn empty_set_drains_immediately() {
        let set = SuspenseSet::new();
        let mut drain = set.into_drain();
        assert!(drain.next_resolved().await.is_none());
    }

    #[tokio::test]
    async fn nested_declarations_are_drained() {
        let set = SuspenseSet::new();
        let handle = set.handle();
        let nested = handle.clone();
        handle.defer(Renderable::text("outer-fallback"), async move {
            // declare a child mid-flight; it must be drained too
            let _child_fallback = nested.defer(Renderable::text("inner-fallback"), async {
                Ok(Renderable::text("<p>inner</p>"))
            });
            Ok(Renderable::text("<p>outer</p>"))
        });
        drop(handle);

        let mut drain = set.into_drain();
        let mut patches = Vec::new();
        while let Some(patch) = drain.next_resolved().await {
            patches.push(patch.markup);
        }
        assert_eq!(patches.len(), 2);
        assert!(patches.contains(&"<p>outer</p>".to_string()));
        assert!(patches.contains(&"<p>inner</p>".to_string()));
    }
}
