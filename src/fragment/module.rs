//! Fragment capabilities and the fragment record.
//!
//! # Responsibilities
//! - Define the four optional capabilities a fragment may provide
//! - Hold a fragment's identity, module record, and param declarations
//!
//! # Design Decisions
//! - Capabilities are trait objects behind `Arc`, so fragments clone
//!   cheaply into every route chain that uses them
//! - Loaders and actions are async and fallible; components are pure
//!   functions from data to markup, deferring slow work through the
//!   suspense handle instead of blocking

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use serde_json::Value;

use crate::fragment::context::RequestContext;
use crate::render::Renderable;
use crate::resolve::Break;
use crate::suspense::SuspenseHandle;

/// GET-time data loader.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, ctx: &RequestContext) -> Result<Value, Break>;
}

/// Non-GET mutation handler. Only ever invoked on the leaf fragment.
#[async_trait]
pub trait Action: Send + Sync {
    async fn run(&self, ctx: &RequestContext) -> Result<Value, Break>;
}

/// Everything a component can see while rendering.
pub struct ViewContext<'a> {
    pub request: &'a RequestContext,
    pub suspense: &'a SuspenseHandle,
}

/// Markup renderer. Receives its own loader result and the already-built
/// inner subtree; returns the composed markup for this level.
pub trait Component: Send + Sync {
    fn render(&self, view: &ViewContext<'_>, data: Option<&Value>, children: Renderable)
        -> Renderable;
}

/// Response-header computer. Entries are appended, never replacing what
/// outer fragments already emitted.
pub trait Headers: Send + Sync {
    fn headers(&self, ctx: &RequestContext, data: Option<&Value>)
        -> Vec<(HeaderName, HeaderValue)>;
}

/// The fixed record of a fragment's optional capabilities.
#[derive(Clone, Default)]
pub struct FragmentModule {
    pub loader: Option<Arc<dyn Loader>>,
    pub action: Option<Arc<dyn Action>>,
    pub component: Option<Arc<dyn Component>>,
    pub headers: Option<Arc<dyn Headers>>,
}

impl FragmentModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn with_action(mut self, action: impl Action + 'static) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn with_component(mut self, component: impl Component + 'static) -> Self {
        self.component = Some(Arc::new(component));
        self
    }

    pub fn with_headers(mut self, headers: impl Headers + 'static) -> Self {
        self.headers = Some(Arc::new(headers));
        self
    }
}

/// A path parameter a fragment declares an interest in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub optional: bool,
}

impl ParamDecl {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
        }
    }
}

/// A reusable routing unit: id, module record, param declarations.
#[derive(Clone)]
pub struct Fragment {
    id: String,
    module: FragmentModule,
    params: Vec<ParamDecl>,
    document: bool,
}

impl Fragment {
    pub fn new(id: impl Into<String>, module: FragmentModule) -> Self {
        Self {
            id: id.into(),
            module,
            params: Vec::new(),
            document: false,
        }
    }

    /// The shared document root fragment every chain begins with.
    pub fn document(id: impl Into<String>, module: FragmentModule) -> Self {
        Self {
            document: true,
            ..Self::new(id, module)
        }
    }

    pub fn with_params(mut self, params: Vec<ParamDecl>) -> Self {
        self.params = params;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn module(&self) -> &FragmentModule {
        &self.module
    }

    pub fn params(&self) -> &[ParamDecl] {
        &self.params
    }

    pub fn is_document(&self) -> bool {
        self.document
    }
}

impl std::fmt::Debug for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragment")
            .field("id", &self.id)
            .field("document", &self.document)
            .field("loader", &self.module.loader.is_some())
            .field("action", &self.module.action.is_some())
            .field("component", &self.module.component.is_some())
            .field("headers", &self.module.headers.is_some())
            .finish()
    }
}
