//! Fragment chains.
//!
//! # Responsibilities
//! - Hold the outermost-to-innermost fragment sequence for one route
//! - Enforce chain invariants at construction
//! - Produce the document-less variant used by fragment-only requests
//!
//! # Design Decisions
//! - Built once per route at table construction, immutable after
//! - Param declarations from inner fragments propagate outward as
//!   optional, so a layout may reference a param only a descendant binds;
//!   two explicit declarations of one name must agree on optionality

use std::sync::Arc;

use thiserror::Error;

use crate::fragment::module::{Fragment, ParamDecl};

/// Error raised while assembling a chain.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("fragment chain is empty")]
    Empty,
    #[error("chain must begin with the document root fragment, got `{0}`")]
    MissingDocument(String),
    #[error("only the first fragment may be the document root, `{0}` is not first")]
    InteriorDocument(String),
    #[error(
        "parameter `{name}` declared with conflicting optionality by `{first}` and `{second}`"
    )]
    ParamConflict {
        name: String,
        first: String,
        second: String,
    },
}

/// Ordered fragment sequence for one route: document root first, one leaf
/// last. Fragments are shared across chains.
#[derive(Debug, Clone)]
pub struct FragmentChain {
    fragments: Vec<Arc<Fragment>>,
    params: Vec<ParamDecl>,
}

impl FragmentChain {
    pub fn new(fragments: Vec<Arc<Fragment>>) -> Result<Self, ChainError> {
        let first = fragments.first().ok_or(ChainError::Empty)?;
        if !first.is_document() {
            return Err(ChainError::MissingDocument(first.id().to_string()));
        }
        if let Some(interior) = fragments[1..].iter().find(|f| f.is_document()) {
            return Err(ChainError::InteriorDocument(interior.id().to_string()));
        }

        // Merge declarations innermost-first: the innermost explicit
        // declaration fixes optionality; an enclosing fragment re-declaring
        // the same name must agree.
        let mut params: Vec<(ParamDecl, String)> = Vec::new();
        for fragment in fragments.iter().rev() {
            for decl in fragment.params() {
                match params.iter().find(|(existing, _)| existing.name == decl.name) {
                    Some((existing, owner)) if existing.optional != decl.optional => {
                        return Err(ChainError::ParamConflict {
                            name: decl.name.clone(),
                            first: owner.clone(),
                            second: fragment.id().to_string(),
                        });
                    }
                    Some(_) => {}
                    None => params.push((decl.clone(), fragment.id().to_string())),
                }
            }
        }

        Ok(Self {
            fragments,
            params: params.into_iter().map(|(decl, _)| decl).collect(),
        })
    }

    pub fn fragments(&self) -> &[Arc<Fragment>] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The innermost fragment.
    pub fn leaf(&self) -> &Arc<Fragment> {
        self.fragments.last().expect("chain is never empty")
    }

    /// Merged param declarations for the whole chain. Declarations from
    /// inner fragments appear to enclosing fragments as optional.
    pub fn declared_params(&self) -> &[ParamDecl] {
        &self.params
    }

    /// The chain without its document root, for fragment-only requests.
    /// A chain that is only the document keeps it; there is nothing else
    /// to render.
    pub fn without_document(&self) -> FragmentChain {
        if self.fragments.len() > 1 && self.fragments[0].is_document() {
            FragmentChain {
                fragments: self.fragments[1..].to_vec(),
                params: self.params.clone(),
            }
        } else {
            self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::module::FragmentModule;

    fn doc() -> Arc<Fragment> {
        Arc::new(Fragment::document("root", FragmentModule::default()))
    }

    fn plain(id: &str) -> Arc<Fragment> {
        Arc::new(Fragment::new(id, FragmentModule::default()))
    }

    #[test]
    fn chain_must_start_with_document() {
        let err = FragmentChain::new(vec![plain("leaf")]).unwrap_err();
        assert!(matches!(err, ChainError::MissingDocument(_)));
        assert!(FragmentChain::new(vec![doc(), plain("leaf")]).is_ok());
    }

    #[test]
    fn empty_chain_rejected() {
        assert!(matches!(
            FragmentChain::new(Vec::new()),
            Err(ChainError::Empty)
        ));
    }

    #[test]
    fn conflicting_param_optionality_rejected() {
        let layout = Arc::new(
            Fragment::new("layout", FragmentModule::default())
                .with_params(vec![ParamDecl::optional("id")]),
        );
        let leaf = Arc::new(
            Fragment::new("leaf", FragmentModule::default())
                .with_params(vec![ParamDecl::required("id")]),
        );
        let err = FragmentChain::new(vec![doc(), layout, leaf]).unwrap_err();
        assert!(matches!(err, ChainError::ParamConflict { .. }));
    }

    #[test]
    fn agreeing_declarations_merge() {
        let layout = Arc::new(
            Fragment::new("layout", FragmentModule::default())
                .with_params(vec![ParamDecl::required("id")]),
        );
        let leaf = Arc::new(
            Fragment::new("leaf", FragmentModule::default())
                .with_params(vec![ParamDecl::required("id")]),
        );
        let chain = FragmentChain::new(vec![doc(), layout, leaf]).unwrap();
        assert_eq!(chain.declared_params().len(), 1);
    }

    #[test]
    fn without_document_drops_only_the_root() {
        let chain = FragmentChain::new(vec![doc(), plain("layout"), plain("leaf")]).unwrap();
        let partial = chain.without_document();
        assert_eq!(partial.len(), 2);
        assert_eq!(partial.fragments()[0].id(), "layout");

        let doc_only = FragmentChain::new(vec![doc()]).unwrap();
        assert_eq!(doc_only.without_document().len(), 1);
    }
}
