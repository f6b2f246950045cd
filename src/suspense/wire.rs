//! Suspense wire protocol.
//!
//! # Responsibilities
//! - Emit the inline runtime: a custom element that swaps a template's
//!   content into the fallback's place, then removes itself
//! - Render fallback wrappers and resolution patches with paired ids
//!
//! # Design Decisions
//! - Pure string assembly; ids are namespaced (`B:` fallback, `T:`
//!   template) so application markup cannot collide with them
//! - The runtime script is emitted once per response, before the first
//!   patch

use crate::render::Renderable;
use crate::suspense::set::SuspensePatch;

/// Custom element tag used by resolution patches.
pub const SWAP_ELEMENT: &str = "weft-swap";

/// Inline runtime defining the swap element. On attachment it moves the
/// sibling template's content over the fallback element, then removes
/// both itself and the template.
pub const INLINE_RUNTIME: &str = concat!(
    "<script>customElements.define(\"weft-swap\",class extends HTMLElement{",
    "connectedCallback(){",
    "const s=document.getElementById(this.getAttribute(\"from\")),",
    "t=document.getElementById(this.getAttribute(\"to\"));",
    "if(t&&s){t.replaceWith(s.content);}",
    "if(s){s.remove();}",
    "this.remove();",
    "}});</script>"
);

/// Markup substituted for a deferred subtree whose computation failed.
pub const ERROR_FALLBACK_MARKUP: &str = "<span hidden data-weft-error></span>";

pub fn fallback_id(key: &str) -> String {
    format!("B:{key}")
}

pub fn template_id(key: &str) -> String {
    format!("T:{key}")
}

/// Wrap a fallback so the resolution patch can address it by id.
pub fn wrap_fallback(key: &str, fallback: Renderable) -> Renderable {
    Renderable::sequence(vec![
        Renderable::text(format!("<div id=\"{}\">", fallback_id(key))),
        fallback,
        Renderable::text("</div>"),
    ])
}

/// One resolution patch: the resolved markup under a fresh template id,
/// followed by the swap marker pointing template → fallback.
pub fn render_patch(patch: &SuspensePatch) -> String {
    format!(
        "<template id=\"{tid}\">{markup}</template><{tag} to=\"{fid}\" from=\"{tid}\"></{tag}>",
        tid = template_id(&patch.key),
        fid = fallback_id(&patch.key),
        markup = patch.markup,
        tag = SWAP_ELEMENT,
    )
}
