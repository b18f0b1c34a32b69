//! Host seam between the page behaviours and a concrete DOM
//!
//! The behaviours never touch `web-sys` directly. They talk to three small
//! traits, bundled as [`Host`]:
//!
//! ```text
//!   PageEnhancer ──► Document  (query, mutate, listen)
//!                ──► Timers    (fire-and-forget timeouts)
//!                ──► Clipboard (async text write)
//!                        │
//!          ┌─────────────┴─────────────┐
//!       WebHost (wasm32)          MemoryHost
//!       web-sys bindings          arena DOM + manual clock
//! ```
//!
//! Everything runs on one thread; handlers are plain boxed closures and
//! nothing here is `Send`.

pub mod memory;
mod selector;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use memory::{MemoryHost, NodeId};
#[cfg(target_arch = "wasm32")]
pub use web::WebHost;

use crate::error::EnhancerError;

/// What a click handler wants done with the event's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickOutcome {
    #[default]
    Proceed,
    PreventDefault,
}

pub type ClickHandler = Box<dyn FnMut() -> ClickOutcome>;
/// Receives the input element's current value.
pub type InputHandler = Box<dyn FnMut(&str)>;
/// Receives each observed target as it enters the viewport.
pub type IntersectionHandler<N> = Box<dyn FnMut(&N)>;
pub type Task = Box<dyn FnOnce()>;
pub type ClipboardCallback = Box<dyn FnOnce(Result<(), EnhancerError>)>;

// =============================================================================
// DOCUMENT
// =============================================================================

/// The subset of the DOM the enhancer needs.
pub trait Document {
    /// Element handle. Cheap to clone; equality is identity.
    type Node: Clone + PartialEq + 'static;

    fn body(&self) -> Option<Self::Node>;
    fn head(&self) -> Option<Self::Node>;

    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>, EnhancerError>;
    /// Matches in document order.
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Node>, EnhancerError>;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    fn create_element(&self, tag: &str) -> Result<Self::Node, EnhancerError>;

    fn text_content(&self, node: &Self::Node) -> String;
    /// Replaces all children with a single text run. Never parsed as markup.
    fn set_text_content(&self, node: &Self::Node, text: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str)
        -> Result<(), EnhancerError>;
    fn add_class(&self, node: &Self::Node, class: &str) -> Result<(), EnhancerError>;
    fn set_style(&self, node: &Self::Node, property: &str, value: &str)
        -> Result<(), EnhancerError>;
    fn set_disabled(&self, node: &Self::Node, disabled: bool) -> Result<(), EnhancerError>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), EnhancerError>;
    /// Inserts `child` before the current first child of `parent`.
    fn prepend_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), EnhancerError>;
    fn remove(&self, node: &Self::Node);
    /// True while the node is attached to the document tree.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Smooth scroll, target aligned to the start edge.
    fn scroll_into_view(&self, node: &Self::Node);

    fn on_click(&self, node: &Self::Node, handler: ClickHandler) -> Result<(), EnhancerError>;
    fn on_input(&self, node: &Self::Node, handler: InputHandler) -> Result<(), EnhancerError>;
    /// Calls `handler` every time one of `targets` intersects the viewport.
    fn observe_intersections(
        &self,
        targets: &[Self::Node],
        handler: IntersectionHandler<Self::Node>,
    ) -> Result<(), EnhancerError>;
}

// =============================================================================
// TIMERS / CLIPBOARD
// =============================================================================

pub trait Timers {
    /// Runs `task` once after `delay_ms`. There is no cancellation.
    fn set_timeout(&self, delay_ms: u32, task: Task) -> Result<(), EnhancerError>;
}

pub trait Clipboard {
    /// Starts an asynchronous text write; `done` fires with the outcome.
    fn write_text(&self, text: &str, done: ClipboardCallback);
}

/// Everything the enhancer needs from its environment.
pub trait Host: Document + Timers + Clipboard + 'static {}

impl<T: Document + Timers + Clipboard + 'static> Host for T {}
