//! In-memory host: arena DOM, manual clock, recording clipboard
//!
//! Behaves like a browsing context that never paints. Timers only fire when
//! [`MemoryHost::advance`] moves the clock, and clipboard writes complete on
//! the next advance (including `advance(0)`), mirroring the promise
//! resolution of the real clipboard API.
//!
//! Input is simulated with [`MemoryHost::click`], [`MemoryHost::type_text`]
//! and [`MemoryHost::bring_into_view`]. Events do not bubble.

use super::selector::{ElementTree, SelectorList};
use super::{
    ClickHandler, ClickOutcome, Clipboard, ClipboardCallback, Document, InputHandler,
    IntersectionHandler, Task, Timers,
};
use crate::error::EnhancerError;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Handle to a node in a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    /// Leading text run; children follow it
    text: String,
    value: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

struct Arena {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Arena {
    fn new() -> Self {
        let mut arena = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let root = arena.alloc("html");
        let head = arena.alloc("head");
        let body = arena.alloc("body");
        arena.attach(root, head, false);
        arena.attach(root, body, false);
        arena
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        });
        id
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut cursor = Some(of);
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.node(id).parent;
        }
        false
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, first: bool) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        let children = &mut self.node_mut(parent).children;
        if first {
            children.insert(0, child);
        } else {
            children.push(child);
        }
    }

    fn is_connected(&self, id: NodeId) -> bool {
        self.is_ancestor(self.root, id)
    }

    /// Connected nodes in document order.
    fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    fn text_content(&self, id: NodeId) -> String {
        let node = self.node(id);
        let mut out = node.text.clone();
        for child in &node.children {
            out.push_str(&self.text_content(*child));
        }
        out
    }

    fn child_by_tag(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|c| self.node(*c).tag == tag)
    }
}

impl ElementTree for Arena {
    type Id = NodeId;

    fn tag(&self, id: NodeId) -> &str {
        &self.node(id).tag
    }

    fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attrs.get(name).map(String::as_str)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }
}

struct PendingTask {
    due: u64,
    seq: u64,
    task: Task,
}

pub struct MemoryHost {
    arena: RefCell<Arena>,
    click_handlers: RefCell<Vec<(NodeId, Rc<RefCell<ClickHandler>>)>>,
    input_handlers: RefCell<Vec<(NodeId, Rc<RefCell<InputHandler>>)>>,
    observers: RefCell<Vec<(Vec<NodeId>, Rc<RefCell<IntersectionHandler<NodeId>>>)>>,
    now_ms: Cell<u64>,
    next_seq: Cell<u64>,
    pending: RefCell<Vec<PendingTask>>,
    clipboard: RefCell<Option<String>>,
    clipboard_failure: RefCell<Option<EnhancerError>>,
    scrolled: RefCell<Vec<NodeId>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// An empty document: `<html><head></head><body></body></html>`.
    pub fn new() -> Self {
        Self {
            arena: RefCell::new(Arena::new()),
            click_handlers: RefCell::new(Vec::new()),
            input_handlers: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            now_ms: Cell::new(0),
            next_seq: Cell::new(0),
            pending: RefCell::new(Vec::new()),
            clipboard: RefCell::new(None),
            clipboard_failure: RefCell::new(None),
            scrolled: RefCell::new(Vec::new()),
        }
    }

    // =========================================================================
    // PAGE BUILDING
    // =========================================================================

    /// Creates `<tag>text</tag>` as the last child of `parent`.
    pub fn append_element(&self, parent: NodeId, tag: &str, text: &str) -> NodeId {
        let mut arena = self.arena.borrow_mut();
        let id = arena.alloc(tag);
        arena.node_mut(id).text = text.to_string();
        arena.attach(parent, id, false);
        id
    }

    /// Like [`append_element`](Self::append_element) with attributes.
    pub fn append_element_with(
        &self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> NodeId {
        let id = self.append_element(parent, tag, text);
        let mut arena = self.arena.borrow_mut();
        for (name, value) in attrs {
            arena
                .node_mut(id)
                .attrs
                .insert(name.to_string(), value.to_string());
        }
        id
    }

    // =========================================================================
    // SIMULATED INPUT
    // =========================================================================

    /// Dispatches a click. Disabled elements receive no click, as in a browser.
    pub fn click(&self, node: NodeId) -> ClickOutcome {
        if self.is_disabled(node) {
            return ClickOutcome::Proceed;
        }
        let handlers: Vec<_> = self
            .click_handlers
            .borrow()
            .iter()
            .filter(|(target, _)| *target == node)
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        let mut outcome = ClickOutcome::Proceed;
        for handler in handlers {
            if (handler.borrow_mut().as_mut())() == ClickOutcome::PreventDefault {
                outcome = ClickOutcome::PreventDefault;
            }
        }
        outcome
    }

    /// Replaces an input's value and fires its `input` listeners.
    pub fn type_text(&self, node: NodeId, value: &str) {
        self.arena.borrow_mut().node_mut(node).value = value.to_string();
        let handlers: Vec<_> = self
            .input_handlers
            .borrow()
            .iter()
            .filter(|(target, _)| *target == node)
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            (handler.borrow_mut().as_mut())(value);
        }
    }

    /// Reports `node` as intersecting the viewport to every observer watching it.
    pub fn bring_into_view(&self, node: NodeId) {
        let observers: Vec<_> = self
            .observers
            .borrow()
            .iter()
            .filter(|(targets, _)| targets.contains(&node))
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in observers {
            (handler.borrow_mut().as_mut())(&node);
        }
    }

    /// Moves the clock forward, running every task that falls due in order.
    pub fn advance(&self, ms: u64) {
        let target = self.now_ms.get() + ms;
        loop {
            let next = {
                let mut pending = self.pending.borrow_mut();
                let due = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(idx, _)| idx);
                due.map(|idx| pending.remove(idx))
            };
            match next {
                Some(task) => {
                    self.now_ms.set(task.due);
                    (task.task)();
                }
                None => break,
            }
        }
        self.now_ms.set(target);
    }

    /// Makes every later clipboard write fail with `error`.
    pub fn fail_clipboard_with(&self, error: EnhancerError) {
        *self.clipboard_failure.borrow_mut() = Some(error);
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn clipboard_text(&self) -> Option<String> {
        self.clipboard.borrow().clone()
    }

    /// Targets passed to `scroll_into_view`, oldest first.
    pub fn scrolled_into_view(&self) -> Vec<NodeId> {
        self.scrolled.borrow().clone()
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.arena.borrow().node(node).tag.clone()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.arena.borrow().node(node).children.clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.arena.borrow().node(node).styles.get(property).cloned()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.arena
            .borrow()
            .attr(node, "class")
            .is_some_and(|c| c.split_whitespace().any(|have| have == class))
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.arena.borrow().node(node).attrs.contains_key("disabled")
    }

    pub fn value(&self, node: NodeId) -> String {
        self.arena.borrow().node(node).value.clone()
    }

    fn schedule(&self, delay_ms: u32, task: Task) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.pending.borrow_mut().push(PendingTask {
            due: self.now_ms.get() + u64::from(delay_ms),
            seq,
            task,
        });
    }
}

fn parse_css_text(css: &str) -> BTreeMap<String, String> {
    css.split(';')
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let property = property.trim();
            let value = value.trim();
            (!property.is_empty()).then(|| (property.to_string(), value.to_string()))
        })
        .collect()
}

fn serialize_css(styles: &BTreeMap<String, String>) -> String {
    styles
        .iter()
        .map(|(property, value)| format!("{}: {};", property, value))
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// HOST TRAITS
// =============================================================================

impl Document for MemoryHost {
    type Node = NodeId;

    fn body(&self) -> Option<NodeId> {
        let arena = self.arena.borrow();
        arena.child_by_tag(arena.root, "body")
    }

    fn head(&self) -> Option<NodeId> {
        let arena = self.arena.borrow();
        arena.child_by_tag(arena.root, "head")
    }

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, EnhancerError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, EnhancerError> {
        let selector = SelectorList::parse(selector)?;
        let arena = self.arena.borrow();
        Ok(arena
            .preorder()
            .into_iter()
            .filter(|id| selector.matches(&*arena, *id))
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let arena = self.arena.borrow();
        arena
            .preorder()
            .into_iter()
            .find(|node| arena.attr(*node, "id") == Some(id))
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, EnhancerError> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(EnhancerError::Js(format!("invalid tag name '{}'", tag)));
        }
        Ok(self.arena.borrow_mut().alloc(tag))
    }

    fn text_content(&self, node: &NodeId) -> String {
        self.arena.borrow().text_content(*node)
    }

    fn set_text_content(&self, node: &NodeId, text: &str) {
        let mut arena = self.arena.borrow_mut();
        let children = std::mem::take(&mut arena.node_mut(*node).children);
        for child in children {
            arena.node_mut(child).parent = None;
        }
        arena.node_mut(*node).text = text.to_string();
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let arena = self.arena.borrow();
        let data = arena.node(*node);
        if name == "style" {
            return (!data.styles.is_empty()).then(|| serialize_css(&data.styles));
        }
        data.attrs.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), EnhancerError> {
        let mut arena = self.arena.borrow_mut();
        let data = arena.node_mut(*node);
        if name == "style" {
            data.styles = parse_css_text(value);
        } else {
            data.attrs.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    fn add_class(&self, node: &NodeId, class: &str) -> Result<(), EnhancerError> {
        if self.has_class(*node, class) {
            return Ok(());
        }
        let mut arena = self.arena.borrow_mut();
        let attrs = &mut arena.node_mut(*node).attrs;
        let updated = match attrs.get("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        attrs.insert("class".to_string(), updated);
        Ok(())
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<(), EnhancerError> {
        self.arena
            .borrow_mut()
            .node_mut(*node)
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) -> Result<(), EnhancerError> {
        let mut arena = self.arena.borrow_mut();
        let attrs = &mut arena.node_mut(*node).attrs;
        if disabled {
            attrs.insert("disabled".to_string(), String::new());
        } else {
            attrs.remove("disabled");
        }
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), EnhancerError> {
        let mut arena = self.arena.borrow_mut();
        if arena.is_ancestor(*child, *parent) {
            return Err(EnhancerError::Js("HierarchyRequestError".to_string()));
        }
        arena.attach(*parent, *child, false);
        Ok(())
    }

    fn prepend_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), EnhancerError> {
        let mut arena = self.arena.borrow_mut();
        if arena.is_ancestor(*child, *parent) {
            return Err(EnhancerError::Js("HierarchyRequestError".to_string()));
        }
        arena.attach(*parent, *child, true);
        Ok(())
    }

    fn remove(&self, node: &NodeId) {
        self.arena.borrow_mut().detach(*node);
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.arena.borrow().is_connected(*node)
    }

    fn scroll_into_view(&self, node: &NodeId) {
        self.scrolled.borrow_mut().push(*node);
    }

    fn on_click(&self, node: &NodeId, handler: ClickHandler) -> Result<(), EnhancerError> {
        self.click_handlers
            .borrow_mut()
            .push((*node, Rc::new(RefCell::new(handler))));
        Ok(())
    }

    fn on_input(&self, node: &NodeId, handler: InputHandler) -> Result<(), EnhancerError> {
        self.input_handlers
            .borrow_mut()
            .push((*node, Rc::new(RefCell::new(handler))));
        Ok(())
    }

    fn observe_intersections(
        &self,
        targets: &[NodeId],
        handler: IntersectionHandler<NodeId>,
    ) -> Result<(), EnhancerError> {
        self.observers
            .borrow_mut()
            .push((targets.to_vec(), Rc::new(RefCell::new(handler))));
        Ok(())
    }
}

impl Timers for MemoryHost {
    fn set_timeout(&self, delay_ms: u32, task: Task) -> Result<(), EnhancerError> {
        self.schedule(delay_ms, task);
        Ok(())
    }
}

impl Clipboard for MemoryHost {
    fn write_text(&self, text: &str, done: ClipboardCallback) {
        let outcome = match self.clipboard_failure.borrow().clone() {
            Some(err) => Err(err),
            None => {
                *self.clipboard.borrow_mut() = Some(text.to_string());
                Ok(())
            }
        };
        self.schedule(0, Box::new(move || done(outcome)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_concatenates_descendants() {
        let host = MemoryHost::new();
        let body = host.body().unwrap();
        let p = host.append_element(body, "p", "Hello ");
        host.append_element(p, "strong", "world");
        assert_eq!(host.text_content(&p), "Hello world");

        host.set_text_content(&p, "Bye");
        assert_eq!(host.text_content(&p), "Bye");
        assert!(host.children(p).is_empty());
    }

    #[test]
    fn test_query_in_document_order_skips_detached() {
        let host = MemoryHost::new();
        let body = host.body().unwrap();
        let a = host.append_element(body, "p", "a");
        let section = host.append_element(body, "section", "");
        let b = host.append_element(section, "p", "b");
        let detached = host.create_element("p").unwrap();

        assert_eq!(host.query_selector_all("p").unwrap(), vec![a, b]);
        assert!(!host.is_connected(&detached));

        host.remove(&section);
        assert_eq!(host.query_selector_all("p").unwrap(), vec![a]);
        assert!(!host.is_connected(&b));
    }

    #[test]
    fn test_prepend_and_cycle_rejection() {
        let host = MemoryHost::new();
        let body = host.body().unwrap();
        let first = host.append_element(body, "div", "");
        let new = host.create_element("input").unwrap();
        host.prepend_child(&body, &new).unwrap();
        assert_eq!(host.children(body), vec![new, first]);

        assert!(host.append_child(&first, &body).is_err());
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let host = Rc::new(MemoryHost::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, label) in [(300, "late"), (100, "early"), (100, "early-2")] {
            let log = Rc::clone(&log);
            host.set_timeout(delay, Box::new(move || log.borrow_mut().push(label)))
                .unwrap();
        }

        host.advance(99);
        assert!(log.borrow().is_empty());
        host.advance(1);
        assert_eq!(*log.borrow(), vec!["early", "early-2"]);
        host.advance(1000);
        assert_eq!(*log.borrow(), vec!["early", "early-2", "late"]);
        assert_eq!(host.now_ms(), 1100);
    }

    #[test]
    fn test_style_attribute_round_trip() {
        let host = MemoryHost::new();
        let div = host.create_element("div").unwrap();
        host.set_attribute(&div, "style", "position: absolute; top: 5px;")
            .unwrap();
        assert_eq!(host.style(div, "top").as_deref(), Some("5px"));
        host.set_style(&div, "display", "none").unwrap();
        assert_eq!(
            host.attribute(&div, "style").as_deref(),
            Some("display: none; position: absolute; top: 5px;")
        );
    }

    #[test]
    fn test_disabled_element_ignores_clicks() {
        let host = MemoryHost::new();
        let body = host.body().unwrap();
        let button = host.append_element(body, "button", "Go");
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        host.on_click(
            &button,
            Box::new(move || {
                counter.set(counter.get() + 1);
                ClickOutcome::Proceed
            }),
        )
        .unwrap();

        host.click(button);
        host.set_disabled(&button, true).unwrap();
        host.click(button);
        assert_eq!(hits.get(), 1);
    }
}
