//! Browser host backed by `web-sys`
//!
//! Closures handed to the browser live for the page lifetime and are leaked
//! with `forget` / `once_into_js`.

use super::{
    ClickHandler, ClickOutcome, Clipboard, ClipboardCallback, Document, InputHandler,
    IntersectionHandler, Task, Timers,
};
use crate::error::EnhancerError;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, HtmlElement, HtmlInputElement, IntersectionObserver,
    IntersectionObserverEntry, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

pub struct WebHost {
    window: Window,
    document: web_sys::Document,
}

impl WebHost {
    pub fn new() -> Result<Self, EnhancerError> {
        let window = web_sys::window().ok_or(EnhancerError::NoWindow)?;
        Self::with_window(window)
    }

    pub fn with_window(window: Window) -> Result<Self, EnhancerError> {
        let document = window.document().ok_or(EnhancerError::NoDocument)?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }
}

fn selector_error(selector: &str) -> impl FnOnce(JsValue) -> EnhancerError + '_ {
    move |_| EnhancerError::InvalidSelector(selector.to_string())
}

impl Document for WebHost {
    type Node = Element;

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn head(&self) -> Option<Element> {
        self.document.head().map(Element::from)
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Element>, EnhancerError> {
        self.document
            .query_selector(selector)
            .map_err(selector_error(selector))
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, EnhancerError> {
        let list = self
            .document
            .query_selector_all(selector)
            .map_err(selector_error(selector))?;
        Ok((0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> Result<Element, EnhancerError> {
        Ok(self.document.create_element(tag)?)
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), EnhancerError> {
        Ok(node.set_attribute(name, value)?)
    }

    fn add_class(&self, node: &Element, class: &str) -> Result<(), EnhancerError> {
        Ok(node.class_list().add_1(class)?)
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<(), EnhancerError> {
        match node.dyn_ref::<HtmlElement>() {
            Some(el) => Ok(el.style().set_property(property, value)?),
            // SVG and friends: nothing the enhancer styles lives there
            None => Ok(()),
        }
    }

    fn set_disabled(&self, node: &Element, disabled: bool) -> Result<(), EnhancerError> {
        if disabled {
            Ok(node.set_attribute("disabled", "")?)
        } else {
            Ok(node.remove_attribute("disabled")?)
        }
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), EnhancerError> {
        parent.append_child(child)?;
        Ok(())
    }

    fn prepend_child(&self, parent: &Element, child: &Element) -> Result<(), EnhancerError> {
        parent.insert_before(child, parent.first_child().as_ref())?;
        Ok(())
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn scroll_into_view(&self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn on_click(&self, node: &Element, mut handler: ClickHandler) -> Result<(), EnhancerError> {
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if handler() == ClickOutcome::PreventDefault {
                event.prevent_default();
            }
        });
        node.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())?;
        callback.forget();
        Ok(())
    }

    fn on_input(&self, node: &Element, mut handler: InputHandler) -> Result<(), EnhancerError> {
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let value = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();
            handler(&value);
        });
        node.add_event_listener_with_callback("input", callback.as_ref().unchecked_ref())?;
        callback.forget();
        Ok(())
    }

    fn observe_intersections(
        &self,
        targets: &[Element],
        mut handler: IntersectionHandler<Element>,
    ) -> Result<(), EnhancerError> {
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        handler(&entry.target());
                    }
                }
            },
        );
        let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
        callback.forget();
        for target in targets {
            observer.observe(target);
        }
        Ok(())
    }
}

impl Timers for WebHost {
    fn set_timeout(&self, delay_ms: u32, task: Task) -> Result<(), EnhancerError> {
        let callback = Closure::once_into_js(move || task());
        let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout,
            )?;
        Ok(())
    }
}

impl Clipboard for WebHost {
    fn write_text(&self, text: &str, done: ClipboardCallback) {
        // navigator.clipboard is absent on insecure origins
        let navigator = self.window.navigator();
        let clipboard = match js_sys::Reflect::get(&navigator, &"clipboard".into()) {
            Ok(value) if !value.is_undefined() && !value.is_null() => value,
            _ => return done(Err(EnhancerError::ClipboardUnavailable)),
        };

        let promise = js_sys::Reflect::get(&clipboard, &"writeText".into())
            .and_then(|f| f.dyn_into::<js_sys::Function>())
            .and_then(|write| write.call1(&clipboard, &JsValue::from_str(text)))
            .and_then(|p| p.dyn_into::<js_sys::Promise>());

        let promise = match promise {
            Ok(p) => p,
            Err(err) => return done(Err(EnhancerError::from(err))),
        };

        wasm_bindgen_futures::spawn_local(async move {
            let result = wasm_bindgen_futures::JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|err| {
                    EnhancerError::ClipboardRejected(
                        err.as_string().unwrap_or_else(|| format!("{:?}", err)),
                    )
                });
            done(result);
        });
    }
}
