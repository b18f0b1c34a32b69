//! WASM entry point and the `window.TaskMachinePro` export table
//!
//! ```text
//! wasm start ──► config (window.TaskMachineProConfig) ──► tracing-wasm
//!            ──► WebHost + PageEnhancer
//!            ──► window.TaskMachinePro = { showNotification, addSearchFunctionality }
//!            ──► initialize() at document ready
//! ```

use crate::config::EnhancerConfig;
use crate::enhancer::{
    should_init_now, PageEnhancer, ADD_SEARCH_FUNCTIONALITY, CONFIG_GLOBAL, EXPORT_NAME,
    SHOW_NOTIFICATION,
};
use crate::error::EnhancerError;
use crate::host::WebHost;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let host = Rc::new(WebHost::new()?);
    let (config, config_error) = load_config(host.window());

    let level = config.max_level().unwrap_or(tracing::Level::INFO);
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build(),
    );
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "ignoring {}, using defaults", CONFIG_GLOBAL);
    }

    let enhancer = Rc::new(PageEnhancer::new(Rc::clone(&host), config));
    install_exports(host.window(), &enhancer)?;

    run_when_ready(host.document(), move || {
        enhancer.initialize();
    })?;

    tracing::info!("Task Machine Pro enhancer loaded");
    Ok(())
}

/// Reads the optional config object from the window.
///
/// A missing object means defaults; an invalid one also means defaults, plus
/// the error so it can be logged once tracing is up.
fn load_config(window: &Window) -> (EnhancerConfig, Option<EnhancerError>) {
    let candidate = js_sys::Reflect::get(window, &CONFIG_GLOBAL.into())
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
        .map(|raw| {
            serde_wasm_bindgen::from_value::<EnhancerConfig>(raw)
                .map_err(|e| EnhancerError::InvalidConfig(e.to_string()))
        });
    EnhancerConfig::resolve(candidate)
}

fn install_exports(window: &Window, enhancer: &Rc<PageEnhancer<WebHost>>) -> Result<(), JsValue> {
    let exports = js_sys::Object::new();

    let notifier = Rc::clone(enhancer);
    let show_notification = Closure::<dyn Fn(String, Option<String>)>::new(
        move |message: String, kind: Option<String>| {
            notifier.show_notification(&message, kind.as_deref());
        },
    );
    js_sys::Reflect::set(
        &exports,
        &SHOW_NOTIFICATION.into(),
        &show_notification.into_js_value(),
    )?;

    let searcher = Rc::clone(enhancer);
    let add_search = Closure::<dyn Fn()>::new(move || {
        searcher.add_search_functionality();
    });
    js_sys::Reflect::set(
        &exports,
        &ADD_SEARCH_FUNCTIONALITY.into(),
        &add_search.into_js_value(),
    )?;

    js_sys::Reflect::set(window, &EXPORT_NAME.into(), &exports)?;
    Ok(())
}

/// Runs `init` now if the DOM is parsed, otherwise on `DOMContentLoaded`.
fn run_when_ready(
    document: &web_sys::Document,
    init: impl FnOnce() + 'static,
) -> Result<(), JsValue> {
    if should_init_now(&document.ready_state()) {
        init();
        return Ok(());
    }

    let callback = Closure::once_into_js(init);
    document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
    Ok(())
}
