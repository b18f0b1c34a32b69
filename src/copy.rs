//! Copy-to-clipboard overlay for code blocks

use crate::config::EnhancerConfig;
use crate::error::EnhancerError;
use crate::host::{ClickOutcome, Host};
use std::rc::Rc;

pub const COPY_BUTTON_CLASS: &str = "copy-button";

const COPY_BUTTON_CSS: &str = "position: absolute; top: 5px; right: 5px; \
    background: #1abc9c; color: white; border: none; border-radius: 4px; \
    padding: 4px 8px; font-size: 12px; cursor: pointer;";

/// Text to copy from a code block whose content ends with the overlay label.
pub fn copyable_text(block_text: &str, button_label: &str) -> String {
    block_text
        .strip_suffix(button_label)
        .unwrap_or(block_text)
        .to_string()
}

#[derive(Debug, Clone)]
struct CopySettings {
    idle_label: String,
    done_label: String,
    confirm_ms: u32,
}

/// Adds a copy button to every element matching `selectors.code_blocks`.
pub fn install<H: Host>(host: &Rc<H>, config: &EnhancerConfig) -> Result<usize, EnhancerError> {
    let settings = Rc::new(CopySettings {
        idle_label: config.labels.copy_idle.clone(),
        done_label: config.labels.copy_done.clone(),
        confirm_ms: config.timings.copied_ms,
    });
    let blocks = host.query_selector_all(&config.selectors.code_blocks)?;

    for block in &blocks {
        attach(host, block, &settings)?;
    }

    tracing::debug!(count = blocks.len(), "copy buttons attached");
    Ok(blocks.len())
}

fn attach<H: Host>(
    host: &Rc<H>,
    block: &H::Node,
    settings: &Rc<CopySettings>,
) -> Result<H::Node, EnhancerError> {
    let button = host.create_element("button")?;
    host.set_text_content(&button, &settings.idle_label);
    host.set_attribute(&button, "class", COPY_BUTTON_CLASS)?;
    host.set_attribute(&button, "style", COPY_BUTTON_CSS)?;

    let weak = Rc::downgrade(host);
    let settings = Rc::clone(settings);
    let (target_block, target_button) = (block.clone(), button.clone());
    host.on_click(
        &button,
        Box::new(move || {
            if let Some(host) = weak.upgrade() {
                copy_block(&host, &target_block, &target_button, &settings);
            }
            ClickOutcome::Proceed
        }),
    )?;

    // The block becomes the positioning context for the overlay.
    host.set_style(block, "position", "relative")?;
    host.append_child(block, &button)?;
    Ok(button)
}

fn copy_block<H: Host>(
    host: &Rc<H>,
    block: &H::Node,
    button: &H::Node,
    settings: &Rc<CopySettings>,
) {
    let text = copyable_text(&host.text_content(block), &host.text_content(button));

    let weak = Rc::downgrade(host);
    let settings = Rc::clone(settings);
    let button = button.clone();
    host.write_text(
        &text,
        Box::new(move |result| {
            let Some(host) = weak.upgrade() else {
                return;
            };
            match result {
                Ok(()) => confirm(&host, &button, &settings),
                Err(err) => tracing::debug!(error = %err, "clipboard write failed"),
            }
        }),
    );
}

fn confirm<H: Host>(host: &Rc<H>, button: &H::Node, settings: &CopySettings) {
    if !host.is_connected(button) {
        return;
    }
    host.set_text_content(button, &settings.done_label);

    let weak = Rc::downgrade(host);
    let target = button.clone();
    let idle = settings.idle_label.clone();
    let scheduled = host.set_timeout(
        settings.confirm_ms,
        Box::new(move || {
            if let Some(host) = weak.upgrade() {
                if host.is_connected(&target) {
                    host.set_text_content(&target, &idle);
                }
            }
        }),
    );
    if let Err(err) = scheduled {
        tracing::debug!(error = %err, "copy label revert not scheduled");
        host.set_text_content(button, &settings.idle_label);
    }
}
