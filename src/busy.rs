//! Busy state for action buttons
//!
//! A button whose label contains a trigger word ("Execute", "Send", "Run")
//! is relabeled and disabled on click, then restored after a fixed delay.
//!
//! The delay is cosmetic. It is not tied to the work the click started, so
//! the button may come back before that work finishes, or stay disabled
//! after it already has.

use crate::config::EnhancerConfig;
use crate::error::EnhancerError;
use crate::host::{ClickOutcome, Host};
use std::rc::Rc;

/// Case-sensitive substring match against any trigger.
pub fn is_trigger_label(label: &str, triggers: &[String]) -> bool {
    triggers.iter().any(|trigger| label.contains(trigger.as_str()))
}

#[derive(Debug, Clone)]
struct BusySettings {
    triggers: Vec<String>,
    processing_label: String,
    duration_ms: u32,
}

/// Wraps every element matching `selectors.buttons`. Returns the count.
pub fn install<H: Host>(host: &Rc<H>, config: &EnhancerConfig) -> Result<usize, EnhancerError> {
    let settings = Rc::new(BusySettings {
        triggers: config.busy_triggers.clone(),
        processing_label: config.labels.processing.clone(),
        duration_ms: config.timings.busy_ms,
    });
    let buttons = host.query_selector_all(&config.selectors.buttons)?;

    for button in &buttons {
        let weak = Rc::downgrade(host);
        let settings = Rc::clone(&settings);
        let target = button.clone();
        host.on_click(
            button,
            Box::new(move || {
                if let Some(host) = weak.upgrade() {
                    if let Err(err) = activate(&host, &target, &settings) {
                        tracing::warn!(error = %err, "button busy state failed");
                    }
                }
                ClickOutcome::Proceed
            }),
        )?;
    }

    tracing::debug!(count = buttons.len(), "buttons wrapped with busy state");
    Ok(buttons.len())
}

/// Enters the busy state if the label qualifies. Returns whether it did.
fn activate<H: Host>(
    host: &Rc<H>,
    button: &H::Node,
    settings: &BusySettings,
) -> Result<bool, EnhancerError> {
    let original = host.text_content(button);
    if !is_trigger_label(&original, &settings.triggers) {
        return Ok(false);
    }

    host.set_text_content(button, &settings.processing_label);
    host.set_disabled(button, true)?;

    let weak = Rc::downgrade(host);
    let target = button.clone();
    let label = original.clone();
    let scheduled = host.set_timeout(
        settings.duration_ms,
        Box::new(move || {
            let Some(host) = weak.upgrade() else {
                return;
            };
            if !host.is_connected(&target) {
                return;
            }
            host.set_text_content(&target, &label);
            if let Err(err) = host.set_disabled(&target, false) {
                tracing::warn!(error = %err, "failed to re-enable button");
            }
        }),
    );

    if let Err(err) = scheduled {
        // No timer means no revert; undo now rather than strand the button.
        host.set_text_content(button, &original);
        host.set_disabled(button, false)?;
        return Err(err);
    }
    Ok(true)
}
