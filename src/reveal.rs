//! One-shot fade-in on first viewport intersection
//!
//! Targets stay observed after they reveal. Later intersections re-add a
//! class that is already there, which changes nothing on screen.

use crate::error::EnhancerError;
use crate::host::Host;
use std::rc::Rc;

pub const FADE_IN_CLASS: &str = "fade-in";

/// Observes every element matching `selector`. Returns the count.
pub fn install<H: Host>(host: &Rc<H>, selector: &str) -> Result<usize, EnhancerError> {
    let targets = host.query_selector_all(selector)?;
    if targets.is_empty() {
        return Ok(0);
    }

    let weak = Rc::downgrade(host);
    host.observe_intersections(
        &targets,
        Box::new(move |target: &H::Node| {
            if let Some(host) = weak.upgrade() {
                if let Err(err) = host.add_class(target, FADE_IN_CLASS) {
                    tracing::debug!(error = %err, "fade-in class not applied");
                }
            }
        }),
    )?;

    tracing::debug!(count = targets.len(), "fade-in targets observed");
    Ok(targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Document, MemoryHost};

    const SELECTOR: &str = ".st-emotion-cache-0, .stButton, .stAlert";

    #[test]
    fn test_reveal_on_first_intersection() {
        let host = Rc::new(MemoryHost::new());
        let body = host.body().unwrap();
        let alert = host.append_element_with(body, "div", &[("class", "stAlert")], "Heads up");
        let card = host.append_element_with(body, "div", &[("class", "stButton")], "");
        let other = host.append_element_with(body, "div", &[("class", "plain")], "");

        assert_eq!(install(&host, SELECTOR).unwrap(), 2);
        assert!(!host.has_class(alert, FADE_IN_CLASS));

        host.bring_into_view(alert);
        host.bring_into_view(other);
        assert!(host.has_class(alert, FADE_IN_CLASS));
        assert!(!host.has_class(card, FADE_IN_CLASS));
        assert!(!host.has_class(other, FADE_IN_CLASS));

        host.bring_into_view(alert);
        assert_eq!(
            host.attribute(&alert, "class").as_deref(),
            Some("stAlert fade-in")
        );
    }

    #[test]
    fn test_no_targets() {
        let host = Rc::new(MemoryHost::new());
        assert_eq!(install(&host, SELECTOR).unwrap(), 0);
    }
}
