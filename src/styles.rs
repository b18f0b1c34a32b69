//! Default stylesheet for notifications and the fade-in reveal
//!
//! The dashboard CSS defines none of these classes, so the enhancer ships
//! its own. Injected once; a page that already carries an element with
//! [`STYLESHEET_ID`] is left alone.

use crate::error::EnhancerError;
use crate::host::Document;

pub const STYLESHEET_ID: &str = "task-machine-pro-styles";

const STYLESHEET: &str = r#"
.notification {
    position: fixed;
    top: 20px;
    right: 20px;
    z-index: 10000;
    max-width: 360px;
    padding: 12px 18px;
    border-radius: 8px;
    color: #ffffff;
    background: #6a0dad;
    box-shadow: 0 4px 10px rgba(0, 0, 0, 0.15);
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    animation: tmp-fade-in 0.3s ease-out;
}
.notification-info { background: #3498db; }
.notification-success { background: #1abc9c; }
.notification-warning { background: #f39c12; }
.notification-error { background: #e74c3c; }

.fade-in { animation: tmp-fade-in 0.6s ease-out both; }

@keyframes tmp-fade-in {
    from { opacity: 0; transform: translateY(10px); }
    to { opacity: 1; transform: translateY(0); }
}
"#;

/// Appends the stylesheet to `<head>`. Returns `false` if it was already there.
pub fn inject<D: Document>(doc: &D) -> Result<bool, EnhancerError> {
    if doc.element_by_id(STYLESHEET_ID).is_some() {
        return Ok(false);
    }
    let head = doc.head().ok_or(EnhancerError::NoHead)?;

    let style = doc.create_element("style")?;
    doc.set_attribute(&style, "id", STYLESHEET_ID)?;
    doc.set_text_content(&style, STYLESHEET);
    doc.append_child(&head, &style)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    #[test]
    fn test_inject_once() {
        let host = MemoryHost::new();
        assert!(inject(&host).unwrap());
        assert!(!inject(&host).unwrap());

        let head = host.head().unwrap();
        assert_eq!(host.children(head).len(), 1);
        let style = host.element_by_id(STYLESHEET_ID).unwrap();
        assert!(host.text_content(&style).contains(".notification-success"));
    }

    #[test]
    fn test_no_head() {
        let host = MemoryHost::new();
        let head = host.head().unwrap();
        host.remove(&head);
        assert_eq!(inject(&host), Err(EnhancerError::NoHead));
    }
}
