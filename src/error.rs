//! Enhancer error types.

use thiserror::Error;

/// Errors raised while binding behaviours to the page.
///
/// None of these reach the user: the enhancer is cosmetic, so callers at the
/// JS boundary log them and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnhancerError {
    /// No global `window` (not running in a browsing context).
    #[error("no window in this context")]
    NoWindow,

    /// Window has no document.
    #[error("window has no document")]
    NoDocument,

    /// Document has no body to append notifications to.
    #[error("document has no body")]
    NoBody,

    /// Document has no head to host the stylesheet.
    #[error("document has no head")]
    NoHead,

    /// Selector rejected by the host.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// Configuration failed to parse or validate.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Host exposes no clipboard capability.
    #[error("clipboard unavailable")]
    ClipboardUnavailable,

    /// Clipboard write was refused (permissions, focus, ...).
    #[error("clipboard write rejected: {0}")]
    ClipboardRejected(String),

    /// Any other JS exception surfaced through web-sys.
    #[error("js error: {0}")]
    Js(String),
}

impl From<serde_json::Error> for EnhancerError {
    fn from(err: serde_json::Error) -> Self {
        EnhancerError::InvalidConfig(err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for EnhancerError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        EnhancerError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<EnhancerError> for wasm_bindgen::JsValue {
    fn from(err: EnhancerError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            EnhancerError::InvalidSelector("a[".into()).to_string(),
            "invalid selector: a["
        );
        assert_eq!(EnhancerError::NoBody.to_string(), "document has no body");
    }

    #[test]
    fn test_serde_error_maps_to_invalid_config() {
        let err: EnhancerError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, EnhancerError::InvalidConfig(_)));
    }
}
