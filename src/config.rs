//! Enhancer configuration
//!
//! Every field has a default matching the dashboard's stock behaviour, and
//! every section is `#[serde(default)]`, so the host page only needs to name
//! what it overrides:
//!
//! ```json
//! { "timings": { "busy_ms": 5000 }, "busy_triggers": ["Deploy"] }
//! ```

use crate::error::EnhancerError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// TIMINGS
// =============================================================================

/// Durations (milliseconds) of the cosmetic timers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// How long a notification stays on the page
    pub notification_ms: u32,
    /// How long a trigger button stays disabled after a click
    pub busy_ms: u32,
    /// How long the copy button shows its confirmation label
    pub copied_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            notification_ms: 3000,
            busy_ms: 2000,
            copied_ms: 2000,
        }
    }
}

// =============================================================================
// LABELS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub processing: String,
    pub copy_idle: String,
    pub copy_done: String,
    pub search_placeholder: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            processing: "⏳ Processing...".to_string(),
            copy_idle: "📋 Copy".to_string(),
            copy_done: "✅ Copied!".to_string(),
            search_placeholder: "🔍 Search tools...".to_string(),
        }
    }
}

// =============================================================================
// SELECTORS
// =============================================================================

/// CSS selectors for the elements each pass binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub anchors: String,
    pub buttons: String,
    pub code_blocks: String,
    /// Container the search input is inserted into
    pub main_content: String,
    /// Elements filtered by the search input
    pub searchable: String,
    /// Elements that fade in on first intersection
    pub reveal: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            anchors: r##"a[href^="#"]"##.to_string(),
            buttons: "button".to_string(),
            code_blocks: "code".to_string(),
            main_content: ".main .block-container".to_string(),
            searchable: "h1, h2, h3, h4, p, button".to_string(),
            reveal: ".st-emotion-cache-0, .stButton, .stAlert".to_string(),
        }
    }
}

impl Selectors {
    fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("anchors", &self.anchors),
            ("buttons", &self.buttons),
            ("code_blocks", &self.code_blocks),
            ("main_content", &self.main_content),
            ("searchable", &self.searchable),
            ("reveal", &self.reveal),
        ]
    }
}

// =============================================================================
// ENHANCER CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    pub timings: Timings,
    pub labels: Labels,
    pub selectors: Selectors,
    /// Case-sensitive substrings that put a button into its busy state
    pub busy_triggers: Vec<String>,
    /// Background applied to search matches
    pub highlight_color: String,
    /// Inject the default notification/fade-in stylesheet
    pub inject_styles: bool,
    /// Max tracing level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            labels: Labels::default(),
            selectors: Selectors::default(),
            busy_triggers: vec!["Execute".to_string(), "Send".to_string(), "Run".to_string()],
            highlight_color: "rgba(26, 188, 156, 0.1)".to_string(),
            inject_styles: true,
            log_level: "info".to_string(),
        }
    }
}

impl EnhancerConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, EnhancerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EnhancerError> {
        for (name, selector) in self.selectors.entries() {
            if selector.trim().is_empty() {
                return Err(EnhancerError::InvalidConfig(format!(
                    "selector '{}' is empty",
                    name
                )));
            }
        }

        // An empty trigger is a substring of every label.
        if self.busy_triggers.iter().any(|t| t.is_empty()) {
            return Err(EnhancerError::InvalidConfig(
                "busy trigger words must be non-empty".to_string(),
            ));
        }

        self.max_level()?;
        Ok(())
    }

    /// Settles on the config to run with.
    ///
    /// `None` means nothing was supplied. A candidate that failed to parse or
    /// fails [`validate`](Self::validate) is replaced by defaults, and the
    /// reason is handed back for logging.
    pub fn resolve(
        candidate: Option<Result<Self, EnhancerError>>,
    ) -> (Self, Option<EnhancerError>) {
        let checked = candidate.map(|parsed| parsed.and_then(|c| c.validate().map(|_| c)));
        match checked {
            None => (Self::default(), None),
            Some(Ok(config)) => (config, None),
            Some(Err(err)) => (Self::default(), Some(err)),
        }
    }

    pub fn max_level(&self) -> Result<tracing::Level, EnhancerError> {
        tracing::Level::from_str(self.log_level.trim()).map_err(|_| {
            EnhancerError::InvalidConfig(format!("unknown log level '{}'", self.log_level))
        })
    }
}
