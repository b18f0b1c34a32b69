//! Search box that filters the page's headings, paragraphs and buttons
//!
//! Every keystroke re-scans the document and re-evaluates each element. No
//! index, no debounce: fine for a dashboard's static content, not meant for
//! large documents.

use crate::config::EnhancerConfig;
use crate::error::EnhancerError;
use crate::host::{Document, Host};
use std::rc::Rc;

pub const SEARCH_INPUT_CLASS: &str = "search-input";

const SEARCH_INPUT_CSS: &str = "width: 100%; padding: 10px; border: 1px solid #ddd; \
    border-radius: 5px; margin-bottom: 20px; background: white; color: #333;";

/// Lowercased query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    needle: String,
}

/// What the filter does to one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Show { highlight: bool },
    /// Hidden; background left as it was
    Hide,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn evaluate(&self, text: &str) -> FilterDecision {
        if self.is_empty() {
            FilterDecision::Show { highlight: false }
        } else if text.to_lowercase().contains(&self.needle) {
            FilterDecision::Show { highlight: true }
        } else {
            FilterDecision::Hide
        }
    }
}

/// Inserts a search input at the top of `selectors.main_content`.
///
/// Returns `None` without error when the container is missing. Each call adds
/// another input.
pub fn add_search_functionality<H: Host>(
    host: &Rc<H>,
    config: &EnhancerConfig,
) -> Result<Option<H::Node>, EnhancerError> {
    let Some(container) = host.query_selector(&config.selectors.main_content)? else {
        tracing::debug!(
            selector = %config.selectors.main_content,
            "main content container missing, search skipped"
        );
        return Ok(None);
    };

    let input = host.create_element("input")?;
    host.set_attribute(&input, "type", "text")?;
    host.set_attribute(&input, "placeholder", &config.labels.search_placeholder)?;
    host.set_attribute(&input, "class", SEARCH_INPUT_CLASS)?;
    host.set_attribute(&input, "style", SEARCH_INPUT_CSS)?;
    host.prepend_child(&container, &input)?;

    let weak = Rc::downgrade(host);
    let searchable = config.selectors.searchable.clone();
    let highlight = config.highlight_color.clone();
    host.on_input(
        &input,
        Box::new(move |value: &str| {
            let Some(host) = weak.upgrade() else {
                return;
            };
            if let Err(err) = apply_filter(&*host, &searchable, &highlight, value) {
                tracing::warn!(error = %err, "search filter failed");
            }
        }),
    )?;

    tracing::debug!("search input mounted");
    Ok(Some(input))
}

/// Shows, hides and highlights every element matching `selector` for `raw`.
/// Returns how many elements remain visible.
pub fn apply_filter<D: Document>(
    doc: &D,
    selector: &str,
    highlight_color: &str,
    raw: &str,
) -> Result<usize, EnhancerError> {
    let query = SearchQuery::new(raw);
    let mut visible = 0;

    for element in doc.query_selector_all(selector)? {
        match query.evaluate(&doc.text_content(&element)) {
            FilterDecision::Show { highlight } => {
                visible += 1;
                doc.set_style(&element, "display", "block")?;
                let background = if highlight { highlight_color } else { "transparent" };
                doc.set_style(&element, "background-color", background)?;
            }
            FilterDecision::Hide => doc.set_style(&element, "display", "none")?,
        }
    }

    tracing::trace!(query = %raw, visible, "search filter applied");
    Ok(visible)
}
