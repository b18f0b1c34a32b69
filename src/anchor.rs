//! Smooth scrolling for in-page fragment links
//!
//! Only links present when [`install`] runs are intercepted; links added
//! later keep the browser's default jump.

use crate::error::EnhancerError;
use crate::host::{ClickOutcome, Document, Host};
use std::rc::Rc;

/// Element id referenced by an in-page `href`, if any.
///
/// `"#"` on its own and non-fragment hrefs yield `None`.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Intercepts clicks on every link matching `selector`. Returns the count.
pub fn install<H: Host>(host: &Rc<H>, selector: &str) -> Result<usize, EnhancerError> {
    let links = host.query_selector_all(selector)?;

    for link in &links {
        let weak = Rc::downgrade(host);
        let target_link = link.clone();
        host.on_click(
            link,
            Box::new(move || {
                if let Some(host) = weak.upgrade() {
                    scroll_to_fragment(&*host, &target_link);
                }
                ClickOutcome::PreventDefault
            }),
        )?;
    }

    tracing::debug!(count = links.len(), "anchor links intercepted");
    Ok(links.len())
}

/// Scrolls to the element named by `link`'s current `href`; a miss is ignored.
fn scroll_to_fragment<D: Document>(doc: &D, link: &D::Node) {
    let href = doc.attribute(link, "href").unwrap_or_default();
    match fragment_target(&href).and_then(|id| doc.element_by_id(id)) {
        Some(target) => doc.scroll_into_view(&target),
        None => tracing::debug!(href = %href, "anchor target not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    #[test]
    fn test_fragment_target() {
        assert_eq!(fragment_target("#install"), Some("install"));
        assert_eq!(fragment_target("#"), None);
        assert_eq!(fragment_target(""), None);
        assert_eq!(fragment_target("/docs#install"), None);
    }

    #[test]
    fn test_scroll_reads_href_at_click_time() {
        let host = Rc::new(MemoryHost::new());
        let body = host.body().unwrap();
        let link = host.append_element_with(body, "a", &[("href", "#one")], "go");
        let one = host.append_element_with(body, "h2", &[("id", "one")], "One");
        let two = host.append_element_with(body, "h2", &[("id", "two")], "Two");

        assert_eq!(install(&host, r##"a[href^="#"]"##).unwrap(), 1);

        host.set_attribute(&link, "href", "#two").unwrap();
        assert_eq!(host.click(link), ClickOutcome::PreventDefault);
        assert_eq!(host.scrolled_into_view(), vec![two]);
        assert_ne!(host.scrolled_into_view(), vec![one]);
    }

    #[test]
    fn test_external_links_untouched() {
        let host = Rc::new(MemoryHost::new());
        let body = host.body().unwrap();
        let external = host.append_element_with(body, "a", &[("href", "https://example.com")], "x");

        assert_eq!(install(&host, r##"a[href^="#"]"##).unwrap(), 0);
        assert_eq!(host.click(external), ClickOutcome::Proceed);
    }
}
