//! End-to-end behaviour of the page enhancer on a dashboard-shaped page.

use std::rc::Rc;
use task_machine_pro::host::{ClickOutcome, Document, MemoryHost, NodeId};
use task_machine_pro::{EnhancerConfig, PageEnhancer};

// =============================================================================
// FIXTURE
// =============================================================================

struct Page {
    host: Rc<MemoryHost>,
    container: NodeId,
    heading: NodeId,
    deploy_heading: NodeId,
    paragraph: NodeId,
    run_button: NodeId,
    plain_button: NodeId,
    code: NodeId,
    anchor_ok: NodeId,
    anchor_missing: NodeId,
    section: NodeId,
    alert: NodeId,
}

/// Roughly what the dashboard renders: `.main .block-container` holding
/// headings, text, action buttons, a code block and in-page links.
fn dashboard() -> Page {
    let host = Rc::new(MemoryHost::new());
    let body = host.body().unwrap();
    let main = host.append_element_with(body, "section", &[("class", "main")], "");
    let container = host.append_element_with(main, "div", &[("class", "block-container")], "");

    let heading = host.append_element(container, "h1", "All-in-one Toolkit");
    let deploy_heading = host.append_element(container, "h2", "Deploy with Docker");
    let paragraph = host.append_element(container, "p", "Run commands over SSH");
    let button_wrap =
        host.append_element_with(container, "div", &[("class", "stButton")], "");
    let run_button = host.append_element(button_wrap, "button", "Run Task");
    let plain_button = host.append_element(container, "button", "Refresh");
    let pre = host.append_element(container, "pre", "");
    let code = host.append_element(pre, "code", "echo hello");
    let anchor_ok = host.append_element_with(container, "a", &[("href", "#usage")], "Usage");
    let anchor_missing =
        host.append_element_with(container, "a", &[("href", "#nowhere")], "Broken");
    let section = host.append_element_with(container, "div", &[("id", "usage")], "");
    let alert = host.append_element_with(container, "div", &[("class", "stAlert")], "Careful");

    Page {
        host,
        container,
        heading,
        deploy_heading,
        paragraph,
        run_button,
        plain_button,
        code,
        anchor_ok,
        anchor_missing,
        section,
        alert,
    }
}

fn enhanced() -> (Page, PageEnhancer<MemoryHost>) {
    let page = dashboard();
    let enhancer = PageEnhancer::new(Rc::clone(&page.host), EnhancerConfig::default());
    enhancer.initialize();
    (page, enhancer)
}

// =============================================================================
// INITIALIZATION
// =============================================================================

#[test]
fn test_initialize_report() {
    let page = dashboard();
    let enhancer = PageEnhancer::new(Rc::clone(&page.host), EnhancerConfig::default());
    let report = enhancer.initialize();

    assert!(report.stylesheet_injected);
    assert_eq!(report.anchors, 2);
    assert_eq!(report.busy_buttons, 2);
    assert_eq!(report.code_blocks, 1);
    assert!(report.search_mounted);
    assert_eq!(report.reveal_targets, 2);
    assert!(report.failed_passes.is_empty());
}

#[test]
fn test_initialize_is_idempotent() {
    let (page, enhancer) = enhanced();
    let first_children = page.host.children(page.container);

    let again = enhancer.initialize();
    assert!(enhancer.is_initialized());
    assert_eq!(again.code_blocks, 1);
    assert_eq!(page.host.children(page.container), first_children);
    assert_eq!(page.host.children(page.code).len(), 1);
}

#[test]
fn test_elements_added_later_are_not_bound() {
    let (page, _enhancer) = enhanced();
    let late = page.host.append_element(page.container, "button", "Run Later");

    page.host.click(late);
    assert_eq!(page.host.text_content(&late), "Run Later");
    assert!(!page.host.is_disabled(late));
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

#[test]
fn test_notification_lifecycle() {
    let (page, enhancer) = enhanced();
    let body = page.host.body().unwrap();
    let before = page.host.children(body);

    enhancer.show_notification("Saved", Some("success"));

    let after = page.host.children(body);
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(&after[..before.len()], &before[..]);
    let toast = *after.last().unwrap();
    assert_eq!(page.host.text_content(&toast), "Saved");
    assert!(page.host.has_class(toast, "notification"));
    assert!(page.host.has_class(toast, "notification-success"));

    page.host.advance(3000);
    assert_eq!(page.host.children(body), before);
}

#[test]
fn test_notifications_expire_independently() {
    let (page, enhancer) = enhanced();

    for i in 0..3 {
        enhancer.show_notification(&format!("burst {}", i), None);
    }
    page.host.advance(1000);
    let late = enhancer
        .notify("late", "warning".into())
        .expect("body present");

    assert_eq!(page.host.query_selector_all(".notification").unwrap().len(), 4);

    page.host.advance(2000);
    let remaining = page.host.query_selector_all(".notification").unwrap();
    assert_eq!(remaining, vec![late]);

    page.host.advance(1000);
    assert!(page.host.query_selector_all(".notification").unwrap().is_empty());
}

// =============================================================================
// ANCHORS
// =============================================================================

#[test]
fn test_anchor_scrolls_to_existing_target() {
    let (page, _enhancer) = enhanced();

    assert_eq!(page.host.click(page.anchor_ok), ClickOutcome::PreventDefault);
    assert_eq!(page.host.scrolled_into_view(), vec![page.section]);
}

#[test]
fn test_anchor_with_missing_target_is_ignored() {
    let (page, _enhancer) = enhanced();

    assert_eq!(
        page.host.click(page.anchor_missing),
        ClickOutcome::PreventDefault
    );
    assert!(page.host.scrolled_into_view().is_empty());
}

// =============================================================================
// BUSY BUTTONS
// =============================================================================

#[test]
fn test_run_task_busy_cycle() {
    let (page, enhancer) = enhanced();

    page.host.click(page.run_button);
    assert_eq!(page.host.text_content(&page.run_button), "⏳ Processing...");
    assert!(page.host.is_disabled(page.run_button));

    // Unrelated activity in the meantime does not move the revert.
    enhancer.show_notification("working", None);
    page.host.click(page.run_button);
    page.host.advance(2000);

    assert_eq!(page.host.text_content(&page.run_button), "Run Task");
    assert!(!page.host.is_disabled(page.run_button));
}

#[test]
fn test_non_trigger_button_is_left_alone() {
    let (page, _enhancer) = enhanced();

    page.host.click(page.plain_button);
    assert_eq!(page.host.text_content(&page.plain_button), "Refresh");
    assert!(!page.host.is_disabled(page.plain_button));
}

#[test]
fn test_custom_trigger_words() {
    let page = dashboard();
    let config = EnhancerConfig::from_json(r#"{ "busy_triggers": ["Refresh"] }"#).unwrap();
    PageEnhancer::new(Rc::clone(&page.host), config).initialize();

    page.host.click(page.run_button);
    assert_eq!(page.host.text_content(&page.run_button), "Run Task");

    page.host.click(page.plain_button);
    assert!(page.host.is_disabled(page.plain_button));
}

// =============================================================================
// COPY
// =============================================================================

#[test]
fn test_copy_code_block() {
    let (page, _enhancer) = enhanced();
    let button = page.host.children(page.code)[0];

    // The overlay is not itself a busy-state button.
    page.host.click(button);
    assert!(!page.host.is_disabled(button));

    page.host.advance(0);
    assert_eq!(page.host.clipboard_text().as_deref(), Some("echo hello"));
    assert_eq!(page.host.text_content(&button), "✅ Copied!");

    page.host.advance(2000);
    assert_eq!(page.host.text_content(&button), "📋 Copy");
}

// =============================================================================
// SEARCH
// =============================================================================

fn search_input(page: &Page) -> NodeId {
    page.host.children(page.container)[0]
}

#[test]
fn test_search_filters_and_highlights() {
    let (page, _enhancer) = enhanced();
    let input = search_input(&page);
    assert_eq!(page.host.tag(input), "input");

    page.host.type_text(input, "deploy");

    let highlight = Some("rgba(26, 188, 156, 0.1)".to_string());
    assert_eq!(page.host.style(page.deploy_heading, "display").as_deref(), Some("block"));
    assert_eq!(page.host.style(page.deploy_heading, "background-color"), highlight);
    for hidden in [page.heading, page.paragraph, page.run_button, page.plain_button] {
        assert_eq!(page.host.style(hidden, "display").as_deref(), Some("none"));
    }
}

#[test]
fn test_search_is_case_insensitive() {
    let (page, _enhancer) = enhanced();
    let input = search_input(&page);

    page.host.type_text(input, "DEPLOY");
    assert_eq!(page.host.style(page.deploy_heading, "display").as_deref(), Some("block"));
    assert_eq!(page.host.style(page.heading, "display").as_deref(), Some("none"));
}

#[test]
fn test_clearing_search_restores_everything() {
    let (page, _enhancer) = enhanced();
    let input = search_input(&page);

    page.host.type_text(input, "deploy");
    page.host.type_text(input, "");

    for element in [
        page.heading,
        page.deploy_heading,
        page.paragraph,
        page.run_button,
        page.plain_button,
    ] {
        assert_eq!(page.host.style(element, "display").as_deref(), Some("block"));
        assert_eq!(
            page.host.style(element, "background-color").as_deref(),
            Some("transparent")
        );
    }
}

#[test]
fn test_exported_search_adds_another_input() {
    let (page, enhancer) = enhanced();
    let second = enhancer.add_search_functionality().expect("container present");

    assert_eq!(page.host.children(page.container)[0], second);
    assert_eq!(page.host.query_selector_all("input.search-input").unwrap().len(), 2);
}

// =============================================================================
// REVEAL
// =============================================================================

#[test]
fn test_fade_in_on_intersection() {
    let (page, _enhancer) = enhanced();

    assert!(!page.host.has_class(page.alert, "fade-in"));
    page.host.bring_into_view(page.alert);
    assert!(page.host.has_class(page.alert, "fade-in"));
}
