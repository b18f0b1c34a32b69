//! Page enhancer service
//!
//! Built once at startup and kept for the page lifetime. [`PageEnhancer::initialize`]
//! makes a single registration pass over the document as it stands; elements
//! inserted afterwards are not picked up.
//!
//! Pass order matters: busy-state wrapping runs before the copy overlay so
//! the copy buttons it creates are never wrapped.

use crate::config::EnhancerConfig;
use crate::error::EnhancerError;
use crate::host::Host;
use crate::notify::NotificationKind;
use crate::{anchor, busy, copy, notify, reveal, search, styles};
use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// PAGE LIFECYCLE
// =============================================================================

/// Window property the export table is published under.
pub const EXPORT_NAME: &str = "TaskMachinePro";
/// Window property an optional config object is read from.
pub const CONFIG_GLOBAL: &str = "TaskMachineProConfig";
pub const SHOW_NOTIFICATION: &str = "showNotification";
pub const ADD_SEARCH_FUNCTIONALITY: &str = "addSearchFunctionality";

/// Whether a document reporting `ready_state` can be initialized right away.
///
/// Only `"loading"` has to wait for `DOMContentLoaded`; `"interactive"` and
/// `"complete"` are already parsed.
pub fn should_init_now(ready_state: &str) -> bool {
    ready_state != "loading"
}

/// What the initialization pass attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub stylesheet_injected: bool,
    pub anchors: usize,
    pub busy_buttons: usize,
    pub code_blocks: usize,
    pub search_mounted: bool,
    pub reveal_targets: usize,
    /// Names of passes that failed and were skipped
    pub failed_passes: Vec<&'static str>,
}

pub struct PageEnhancer<H: Host> {
    host: Rc<H>,
    config: EnhancerConfig,
    report: RefCell<Option<InitReport>>,
}

impl<H: Host> PageEnhancer<H> {
    pub fn new(host: Rc<H>, config: EnhancerConfig) -> Self {
        Self {
            host,
            config,
            report: RefCell::new(None),
        }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    pub fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    /// Runs every enhancement pass once. Later calls return the first report.
    pub fn initialize(&self) -> InitReport {
        if let Some(report) = self.report.borrow().as_ref() {
            tracing::debug!("page enhancer already initialized");
            return report.clone();
        }

        let mut failed = Vec::new();
        let host = &self.host;
        let config = &self.config;

        let stylesheet_injected = config.inject_styles
            && run_pass(&mut failed, "styles", || styles::inject(&**host));
        let anchors = run_pass(&mut failed, "anchors", || {
            anchor::install(host, &config.selectors.anchors)
        });
        let busy_buttons = run_pass(&mut failed, "busy", || busy::install(host, config));
        let code_blocks = run_pass(&mut failed, "copy", || copy::install(host, config));
        let search_mounted = run_pass(&mut failed, "search", || {
            search::add_search_functionality(host, config).map(|input| input.is_some())
        });
        let reveal_targets = run_pass(&mut failed, "reveal", || {
            reveal::install(host, &config.selectors.reveal)
        });

        let report = InitReport {
            stylesheet_injected,
            anchors,
            busy_buttons,
            code_blocks,
            search_mounted,
            reveal_targets,
            failed_passes: failed,
        };
        tracing::info!(
            anchors = report.anchors,
            busy_buttons = report.busy_buttons,
            code_blocks = report.code_blocks,
            search_mounted = report.search_mounted,
            reveal_targets = report.reveal_targets,
            failed = report.failed_passes.len(),
            "page enhancements initialized"
        );

        *self.report.borrow_mut() = Some(report.clone());
        report
    }

    pub fn is_initialized(&self) -> bool {
        self.report.borrow().is_some()
    }

    /// Shows a toast and hands back its element.
    pub fn notify(&self, message: &str, kind: NotificationKind) -> Result<H::Node, EnhancerError> {
        notify::notify(&self.host, message, &kind, self.config.timings.notification_ms)
    }

    /// Export-surface form of [`notify`](Self::notify): `kind` defaults to
    /// `info` and failures are only logged.
    pub fn show_notification(&self, message: &str, kind: Option<&str>) {
        let kind = kind.map(NotificationKind::from).unwrap_or_default();
        if let Err(err) = self.notify(message, kind) {
            tracing::warn!(error = %err, "notification not shown");
        }
    }

    /// Mounts another search input. Failures are only logged.
    pub fn add_search_functionality(&self) -> Option<H::Node> {
        match search::add_search_functionality(&self.host, &self.config) {
            Ok(input) => input,
            Err(err) => {
                tracing::warn!(error = %err, "search input not mounted");
                None
            }
        }
    }
}

fn run_pass<T: Default>(
    failed: &mut Vec<&'static str>,
    name: &'static str,
    pass: impl FnOnce() -> Result<T, EnhancerError>,
) -> T {
    match pass() {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(pass = name, error = %err, "enhancement pass failed");
            failed.push(name);
            T::default()
        }
    }
}
