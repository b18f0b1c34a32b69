//! Toast notifications
//!
//! A notification is a `div.notification.notification-{kind}` appended to the
//! body. It removes itself when its timer fires. Notifications share nothing:
//! each call creates its own element and its own timer. A new toast is placed
//! below the ones still showing so a burst stays readable.

use crate::error::EnhancerError;
use crate::host::Host;
use std::fmt;
use std::rc::Rc;

const STACK_TOP_PX: u32 = 20;
const STACK_STEP_PX: u32 = 64;

/// Fixed `top` offset for a toast that joins `showing` others.
pub fn stacked_top(showing: usize) -> String {
    let step = u32::try_from(showing).unwrap_or(u32::MAX).saturating_mul(STACK_STEP_PX);
    format!("{}px", STACK_TOP_PX.saturating_add(step))
}

/// Styling tag for a notification. Unknown tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Other(String),
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Other(tag) => tag,
        }
    }

    pub fn class_name(&self) -> String {
        format!("notification notification-{}", self.as_str())
    }
}

impl From<&str> for NotificationKind {
    fn from(tag: &str) -> Self {
        match tag {
            "info" => Self::Info,
            "success" => Self::Success,
            "warning" => Self::Warning,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shows `message` for `duration_ms`, then removes it.
///
/// Returns the notification element. The message is set as text content and
/// never parsed as markup.
pub fn notify<H: Host>(
    host: &Rc<H>,
    message: &str,
    kind: &NotificationKind,
    duration_ms: u32,
) -> Result<H::Node, EnhancerError> {
    let body = host.body().ok_or(EnhancerError::NoBody)?;
    let showing = host.query_selector_all(".notification")?.len();

    let notification = host.create_element("div")?;
    host.set_attribute(&notification, "class", &kind.class_name())?;
    host.set_style(&notification, "top", &stacked_top(showing))?;
    host.set_text_content(&notification, message);
    host.append_child(&body, &notification)?;

    let weak = Rc::downgrade(host);
    let target = notification.clone();
    let scheduled = host.set_timeout(
        duration_ms,
        Box::new(move || {
            if let Some(host) = weak.upgrade() {
                if host.is_connected(&target) {
                    host.remove(&target);
                }
            }
        }),
    );

    // Without a timer the toast would never leave.
    if let Err(err) = scheduled {
        host.remove(&notification);
        return Err(err);
    }

    tracing::debug!(kind = %kind, duration_ms, "notification shown");
    Ok(notification)
}
