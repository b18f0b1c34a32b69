//! Task Machine Pro page enhancer
//!
//! Client-side conveniences for the Task Machine Pro dashboard, compiled to
//! WASM: toast notifications, smooth anchor scrolling, busy states on action
//! buttons, copy buttons on code blocks, a search filter, and fade-in reveals.
//!
//! The behaviours are written against the [`host`] traits. In the browser
//! they run on [`host::WebHost`]; natively (and in tests) on
//! [`host::MemoryHost`].

pub mod anchor;
pub mod busy;
pub mod config;
pub mod copy;
pub mod enhancer;
pub mod error;
pub mod host;
pub mod notify;
pub mod reveal;
pub mod search;
pub mod styles;

#[cfg(target_arch = "wasm32")]
mod bindings;

pub use config::EnhancerConfig;
pub use enhancer::{InitReport, PageEnhancer};
pub use error::EnhancerError;
pub use notify::NotificationKind;
