//! Render output handed to the host's view system.
//!
//! The component never draws anything itself.  [`RenderedView`] describes one
//! container view and what goes inside it; the host maps that onto its own
//! widgets.  `V` is the host's own placeholder type, produced by the loading
//! renderer the host supplied.

use serde_json::{json, Value};

use crate::domain::config::Style;

/// Settings for the embedded browser view, defaults already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserView {
    /// The page to load.
    pub url: String,
    pub javascript_enabled: bool,
    pub dom_storage_enabled: bool,
    /// Show the loading placeholder until the first page load finishes.
    pub start_in_loading_state: bool,
    pub user_agent: Option<String>,
    pub style: Style,
    pub extra: Style,
}

/// What the container holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewBody<V> {
    /// Identifier still resolving and no loading renderer set.
    Empty,
    /// Identifier still resolving; the host's placeholder.
    Loading(V),
    /// Identifier known; the embedded browser.
    Browser {
        browser: BrowserView,
        /// Placeholder the browser shows while a page loads.
        loading: Option<V>,
    },
}

/// One render pass of the component.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView<V> {
    pub container_style: Style,
    pub body: ViewBody<V>,
}

impl<V> RenderedView<V> {
    /// The browser settings, when the component is ready.
    pub fn browser(&self) -> Option<&BrowserView> {
        match &self.body {
            ViewBody::Browser { browser, .. } => Some(browser),
            _ => None,
        }
    }
}

/// Both the container and the browser fill their parent by default.
pub(crate) fn fill_parent() -> Style {
    match json!({ "flex": 1 }) {
        Value::Object(map) => map,
        _ => Style::new(),
    }
}

/// Returns `base` with every key of `overrides` written over it.
pub fn merge_style(base: &Style, overrides: &Style) -> Style {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

// ── Tests ─────────────────────────────────────────────────────────────────────
