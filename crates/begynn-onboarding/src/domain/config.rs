//! Component configuration types.
//!
//! [`OnboardingConfig`] is everything the host decides up front: which flow
//! to load, whose identifier to load it for, where the flow is served from,
//! and how the rendered views are styled.  Callbacks and the loading
//! renderer are closures and live on the component itself (see
//! `application::component`).
//!
//! # Design rationale
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! variable reads inside the domain) makes the component easy to embed in
//! tests.  The host binary is responsible for populating the struct from CLI
//! args or environment variables.

use begynn_core::DEFAULT_BASE_URL;
use serde_json::{Map, Value};

/// Identifier used for every preview render.  Never persisted.
pub const PREVIEW_UID: &str = "preview";

/// A style object: property name → value, merged key by key over defaults.
pub type Style = Map<String, Value>;

/// Where the installation identifier comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UidSource {
    /// The host already knows the identifier (e.g. its own user id).
    Provided(String),
    /// The component resolves it through the persisted identifier store.
    Resolve,
    /// Editor/preview mode: always [`PREVIEW_UID`], storage is never touched.
    Preview,
}

/// Pass-through settings for the embedded browser.
///
/// There is intentionally no field for the page source or the message
/// handler: the component owns both.  Every `None` falls back to the
/// component's default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowserProps {
    /// Default `true`.
    pub javascript_enabled: Option<bool>,
    /// Default `true`.
    pub dom_storage_enabled: Option<bool>,
    /// Default: `true` only when a loading renderer is set.
    pub start_in_loading_state: Option<bool>,
    pub user_agent: Option<String>,
    /// Merged over the default browser style (`flex: 1`).
    pub style: Style,
    /// Engine-specific settings forwarded untouched.
    pub extra: Map<String, Value>,
}

/// All construction-time configuration for one onboarding component.
///
/// # Example
///
/// ```rust
/// use begynn_onboarding::domain::{OnboardingConfig, UidSource};
///
/// let cfg = OnboardingConfig::new("welcome", UidSource::Resolve).with_debug(true);
/// assert_eq!(cfg.base_url, "https://begynn.com");
/// assert!(cfg.debug);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingConfig {
    /// Selects which remote onboarding flow to load.  Opaque to the bridge.
    pub placement_id: String,

    pub uid_source: UidSource,

    /// Host serving the flows.  Used verbatim, so no trailing slash.
    pub base_url: String,

    /// Logs every received event, every parse failure and every browser
    /// error.
    pub debug: bool,

    /// Merged over the default container style (`flex: 1`).
    pub container_style: Style,

    pub browser_props: BrowserProps,
}

impl OnboardingConfig {
    /// Creates a configuration with the production base URL, debug off and
    /// no style overrides.
    pub fn new(placement_id: impl Into<String>, uid_source: UidSource) -> Self {
        Self {
            placement_id: placement_id.into(),
            uid_source,
            base_url: DEFAULT_BASE_URL.to_string(),
            debug: false,
            container_style: Style::new(),
            browser_props: BrowserProps::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_container_style(mut self, style: Style) -> Self {
        self.container_style = style;
        self
    }

    pub fn with_browser_props(mut self, props: BrowserProps) -> Self {
        self.browser_props = props;
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_uses_production_base_url() {
        // Arrange / Act
        let cfg = OnboardingConfig::new("welcome", UidSource::Resolve);
        // Assert
        assert_eq!(cfg.base_url, "https://begynn.com");
    }

    #[test]
    fn test_new_has_debug_off_and_no_overrides() {
        let cfg = OnboardingConfig::new("welcome", UidSource::Preview);
        assert!(!cfg.debug);
        assert!(cfg.container_style.is_empty());
        assert_eq!(cfg.browser_props, BrowserProps::default());
    }

    #[test]
    fn test_builder_methods_override_fields() {
        let mut style = Style::new();
        style.insert("backgroundColor".to_string(), json!("#000"));

        let cfg = OnboardingConfig::new("p", UidSource::Provided("u".to_string()))
            .with_base_url("http://localhost:3000")
            .with_debug(true)
            .with_container_style(style.clone());

        assert_eq!(cfg.base_url, "http://localhost:3000");
        assert!(cfg.debug);
        assert_eq!(cfg.container_style, style);
        assert_eq!(cfg.uid_source, UidSource::Provided("u".to_string()));
    }

    #[test]
    fn test_preview_uid_sentinel() {
        assert_eq!(PREVIEW_UID, "preview");
    }
}
