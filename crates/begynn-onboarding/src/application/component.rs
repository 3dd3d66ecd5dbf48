//! The onboarding component.
//!
//! [`OnboardingBridge`] ties the pieces together: it resolves the identifier,
//! builds the render URL, describes the view the host should draw, and feeds
//! messages from the embedded browser into the [`MessageDispatcher`].
//!
//! # Lifecycle
//!
//! ```text
//!   new()  ──► Resolving ──mount()──► Ready { uid, url }
//!     │                                   ▲
//!     └── Provided / Preview ─────────────┘   (no storage access)
//! ```
//!
//! There is no error state.  Decode and load failures go to the `on_error`
//! callback and the component stays `Ready`.
//!
//! # What the host wires up
//!
//! 1. Call [`OnboardingBridge::mount`] once and then [`OnboardingBridge::render`].
//! 2. Create a browser for the [`BrowserView`] it describes and hand it to
//!    [`OnboardingBridge::attach_browser`].
//! 3. Forward every string the page posts to
//!    [`OnboardingBridge::handle_message`], and every load failure to
//!    [`OnboardingBridge::handle_load_error`].

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use begynn_core::render_url;

use crate::application::dispatcher::{EventCallbacks, MessageDispatcher, MessageOutcome};
use crate::application::identifier::{IdentifierProvider, KeyValueStore, MemoryStore};
use crate::domain::config::{OnboardingConfig, UidSource, PREVIEW_UID};
use crate::domain::view::{fill_parent, merge_style, BrowserView, RenderedView, ViewBody};

/// The platform web view, as seen by the component.
///
/// Infrastructure implementations drive a real or headless browser; tests
/// use mocks.
#[cfg_attr(test, mockall::automock)]
pub trait EmbeddedBrowser: Send {
    /// Reloads the current URL.  Fire and forget.
    fn reload(&self);
}

impl<T: EmbeddedBrowser + Send + Sync + ?Sized> EmbeddedBrowser for Arc<T> {
    fn reload(&self) {
        (**self).reload()
    }
}

/// Where the component is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentState {
    /// Waiting for the identifier store.
    Resolving,
    /// Identifier known; the page can load.
    Ready { uid: String, url: String },
}

type LoadingRenderer<V> = Box<dyn Fn() -> V + Send + Sync>;

/// One embedded onboarding flow.
///
/// `V` is the host's loading placeholder type; hosts without one use the
/// default `()`.
pub struct OnboardingBridge<V = ()> {
    config: OnboardingConfig,
    dispatcher: MessageDispatcher,
    identifiers: IdentifierProvider,
    loading: Option<LoadingRenderer<V>>,
    browser: Mutex<Option<Box<dyn EmbeddedBrowser>>>,
    state: ComponentState,
}

impl<V> OnboardingBridge<V> {
    /// Creates the component.
    ///
    /// With [`UidSource::Provided`] or [`UidSource::Preview`] it is `Ready`
    /// immediately.  With [`UidSource::Resolve`] it starts `Resolving` and
    /// uses an in-memory store until [`Self::with_identifier_store`] supplies
    /// a persistent one.
    pub fn new(config: OnboardingConfig, callbacks: EventCallbacks) -> Self {
        let state = match &config.uid_source {
            UidSource::Provided(uid) => ready_state(&config, uid.clone()),
            UidSource::Preview => ready_state(&config, PREVIEW_UID.to_string()),
            UidSource::Resolve => ComponentState::Resolving,
        };
        let dispatcher = MessageDispatcher::new(callbacks, config.debug);

        Self {
            config,
            dispatcher,
            identifiers: IdentifierProvider::new(Arc::new(MemoryStore::new())),
            loading: None,
            browser: Mutex::new(None),
            state,
        }
    }

    /// Uses `store` to persist the identifier.  Ignored unless the identifier
    /// source is [`UidSource::Resolve`].
    pub fn with_identifier_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.identifiers = IdentifierProvider::new(store);
        self
    }

    /// Sets the placeholder shown while resolving and while the page loads.
    pub fn with_loading_renderer(mut self, render: impl Fn() -> V + Send + Sync + 'static) -> Self {
        self.loading = Some(Box::new(render));
        self
    }

    pub fn config(&self) -> &OnboardingConfig {
        &self.config
    }

    pub fn state(&self) -> &ComponentState {
        &self.state
    }

    /// The render URL, once the identifier is known.
    pub fn url(&self) -> Option<&str> {
        match &self.state {
            ComponentState::Ready { url, .. } => Some(url),
            ComponentState::Resolving => None,
        }
    }

    pub fn uid(&self) -> Option<&str> {
        match &self.state {
            ComponentState::Ready { uid, .. } => Some(uid),
            ComponentState::Resolving => None,
        }
    }

    /// Resolves the identifier if the component is still `Resolving`.
    /// Calling it again once `Ready` does nothing.
    pub async fn mount(&mut self) -> &ComponentState {
        if self.state == ComponentState::Resolving {
            let uid = self.identifiers.resolve().await;
            self.state = ready_state(&self.config, uid);
            if let ComponentState::Ready { url, .. } = &self.state {
                info!("onboarding ready at {url}");
            }
        }
        &self.state
    }

    /// Describes what the host should draw right now.
    pub fn render(&self) -> RenderedView<V> {
        let container_style = merge_style(&fill_parent(), &self.config.container_style);
        let placeholder = || self.loading.as_ref().map(|render| render());

        let body = match &self.state {
            ComponentState::Resolving => match placeholder() {
                Some(view) => ViewBody::Loading(view),
                None => ViewBody::Empty,
            },
            ComponentState::Ready { url, .. } => {
                let props = &self.config.browser_props;
                ViewBody::Browser {
                    browser: BrowserView {
                        url: url.clone(),
                        javascript_enabled: props.javascript_enabled.unwrap_or(true),
                        dom_storage_enabled: props.dom_storage_enabled.unwrap_or(true),
                        start_in_loading_state: props
                            .start_in_loading_state
                            .unwrap_or(self.loading.is_some()),
                        user_agent: props.user_agent.clone(),
                        style: merge_style(&fill_parent(), &props.style),
                        extra: props.extra.clone(),
                    },
                    loading: placeholder(),
                }
            }
        };

        RenderedView {
            container_style,
            body,
        }
    }

    /// Hands the component the browser created for [`Self::render`]'s
    /// [`BrowserView`].  Replaces any previously attached browser.
    pub fn attach_browser(&self, browser: Box<dyn EmbeddedBrowser>) {
        match self.browser.lock() {
            Ok(mut slot) => *slot = Some(browser),
            Err(poisoned) => *poisoned.into_inner() = Some(browser),
        }
    }

    /// Forgets the attached browser, e.g. when the host tears its view down.
    pub fn detach_browser(&self) {
        match self.browser.lock() {
            Ok(mut slot) => *slot = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    /// Asks the attached browser to reload the current URL.  Does nothing
    /// if no browser is attached yet.
    pub fn reload(&self) {
        let slot = match self.browser.lock() {
            Ok(slot) => slot,
            Err(poisoned) => {
                warn!("browser slot poisoned; reloading anyway");
                poisoned.into_inner()
            }
        };
        if let Some(browser) = slot.as_ref() {
            browser.reload();
        }
    }

    /// Feeds one message posted by the page to the callbacks.
    pub fn handle_message(&self, raw: &str) -> MessageOutcome {
        self.dispatcher.handle_message(raw)
    }

    /// Reports a page load failure from the browser.
    pub fn handle_load_error(&self, description: &str) {
        self.dispatcher.handle_load_error(description)
    }
}

impl<V> std::fmt::Debug for OnboardingBridge<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingBridge")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("has_loading_renderer", &self.loading.is_some())
            .finish_non_exhaustive()
    }
}

fn ready_state(config: &OnboardingConfig, uid: String) -> ComponentState {
    let url = render_url(&config.base_url, &config.placement_id, &uid);
    ComponentState::Ready { uid, url }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
