//! Message dispatch: raw strings from the web content → host callbacks.
//!
//! The embedded browser hands every posted message to
//! [`MessageDispatcher::handle_message`] as a plain string.  The dispatcher
//! decodes it with [`begynn_core::decode_message`] and then:
//!
//! ```text
//! not JSON / no event ──► on_error(BridgeError::Decode)
//! other source        ──► dropped, no callback
//! bridge event        ──► on_event(&event)          (always, first)
//!                         on_<type>(&typed_event)   (at most one)
//! ```
//!
//! Unknown event types reach `on_event` only.  Every callback is optional;
//! a missing one is simply skipped.
//!
//! Browser load failures are not messages.  The host reports them through
//! [`MessageDispatcher::handle_load_error`], which only touches `on_error`.

use thiserror::Error;
use tracing::{error, info};

use begynn_core::protocol::events::{
    ButtonClickEvent, ChoiceDeselectEvent, ChoiceSelectEvent, NavigationBackEvent,
    OnboardingCompleteEvent, OnboardingExitEvent, OnboardingStartEvent, ReadyEvent,
    ScreenLeaveEvent, ScreenViewEvent,
};
use begynn_core::{decode_message, DecodedMessage, ProtocolError, SdkEvent};

// ── Error type ────────────────────────────────────────────────────────────────

/// What the `on_error` callback receives.
///
/// Neither variant stops the component; it keeps listening for messages.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A message could not be decoded (invalid JSON, or a bridge envelope
    /// without an event).
    #[error("failed to decode onboarding message: {0}")]
    Decode(#[from] ProtocolError),

    /// The embedded browser failed to load the page.
    #[error("onboarding page failed to load: {description}")]
    BrowserLoad { description: String },
}

// ── Callbacks ─────────────────────────────────────────────────────────────────

/// A host callback.  Invoked synchronously on the thread that delivered the
/// message.
pub type Callback<E> = Box<dyn Fn(&E) + Send + Sync>;

/// The host's callbacks, one per event type plus a catch-all and an error
/// handler.  Build with the `on_*` methods; unset callbacks are no-ops.
///
/// # Example
///
/// ```rust
/// use begynn_onboarding::application::EventCallbacks;
///
/// let callbacks = EventCallbacks::new()
///     .on_screen_view(|e| println!("screen {} ({})", e.screen_index, e.screen_id))
///     .on_error(|e| eprintln!("onboarding error: {e}"));
/// ```
#[derive(Default)]
pub struct EventCallbacks {
    ready: Option<Callback<ReadyEvent>>,
    start: Option<Callback<OnboardingStartEvent>>,
    complete: Option<Callback<OnboardingCompleteEvent>>,
    exit: Option<Callback<OnboardingExitEvent>>,
    screen_view: Option<Callback<ScreenViewEvent>>,
    screen_leave: Option<Callback<ScreenLeaveEvent>>,
    navigation_back: Option<Callback<NavigationBackEvent>>,
    button_click: Option<Callback<ButtonClickEvent>>,
    choice_select: Option<Callback<ChoiceSelectEvent>>,
    choice_deselect: Option<Callback<ChoiceDeselectEvent>>,
    any_event: Option<Callback<SdkEvent>>,
    error: Option<Callback<BridgeError>>,
}

impl EventCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_ready(mut self, f: impl Fn(&ReadyEvent) + Send + Sync + 'static) -> Self {
        self.ready = Some(Box::new(f));
        self
    }

    pub fn on_start(
        mut self,
        f: impl Fn(&OnboardingStartEvent) + Send + Sync + 'static,
    ) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    pub fn on_complete(
        mut self,
        f: impl Fn(&OnboardingCompleteEvent) + Send + Sync + 'static,
    ) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    pub fn on_exit(mut self, f: impl Fn(&OnboardingExitEvent) + Send + Sync + 'static) -> Self {
        self.exit = Some(Box::new(f));
        self
    }

    pub fn on_screen_view(
        mut self,
        f: impl Fn(&ScreenViewEvent) + Send + Sync + 'static,
    ) -> Self {
        self.screen_view = Some(Box::new(f));
        self
    }

    pub fn on_screen_leave(
        mut self,
        f: impl Fn(&ScreenLeaveEvent) + Send + Sync + 'static,
    ) -> Self {
        self.screen_leave = Some(Box::new(f));
        self
    }

    pub fn on_navigation_back(
        mut self,
        f: impl Fn(&NavigationBackEvent) + Send + Sync + 'static,
    ) -> Self {
        self.navigation_back = Some(Box::new(f));
        self
    }

    pub fn on_button_click(
        mut self,
        f: impl Fn(&ButtonClickEvent) + Send + Sync + 'static,
    ) -> Self {
        self.button_click = Some(Box::new(f));
        self
    }

    pub fn on_choice_select(
        mut self,
        f: impl Fn(&ChoiceSelectEvent) + Send + Sync + 'static,
    ) -> Self {
        self.choice_select = Some(Box::new(f));
        self
    }

    pub fn on_choice_deselect(
        mut self,
        f: impl Fn(&ChoiceDeselectEvent) + Send + Sync + 'static,
    ) -> Self {
        self.choice_deselect = Some(Box::new(f));
        self
    }

    /// Catch-all: receives every bridge event, including unknown types,
    /// before any type-specific callback.
    pub fn on_event(mut self, f: impl Fn(&SdkEvent) + Send + Sync + 'static) -> Self {
        self.any_event = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&BridgeError) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for EventCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCallbacks")
            .field("ready", &self.ready.is_some())
            .field("start", &self.start.is_some())
            .field("complete", &self.complete.is_some())
            .field("exit", &self.exit.is_some())
            .field("screen_view", &self.screen_view.is_some())
            .field("screen_leave", &self.screen_leave.is_some())
            .field("navigation_back", &self.navigation_back.is_some())
            .field("button_click", &self.button_click.is_some())
            .field("choice_select", &self.choice_select.is_some())
            .field("choice_deselect", &self.choice_deselect.is_some())
            .field("any_event", &self.any_event.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

fn call<E>(callback: &Option<Callback<E>>, event: &E) {
    if let Some(f) = callback {
        f(event);
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// What [`MessageDispatcher::handle_message`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// A bridge event was delivered to the callbacks.
    Dispatched,
    /// Valid JSON from some other source; dropped.
    Foreign,
    /// Undecodable; reported through `on_error`.
    Rejected,
}

/// Routes decoded events to an [`EventCallbacks`] set.
#[derive(Debug)]
pub struct MessageDispatcher {
    callbacks: EventCallbacks,
    debug: bool,
}

impl MessageDispatcher {
    pub fn new(callbacks: EventCallbacks, debug: bool) -> Self {
        Self { callbacks, debug }
    }

    /// Decodes one raw message and invokes the matching callbacks.
    pub fn handle_message(&self, raw: &str) -> MessageOutcome {
        let envelope = match decode_message(raw) {
            Ok(DecodedMessage::Event(envelope)) => envelope,
            Ok(DecodedMessage::Foreign) => return MessageOutcome::Foreign,
            Err(e) => {
                self.report(BridgeError::Decode(e));
                return MessageOutcome::Rejected;
            }
        };

        let event = envelope.event;
        if self.debug {
            info!(
                target: "begynn",
                "received event {}: {event:?}",
                event.type_tag().unwrap_or("<untyped>")
            );
        }

        call(&self.callbacks.any_event, &event);
        self.dispatch_typed(&event);
        MessageOutcome::Dispatched
    }

    /// Reports a page load failure from the embedded browser.
    pub fn handle_load_error(&self, description: &str) {
        self.report(BridgeError::BrowserLoad {
            description: description.to_string(),
        });
    }

    fn report(&self, err: BridgeError) {
        if self.debug {
            error!(target: "begynn", "{err}");
        }
        call(&self.callbacks.error, &err);
    }

    fn dispatch_typed(&self, event: &SdkEvent) {
        let cb = &self.callbacks;
        match event {
            SdkEvent::Ready(e) => call(&cb.ready, e),
            SdkEvent::OnboardingStart(e) => call(&cb.start, e),
            SdkEvent::OnboardingComplete(e) => call(&cb.complete, e),
            SdkEvent::OnboardingExit(e) => call(&cb.exit, e),
            SdkEvent::ScreenView(e) => call(&cb.screen_view, e),
            SdkEvent::ScreenLeave(e) => call(&cb.screen_leave, e),
            SdkEvent::NavigationBack(e) => call(&cb.navigation_back, e),
            SdkEvent::ButtonClick(e) => call(&cb.button_click, e),
            SdkEvent::ChoiceSelect(e) => call(&cb.choice_select, e),
            SdkEvent::ChoiceDeselect(e) => call(&cb.choice_deselect, e),
            SdkEvent::Unrecognized(_) => {}
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
