//! All Begynn onboarding event types.
//!
//! Every event posted by the web content shares a common set of base fields
//! ([`BaseEvent`]) and adds a handful of variant-specific fields.  The `type`
//! field of the JSON object is the only discriminant.
//!
//! Decoding is tolerant.  A recognised `type` always yields its typed
//! variant: missing fields fall back to empty defaults, and fields with an
//! unexpected JSON shape (`null`, a fraction where an index was expected, a
//! negative index, an unknown enum string) are coerced field by field (see
//! the `lenient` module).  Only an unknown `type` yields
//! [`SdkEvent::Unrecognized`].

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::protocol::lenient;

/// Answers collected during the flow, keyed by question/choice-list id.
pub type OnboardingPayload = BTreeMap<String, Vec<String>>;

// ── Event type discriminants ──────────────────────────────────────────────────

/// The ten event discriminants understood by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Ready,
    OnboardingStart,
    OnboardingComplete,
    OnboardingExit,
    ScreenView,
    ScreenLeave,
    NavigationBack,
    ButtonClick,
    ChoiceSelect,
    ChoiceDeselect,
}

impl EventType {
    /// Every known discriminant, in declaration order.
    pub const ALL: [EventType; 10] = [
        EventType::Ready,
        EventType::OnboardingStart,
        EventType::OnboardingComplete,
        EventType::OnboardingExit,
        EventType::ScreenView,
        EventType::ScreenLeave,
        EventType::NavigationBack,
        EventType::ButtonClick,
        EventType::ChoiceSelect,
        EventType::ChoiceDeselect,
    ];

    /// The exact string used for this discriminant on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Ready => "ready",
            EventType::OnboardingStart => "onboarding_start",
            EventType::OnboardingComplete => "onboarding_complete",
            EventType::OnboardingExit => "onboarding_exit",
            EventType::ScreenView => "screen_view",
            EventType::ScreenLeave => "screen_leave",
            EventType::NavigationBack => "navigation_back",
            EventType::ButtonClick => "button_click",
            EventType::ChoiceSelect => "choice_select",
            EventType::ChoiceDeselect => "choice_deselect",
        }
    }
}

impl TryFrom<&str> for EventType {
    type Error = ();

    /// Exact, case-sensitive match against the wire strings.
    fn try_from(value: &str) -> Result<Self, ()> {
        EventType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or(())
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Shared fields ─────────────────────────────────────────────────────────────

/// Fields present on every event.  All values are opaque to the bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseEvent {
    /// ISO-8601 timestamp produced by the web content.
    #[serde(deserialize_with = "lenient::string")]
    pub timestamp: String,
    #[serde(deserialize_with = "lenient::string")]
    pub onboarding_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub session_id: String,
    /// Installation identifier the flow was rendered for.
    #[serde(deserialize_with = "lenient::string")]
    pub uid: String,
    #[serde(deserialize_with = "lenient::string")]
    pub placement_id: String,
}

/// What a clicked button does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonAction {
    Navigate,
    #[default]
    #[serde(rename = "none")]
    NoAction,
}

/// Selection mode of a choice list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceMode {
    #[default]
    Single,
    Multiple,
}

// ── Per-event payload structs ─────────────────────────────────────────────────

/// `ready`: the flow has loaded and knows its length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadyEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(deserialize_with = "lenient::integer")]
    pub total_screens: i64,
}

/// `onboarding_start`: the first screen is shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingStartEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(deserialize_with = "lenient::string")]
    pub first_screen_id: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub total_screens: i64,
}

/// `onboarding_complete`: the user reached the end of the flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingCompleteEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(deserialize_with = "lenient::number")]
    pub total_duration_ms: f64,
    #[serde(deserialize_with = "lenient::integer")]
    pub screens_viewed: i64,
    #[serde(deserialize_with = "lenient::payload")]
    pub payload: OnboardingPayload,
}

/// `onboarding_exit`: the user left before completing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingExitEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(deserialize_with = "lenient::string")]
    pub last_screen_id: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub last_screen_index: i64,
    /// 0–100, may be fractional.
    #[serde(deserialize_with = "lenient::number")]
    pub progress_percentage: f64,
    #[serde(deserialize_with = "lenient::payload")]
    pub payload: OnboardingPayload,
}

/// `screen_view`: a screen became visible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenViewEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(deserialize_with = "lenient::string")]
    pub screen_id: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub screen_index: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub screen_name: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub is_first: bool,
    #[serde(deserialize_with = "lenient::boolean")]
    pub is_last: bool,
}

/// `screen_leave`: a screen was hidden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenLeaveEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(deserialize_with = "lenient::string")]
    pub screen_id: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub screen_index: i64,
    /// Time spent on the screen.
    #[serde(deserialize_with = "lenient::number")]
    pub duration_ms: f64,
}

/// `navigation_back`: the user went back one screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationBackEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(deserialize_with = "lenient::string")]
    pub from_screen_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub to_screen_id: String,
}

/// `button_click`: a button inside the flow was pressed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonClickEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(deserialize_with = "lenient::string")]
    pub button_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub button_text: String,
    #[serde(deserialize_with = "lenient::string")]
    pub screen_id: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub action: ButtonAction,
    /// Expected when `action` is `navigate`; not enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "lenient::optional_string")]
    pub target_screen_id: Option<String>,
}

/// `choice_select`: an option in a choice list was selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceSelectEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(deserialize_with = "lenient::string")]
    pub choicelist_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub option_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub option_title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub screen_id: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub mode: ChoiceMode,
    /// Every option id selected after this change, in selection order.
    #[serde(deserialize_with = "lenient::string_list")]
    pub all_selected: Vec<String>,
}

/// `choice_deselect`: an option in a choice list was deselected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceDeselectEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    #[serde(deserialize_with = "lenient::string")]
    pub choicelist_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub option_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub option_title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub screen_id: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub all_selected: Vec<String>,
}

/// An event whose `type` is missing or unknown (e.g. from a newer web
/// content release).  The raw JSON is kept intact.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// The `type` string, if the event had one.
    pub event_type: Option<String>,
    /// The event object exactly as received.
    pub raw: Value,
}

// ── Top-level event enum ──────────────────────────────────────────────────────

/// A single event carried by an [`Envelope`](crate::protocol::envelope::Envelope).
#[derive(Debug, Clone, PartialEq)]
pub enum SdkEvent {
    Ready(ReadyEvent),
    OnboardingStart(OnboardingStartEvent),
    OnboardingComplete(OnboardingCompleteEvent),
    OnboardingExit(OnboardingExitEvent),
    ScreenView(ScreenViewEvent),
    ScreenLeave(ScreenLeaveEvent),
    NavigationBack(NavigationBackEvent),
    ButtonClick(ButtonClickEvent),
    ChoiceSelect(ChoiceSelectEvent),
    ChoiceDeselect(ChoiceDeselectEvent),
    Unrecognized(RawEvent),
}

impl SdkEvent {
    /// Decodes an event object.  Never fails: the `type` string alone picks
    /// the variant, and a missing or unknown `type` yields [`RawEvent`].
    pub fn from_value(value: Value) -> SdkEvent {
        let tag = value.get("type").and_then(Value::as_str).map(str::to_owned);

        match tag.as_deref().and_then(|t| EventType::try_from(t).ok()) {
            Some(kind) => Self::decode_known(kind, &value),
            None => SdkEvent::Unrecognized(RawEvent {
                event_type: tag,
                raw: value,
            }),
        }
    }

    fn decode_known(kind: EventType, value: &Value) -> SdkEvent {
        match kind {
            EventType::Ready => SdkEvent::Ready(typed(kind, value)),
            EventType::OnboardingStart => SdkEvent::OnboardingStart(typed(kind, value)),
            EventType::OnboardingComplete => SdkEvent::OnboardingComplete(typed(kind, value)),
            EventType::OnboardingExit => SdkEvent::OnboardingExit(typed(kind, value)),
            EventType::ScreenView => SdkEvent::ScreenView(typed(kind, value)),
            EventType::ScreenLeave => SdkEvent::ScreenLeave(typed(kind, value)),
            EventType::NavigationBack => SdkEvent::NavigationBack(typed(kind, value)),
            EventType::ButtonClick => SdkEvent::ButtonClick(typed(kind, value)),
            EventType::ChoiceSelect => SdkEvent::ChoiceSelect(typed(kind, value)),
            EventType::ChoiceDeselect => SdkEvent::ChoiceDeselect(typed(kind, value)),
        }
    }

    /// The typed discriminant, or `None` for [`SdkEvent::Unrecognized`].
    pub fn event_type(&self) -> Option<EventType> {
        match self {
            SdkEvent::Ready(_) => Some(EventType::Ready),
            SdkEvent::OnboardingStart(_) => Some(EventType::OnboardingStart),
            SdkEvent::OnboardingComplete(_) => Some(EventType::OnboardingComplete),
            SdkEvent::OnboardingExit(_) => Some(EventType::OnboardingExit),
            SdkEvent::ScreenView(_) => Some(EventType::ScreenView),
            SdkEvent::ScreenLeave(_) => Some(EventType::ScreenLeave),
            SdkEvent::NavigationBack(_) => Some(EventType::NavigationBack),
            SdkEvent::ButtonClick(_) => Some(EventType::ButtonClick),
            SdkEvent::ChoiceSelect(_) => Some(EventType::ChoiceSelect),
            SdkEvent::ChoiceDeselect(_) => Some(EventType::ChoiceDeselect),
            SdkEvent::Unrecognized(_) => None,
        }
    }

    /// The `type` string as it appeared on the wire, if any.
    pub fn type_tag(&self) -> Option<&str> {
        match self {
            SdkEvent::Unrecognized(raw) => raw.event_type.as_deref(),
            other => other.event_type().map(EventType::as_str),
        }
    }

    /// Shared base fields; `None` for [`SdkEvent::Unrecognized`].
    pub fn base(&self) -> Option<&BaseEvent> {
        match self {
            SdkEvent::Ready(e) => Some(&e.base),
            SdkEvent::OnboardingStart(e) => Some(&e.base),
            SdkEvent::OnboardingComplete(e) => Some(&e.base),
            SdkEvent::OnboardingExit(e) => Some(&e.base),
            SdkEvent::ScreenView(e) => Some(&e.base),
            SdkEvent::ScreenLeave(e) => Some(&e.base),
            SdkEvent::NavigationBack(e) => Some(&e.base),
            SdkEvent::ButtonClick(e) => Some(&e.base),
            SdkEvent::ChoiceSelect(e) => Some(&e.base),
            SdkEvent::ChoiceDeselect(e) => Some(&e.base),
            SdkEvent::Unrecognized(_) => None,
        }
    }

    /// Converts the event back into its wire JSON object, `type` included.
    ///
    /// Unrecognized events return their raw JSON unchanged.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if a field cannot be represented as JSON
    /// (e.g. a non-finite `progress_percentage`).
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        let mut value = match self {
            SdkEvent::Ready(e) => serde_json::to_value(e)?,
            SdkEvent::OnboardingStart(e) => serde_json::to_value(e)?,
            SdkEvent::OnboardingComplete(e) => serde_json::to_value(e)?,
            SdkEvent::OnboardingExit(e) => serde_json::to_value(e)?,
            SdkEvent::ScreenView(e) => serde_json::to_value(e)?,
            SdkEvent::ScreenLeave(e) => serde_json::to_value(e)?,
            SdkEvent::NavigationBack(e) => serde_json::to_value(e)?,
            SdkEvent::ButtonClick(e) => serde_json::to_value(e)?,
            SdkEvent::ChoiceSelect(e) => serde_json::to_value(e)?,
            SdkEvent::ChoiceDeselect(e) => serde_json::to_value(e)?,
            SdkEvent::Unrecognized(raw) => return Ok(raw.raw.clone()),
        };

        if let (Value::Object(map), Some(kind)) = (&mut value, self.event_type()) {
            map.insert("type".to_string(), Value::String(kind.as_str().to_string()));
        }
        Ok(value)
    }
}

/// Decodes a typed body.  Every field decoder is lenient, so this only falls
/// back to the empty default if `value` is not an object at all.
fn typed<T: DeserializeOwned + Default>(kind: EventType, value: &Value) -> T {
    T::deserialize(value).unwrap_or_else(|e| {
        warn!("{kind} event body could not be decoded ({e}); using empty fields");
        T::default()
    })
}

impl Serialize for SdkEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SdkEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(SdkEvent::from_value)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
