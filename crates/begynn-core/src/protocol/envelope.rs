//! Envelope codec for the web-content message channel.
//!
//! Every message posted by the onboarding web content is a JSON string of
//! the form:
//!
//! ```json
//! {"source":"begynn-onboarding","version":"1.0","event":{"type":"ready", ...}}
//! ```
//!
//! The embedded browser's message channel is shared with anything else the
//! page (or third-party scripts on it) decides to post.  The `source` tag is
//! how the bridge tells its own messages apart: anything without the expected
//! tag is *foreign* and silently ignored, never reported as an error.
//!
//! # Decode outcomes
//!
//! | Raw message                             | Result                          |
//! |-----------------------------------------|---------------------------------|
//! | not JSON                                | `Err(ProtocolError::InvalidJson)` |
//! | JSON `null`                             | `Err(ProtocolError::NullMessage)` |
//! | other non-object JSON, or wrong `source` | `Ok(DecodedMessage::Foreign)`  |
//! | right `source`, `event` absent or null  | `Err(ProtocolError::MissingEvent)` |
//! | right `source`, any `event`             | `Ok(DecodedMessage::Event(..))` |

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::protocol::events::SdkEvent;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Tag every bridge message carries in its `source` field.
pub const PROTOCOL_SOURCE: &str = "begynn-onboarding";

/// Protocol version emitted by the current web content.  Informational only.
pub const PROTOCOL_VERSION: &str = "1.0";

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors produced while decoding a raw message.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The raw string is not valid JSON.
    #[error("message is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The raw string is the JSON literal `null`.  It has no `source` to
    /// check, so it cannot be classified as foreign.
    #[error("message is JSON null")]
    NullMessage,

    /// A bridge-tagged envelope with no `event` (or `"event": null`).
    #[error("begynn-onboarding envelope carries no event")]
    MissingEvent,
}

// ── Envelope ──────────────────────────────────────────────────────────────────

/// A decoded bridge message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Always [`PROTOCOL_SOURCE`] for decoded envelopes.
    pub source: String,
    /// Whatever version string the sender put in; never enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub event: SdkEvent,
}

impl Envelope {
    /// Wraps `event` with the current source tag and version.
    pub fn new(event: SdkEvent) -> Self {
        Self {
            source: PROTOCOL_SOURCE.to_string(),
            version: Some(PROTOCOL_VERSION.to_string()),
            event,
        }
    }

    /// Serializes the envelope to the string form the web content posts.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures from [`SdkEvent::to_value`].
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Outcome of [`decode_message`] for a syntactically valid message.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedMessage {
    /// A bridge message.
    Event(Envelope),
    /// Valid JSON that does not belong to this protocol.
    Foreign,
}

/// Decodes one raw message from the web content.
///
/// # Errors
///
/// - [`ProtocolError::InvalidJson`] if `raw` does not parse.
/// - [`ProtocolError::NullMessage`] if `raw` is `null`.
/// - [`ProtocolError::MissingEvent`] if a correctly tagged envelope has no
///   usable `event`.
///
/// # Example
///
/// ```rust
/// use begynn_core::{decode_message, DecodedMessage};
///
/// let raw = r#"{"source":"other-widget","payload":1}"#;
/// assert_eq!(decode_message(raw).unwrap(), DecodedMessage::Foreign);
/// ```
pub fn decode_message(raw: &str) -> Result<DecodedMessage, ProtocolError> {
    let value: Value = serde_json::from_str(raw)?;

    let mut fields = match value {
        Value::Object(fields) => fields,
        Value::Null => return Err(ProtocolError::NullMessage),
        _ => return Ok(DecodedMessage::Foreign),
    };

    if fields.get("source").and_then(Value::as_str) != Some(PROTOCOL_SOURCE) {
        return Ok(DecodedMessage::Foreign);
    }

    let version = fields
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_owned);

    let event = match fields.remove("event") {
        None | Some(Value::Null) => return Err(ProtocolError::MissingEvent),
        Some(event) => SdkEvent::from_value(event),
    };

    Ok(DecodedMessage::Event(Envelope {
        source: PROTOCOL_SOURCE.to_string(),
        version,
        event,
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::events::{EventType, ReadyEvent};

    fn expect_event(raw: &str) -> Envelope {
        match decode_message(raw).expect("decode must succeed") {
            DecodedMessage::Event(envelope) => envelope,
            DecodedMessage::Foreign => panic!("expected a bridge event for {raw}"),
        }
    }

    #[test]
    fn test_tagged_envelope_decodes_event() {
        // Arrange
        let raw = r#"{"source":"begynn-onboarding","version":"1.0","event":{"type":"ready","total_screens":4}}"#;

        // Act
        let envelope = expect_event(raw);

        // Assert
        assert_eq!(envelope.version.as_deref(), Some("1.0"));
        assert_eq!(envelope.event.event_type(), Some(EventType::Ready));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = decode_message("{not json");
        assert!(matches!(result, Err(ProtocolError::InvalidJson(_))));
    }

    #[test]
    fn test_empty_string_is_an_error() {
        assert!(matches!(decode_message(""), Err(ProtocolError::InvalidJson(_))));
    }

    #[test]
    fn test_wrong_source_is_foreign() {
        let raw = r#"{"source":"intercom","event":{"type":"ready"}}"#;
        assert_eq!(decode_message(raw).unwrap(), DecodedMessage::Foreign);
    }

    #[test]
    fn test_missing_source_is_foreign() {
        let raw = r#"{"event":{"type":"ready"}}"#;
        assert_eq!(decode_message(raw).unwrap(), DecodedMessage::Foreign);
    }

    #[test]
    fn test_source_match_is_exact() {
        let raw = r#"{"source":"Begynn-Onboarding","event":{"type":"ready"}}"#;
        assert_eq!(decode_message(raw).unwrap(), DecodedMessage::Foreign);
    }

    #[test]
    fn test_non_object_json_is_foreign() {
        for raw in ["42", "\"hello\"", "[1,2]", "true"] {
            assert_eq!(
                decode_message(raw).unwrap(),
                DecodedMessage::Foreign,
                "{raw} must be ignored"
            );
        }
    }

    #[test]
    fn test_null_message_is_an_error() {
        assert!(matches!(decode_message("null"), Err(ProtocolError::NullMessage)));
        assert!(matches!(decode_message(" null "), Err(ProtocolError::NullMessage)));
    }

    #[test]
    fn test_tagged_envelope_without_event_is_an_error() {
        let raw = r#"{"source":"begynn-onboarding","version":"1.0"}"#;
        assert!(matches!(decode_message(raw), Err(ProtocolError::MissingEvent)));
    }

    #[test]
    fn test_tagged_envelope_with_null_event_is_an_error() {
        let raw = r#"{"source":"begynn-onboarding","event":null}"#;
        assert!(matches!(decode_message(raw), Err(ProtocolError::MissingEvent)));
    }

    #[test]
    fn test_version_is_informational_only() {
        // A future version and a missing version both decode normally.
        let future = expect_event(
            r#"{"source":"begynn-onboarding","version":"9.9","event":{"type":"ready"}}"#,
        );
        let absent = expect_event(r#"{"source":"begynn-onboarding","event":{"type":"ready"}}"#);

        assert_eq!(future.version.as_deref(), Some("9.9"));
        assert_eq!(absent.version, None);
        assert_eq!(future.event, absent.event);
    }

    #[test]
    fn test_unknown_event_type_still_decodes() {
        let envelope = expect_event(
            r#"{"source":"begynn-onboarding","version":"1.0","event":{"type":"paywall_shown"}}"#,
        );
        assert_eq!(envelope.event.event_type(), None);
        assert_eq!(envelope.event.type_tag(), Some("paywall_shown"));
    }

    #[test]
    fn test_envelope_to_json_is_accepted_by_decoder() {
        // Arrange
        let envelope = Envelope::new(SdkEvent::Ready(ReadyEvent {
            total_screens: 3,
            ..ReadyEvent::default()
        }));

        // Act
        let json = envelope.to_json().unwrap();
        let decoded = expect_event(&json);

        // Assert
        assert!(json.contains(r#""source":"begynn-onboarding""#));
        assert_eq!(decoded, envelope);
    }
}
