//! Render URL construction.
//!
//! The embedded browser is pointed at:
//!
//! ```text
//! {base_url}/render/{placement_id}?uid={uid}
//! ```
//!
//! Both the path segment and the query value are percent-encoded with the
//! same rules as JavaScript's `encodeURIComponent`, because the hosted web
//! content decodes them with `decodeURIComponent`.  `base_url` is used
//! verbatim.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Production host serving the onboarding flows.
pub const DEFAULT_BASE_URL: &str = "https://begynn.com";

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes one URL component (UTF-8 bytes, upper-case hex).
pub fn encode_uri_component(component: &str) -> String {
    utf8_percent_encode(component, URI_COMPONENT).to_string()
}

/// Builds the URL the embedded browser loads for a placement.
///
/// # Example
///
/// ```rust
/// use begynn_core::render_url;
///
/// let url = render_url("https://begynn.com", "flow 1", "u/1");
/// assert_eq!(url, "https://begynn.com/render/flow%201?uid=u%2F1");
/// ```
pub fn render_url(base_url: &str, placement_id: &str, uid: &str) -> String {
    format!(
        "{base_url}/render/{}?uid={}",
        encode_uri_component(placement_id),
        encode_uri_component(uid)
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_url_encodes_space_and_slash() {
        // Arrange / Act
        let url = render_url("https://begynn.com", "flow 1", "u/1");

        // Assert
        assert_eq!(url, "https://begynn.com/render/flow%201?uid=u%2F1");
    }

    #[test]
    fn test_render_url_leaves_uuid_untouched() {
        let uid = "3f1c2a9e-7b4d-4e2a-9c1f-0a1b2c3d4e5f";
        let url = render_url(DEFAULT_BASE_URL, "welcome", uid);
        assert_eq!(url, format!("https://begynn.com/render/welcome?uid={uid}"));
    }

    #[test]
    fn test_render_url_uses_base_url_verbatim() {
        // A trailing slash is the caller's responsibility.
        let url = render_url("http://localhost:3000/", "p", "u");
        assert_eq!(url, "http://localhost:3000//render/p?uid=u");
    }

    #[test]
    fn test_unreserved_marks_are_not_encoded() {
        assert_eq!(encode_uri_component("a-b_c.d!e~f*g'h(i)j"), "a-b_c.d!e~f*g'h(i)j");
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        assert_eq!(encode_uri_component("a?b&c=d#e"), "a%3Fb%26c%3Dd%23e");
        assert_eq!(encode_uri_component("+@:;,$"), "%2B%40%3A%3B%2C%24");
    }

    #[test]
    fn test_non_ascii_is_encoded_as_utf8_bytes() {
        assert_eq!(encode_uri_component("é"), "%C3%A9");
        assert_eq!(encode_uri_component("引导"), "%E5%BC%95%E5%AF%BC");
    }

    #[test]
    fn test_empty_components_produce_empty_segments() {
        assert_eq!(render_url("https://x.io", "", ""), "https://x.io/render/?uid=");
    }
}
