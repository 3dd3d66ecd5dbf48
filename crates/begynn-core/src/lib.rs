//! # begynn-core
//!
//! Shared library for the Begynn onboarding bridge containing the event
//! taxonomy, the envelope codec, the render URL builder, and the installation
//! identifier generator.
//!
//! This crate has zero dependencies on UI frameworks, embedded browsers, or
//! storage backends.  Everything here is a pure function or a plain data type.
//!
//! # Architecture overview (for beginners)
//!
//! A native application embeds a hosted onboarding flow inside a browser
//! view.  The web content talks back to the application by posting small JSON
//! strings ("messages").  Each message is wrapped in an *envelope* that tags
//! it as belonging to the Begynn protocol and carries exactly one *event*.
//!
//! This crate (`begynn-core`) is the shared foundation.  It defines:
//!
//! - **`protocol`** – What travels over the message channel.  The ten event
//!   shapes, the envelope around them, and the decoder that turns a raw
//!   string into a typed [`SdkEvent`].
//!
//! - **`domain`** – Small pieces of business logic with no I/O: the URL the
//!   browser is pointed at, and the UUID-shaped identifier that names one
//!   installation.

pub mod domain;
pub mod protocol;

// Re-export the most-used items at the crate root so callers can write
// `begynn_core::SdkEvent` instead of `begynn_core::protocol::events::SdkEvent`.
pub use domain::uid::generate_uid;
pub use domain::url::{render_url, DEFAULT_BASE_URL};
pub use protocol::envelope::{
    decode_message, DecodedMessage, Envelope, ProtocolError, PROTOCOL_SOURCE, PROTOCOL_VERSION,
};
pub use protocol::events::{EventType, SdkEvent};
