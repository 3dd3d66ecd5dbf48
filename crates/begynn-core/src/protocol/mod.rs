//! Protocol module containing the event taxonomy and the envelope codec.

pub mod envelope;
pub mod events;
mod lenient;

pub use envelope::{decode_message, DecodedMessage, Envelope, ProtocolError};
pub use events::*;
