//! Application layer for begynn-onboarding.
//!
//! The application layer knows *what* the component does: resolve an
//! identifier, describe the view, route messages to callbacks.  It reaches
//! storage and the browser only through the [`KeyValueStore`] and
//! [`EmbeddedBrowser`] traits; the infrastructure layer supplies the real
//! implementations.
//!
//! # What does NOT belong here?
//!
//! - File system access (that is `infrastructure::storage`)
//! - Reading stdin or driving a browser process

pub mod component;
pub mod dispatcher;
pub mod identifier;

pub use component::{ComponentState, EmbeddedBrowser, OnboardingBridge};
pub use dispatcher::{BridgeError, Callback, EventCallbacks, MessageDispatcher, MessageOutcome};
pub use identifier::{IdentifierProvider, KeyValueStore, MemoryStore, StoreError, UID_STORAGE_KEY};
