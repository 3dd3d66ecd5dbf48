//! Domain layer for begynn-onboarding.
//!
//! The domain layer contains plain data types that have no dependencies on
//! I/O, async runtimes, or a particular browser engine.
//!
//! # What belongs in the domain layer?
//!
//! - The component configuration (placement, identifier source, styling)
//! - The render output handed to the host's view system
//!
//! # What does NOT belong here?
//!
//! - Reading or writing persistent storage
//! - Talking to an embedded browser
//! - Anything that could block or fail due to external state

pub mod config;
pub mod view;

// Re-export the most commonly needed types at the domain module boundary
// so callers can write `domain::OnboardingConfig` instead of the longer path.
pub use config::{BrowserProps, OnboardingConfig, Style, UidSource, PREVIEW_UID};
pub use view::{merge_style, BrowserView, RenderedView, ViewBody};
