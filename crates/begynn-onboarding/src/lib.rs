//! begynn-onboarding library crate.
//!
//! This crate provides an embeddable onboarding component.  It points an
//! embedded browser at a hosted Begynn onboarding flow and turns the JSON
//! messages posted by that flow into typed callbacks for the host app.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Hosted web content (JSON strings over the browser message channel)
//!         ↕
//! [begynn-onboarding]
//!   ├── domain/           Pure types: OnboardingConfig, render output
//!   ├── application/      Identifier resolution, event dispatch, component
//!   └── infrastructure/
//!         ├── storage/       File-backed and in-memory key-value stores
//!         ├── headless/      Terminal-hosted embedded browser
//!         └── message_pump/  Line-delimited message reader
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `begynn-core`; storage and the
//!   browser are reached only through the `KeyValueStore` and
//!   `EmbeddedBrowser` traits.
//! - `infrastructure` depends on all other layers plus `tokio` and `toml`.
//!
//! # Quick start
//!
//! ```rust
//! use begynn_onboarding::application::{EventCallbacks, OnboardingBridge};
//! use begynn_onboarding::domain::{OnboardingConfig, UidSource};
//!
//! let callbacks = EventCallbacks::new()
//!     .on_complete(|event| println!("done in {} ms", event.total_duration_ms));
//! let config = OnboardingConfig::new("welcome", UidSource::Provided("user-42".into()));
//! let bridge: OnboardingBridge = OnboardingBridge::new(config, callbacks);
//!
//! assert_eq!(
//!     bridge.url(),
//!     Some("https://begynn.com/render/welcome?uid=user-42")
//! );
//! ```

/// Domain layer: configuration and render output types (no I/O).
pub mod domain;

/// Application layer: identifier resolution, dispatch, and the component.
pub mod application;

/// Infrastructure layer: storage backends, headless browser, message pump.
pub mod infrastructure;
