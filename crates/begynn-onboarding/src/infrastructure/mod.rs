//! Infrastructure layer for begynn-onboarding.
//!
//! Concrete implementations of the application layer's traits, plus the
//! plumbing the terminal host needs:
//!
//! - `storage`       – TOML-file [`KeyValueStore`](crate::application::KeyValueStore)
//! - `headless`      – windowless [`EmbeddedBrowser`](crate::application::EmbeddedBrowser)
//! - `message_pump`  – feeds line-delimited messages into the component

pub mod headless;
pub mod message_pump;
pub mod storage;

pub use headless::HeadlessBrowser;
pub use message_pump::{parse_line, pump_messages, PumpCommand, PumpStats};
pub use storage::{default_store_path, FileStore, STORE_FILE_NAME};
