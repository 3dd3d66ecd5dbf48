//! Begynn onboarding terminal host: entry point.
//!
//! This binary mounts one onboarding component against a headless browser
//! and plays the part of the page through stdin.  It is useful for checking
//! what a flow posts, or for wiring a non-graphical host into a pipeline.
//!
//! # Usage
//!
//! ```text
//! begynn-onboarding --placement-id <ID> [OPTIONS]
//!
//! Options:
//!   --placement-id <ID>    Onboarding flow to load (required)
//!   --uid <UID>            Use this identifier instead of the stored one
//!   --preview              Render with the preview identifier
//!   --base-url <URL>       Flow host [default: https://begynn.com]
//!   --debug                Log every event, parse failure and browser error
//!   --store-path <PATH>    Identifier store file [default: platform dir]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable              | Flag             |
//! |-----------------------|------------------|
//! | `BEGYNN_PLACEMENT_ID` | `--placement-id` |
//! | `BEGYNN_UID`          | `--uid`          |
//! | `BEGYNN_PREVIEW`      | `--preview`      |
//! | `BEGYNN_BASE_URL`     | `--base-url`     |
//! | `BEGYNN_DEBUG`        | `--debug`        |
//! | `BEGYNN_STORE_PATH`   | `--store-path`   |
//!
//! # I/O contract
//!
//! - stdout line 1: the render URL.
//! - stdout after that: one JSON object per event the page posted.
//! - stdin: one raw page message per line, or `!reload`, or
//!   `!error <description>` (see `infrastructure::message_pump`).
//! - stderr: logs.
//!
//! The process exits at end of input or on Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use begynn_core::DEFAULT_BASE_URL;
use begynn_onboarding::application::{
    EventCallbacks, KeyValueStore, MemoryStore, OnboardingBridge,
};
use begynn_onboarding::domain::{OnboardingConfig, UidSource};
use begynn_onboarding::infrastructure::{pump_messages, FileStore, HeadlessBrowser};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Begynn onboarding terminal host.
#[derive(Debug, Parser)]
#[command(
    name = "begynn-onboarding",
    about = "Mounts a Begynn onboarding flow and reports its events as JSON lines",
    version
)]
struct Cli {
    /// Identifier of the onboarding flow to load.
    #[arg(long, env = "BEGYNN_PLACEMENT_ID")]
    placement_id: String,

    /// Installation identifier to use instead of the persisted one.
    #[arg(long, env = "BEGYNN_UID", conflicts_with = "preview")]
    uid: Option<String>,

    /// Render in preview mode.  The identifier store is never touched.
    #[arg(long, env = "BEGYNN_PREVIEW")]
    preview: bool,

    /// Host serving the onboarding flows, without a trailing slash.
    #[arg(long, default_value = DEFAULT_BASE_URL, env = "BEGYNN_BASE_URL")]
    base_url: String,

    /// Log every received event, parse failure and browser error.
    #[arg(long, env = "BEGYNN_DEBUG")]
    debug: bool,

    /// Where to persist the installation identifier.
    #[arg(long, env = "BEGYNN_STORE_PATH")]
    store_path: Option<PathBuf>,
}

impl Cli {
    fn uid_source(&self) -> UidSource {
        if self.preview {
            return UidSource::Preview;
        }
        match &self.uid {
            Some(uid) if !uid.is_empty() => UidSource::Provided(uid.clone()),
            _ => UidSource::Resolve,
        }
    }

    /// Converts the parsed CLI arguments into an [`OnboardingConfig`].
    fn to_config(&self) -> OnboardingConfig {
        OnboardingConfig::new(self.placement_id.clone(), self.uid_source())
            .with_base_url(self.base_url.clone())
            .with_debug(self.debug)
    }

    /// Picks the identifier store: `--store-path` if given, else the
    /// platform default, else memory only.
    fn identifier_store(&self) -> Arc<dyn KeyValueStore> {
        if let Some(path) = &self.store_path {
            return Arc::new(FileStore::new(path));
        }
        match FileStore::at_default_path() {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!("{e}; the installation identifier will not persist");
                Arc::new(MemoryStore::new())
            }
        }
    }
}

/// Callbacks for the terminal host: events to stdout, everything else to
/// the log.
fn host_callbacks() -> EventCallbacks {
    EventCallbacks::new()
        .on_event(|event| match event.to_value() {
            Ok(value) => println!("{value}"),
            Err(e) => warn!("could not serialise event: {e}"),
        })
        .on_complete(|e| {
            info!(
                "onboarding complete after {} ms ({} screens)",
                e.total_duration_ms, e.screens_viewed
            )
        })
        .on_exit(|e| {
            info!(
                "onboarding exited at {} ({:.0}%)",
                e.last_screen_id, e.progress_percentage
            )
        })
        .on_error(|e| warn!("{e}"))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // RUST_LOG wins when set.  Logs go to stderr so stdout stays parseable.
    let fallback = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.to_config();
    let mut bridge: OnboardingBridge = OnboardingBridge::new(config, host_callbacks());
    if bridge.config().uid_source == UidSource::Resolve {
        bridge = bridge.with_identifier_store(cli.identifier_store());
    }

    // ── Mount ─────────────────────────────────────────────────────────────────
    bridge.mount().await;
    let view = bridge.render();
    let browser_view = view
        .browser()
        .context("onboarding component did not become ready")?;

    info!("begynn onboarding host starting: {}", browser_view.url);
    println!("{}", browser_view.url);

    let browser = Arc::new(HeadlessBrowser::for_view(browser_view));
    bridge.attach_browser(Box::new(Arc::clone(&browser)));

    // ── Message loop ──────────────────────────────────────────────────────────
    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = pump_messages(stdin, &bridge) => {
            let stats = result?;
            info!("end of input: {stats:?}");
        }
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        },
    }

    info!(
        "begynn onboarding host stopped after {} reload(s)",
        browser.reload_count()
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_placement_id() {
        let result = Cli::try_parse_from(["begynn-onboarding"]);
        // BEGYNN_PLACEMENT_ID may be set in the environment running the tests.
        if std::env::var_os("BEGYNN_PLACEMENT_ID").is_none() {
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_cli_defaults() {
        // Arrange / Act
        let cli = Cli::parse_from(["begynn-onboarding", "--placement-id", "welcome"]);

        // Assert
        assert_eq!(cli.placement_id, "welcome");
        assert_eq!(cli.base_url, "https://begynn.com");
        assert!(!cli.preview);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_without_uid_resolves() {
        let cli = Cli::parse_from(["begynn-onboarding", "--placement-id", "p"]);
        assert_eq!(cli.uid_source(), UidSource::Resolve);
    }

    #[test]
    fn test_cli_uid_is_provided() {
        let cli = Cli::parse_from(["begynn-onboarding", "--placement-id", "p", "--uid", "user-9"]);
        assert_eq!(cli.uid_source(), UidSource::Provided("user-9".to_string()));
    }

    #[test]
    fn test_cli_preview_flag() {
        let cli = Cli::parse_from(["begynn-onboarding", "--placement-id", "p", "--preview"]);
        assert_eq!(cli.uid_source(), UidSource::Preview);
    }

    #[test]
    fn test_cli_uid_conflicts_with_preview() {
        let result = Cli::try_parse_from([
            "begynn-onboarding",
            "--placement-id",
            "p",
            "--preview",
            "--uid",
            "u",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_to_config_carries_flags() {
        // Arrange
        let cli = Cli::parse_from([
            "begynn-onboarding",
            "--placement-id",
            "flow 1",
            "--uid",
            "u/1",
            "--base-url",
            "http://localhost:3000",
            "--debug",
        ]);

        // Act
        let config = cli.to_config();

        // Assert
        assert_eq!(config.placement_id, "flow 1");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert!(config.debug);
    }

    #[test]
    fn test_cli_store_path_selects_file_store() {
        let cli = Cli::parse_from([
            "begynn-onboarding",
            "--placement-id",
            "p",
            "--store-path",
            "/tmp/begynn-test/store.toml",
        ]);
        assert_eq!(
            cli.store_path.as_deref(),
            Some(std::path::Path::new("/tmp/begynn-test/store.toml"))
        );
    }
}
