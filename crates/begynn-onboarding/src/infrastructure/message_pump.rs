//! Line-delimited message reader.
//!
//! A terminal host has no real page posting messages, so it reads them from
//! a stream instead, one per line:
//!
//! ```text
//! {"source":"begynn-onboarding","event":{"type":"ready","total_screens":3}}
//! !reload
//! !error net::ERR_CONNECTION_REFUSED
//! ```
//!
//! Ordinary lines go to [`OnboardingBridge::handle_message`].  Lines starting
//! with `!reload` reload the attached browser, and lines starting with
//! `!error ` report a page load failure with the rest of the line as its
//! description.  Blank lines are skipped.

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::application::component::OnboardingBridge;
use crate::application::dispatcher::MessageOutcome;

const RELOAD_PREFIX: &str = "!reload";
const ERROR_PREFIX: &str = "!error ";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PumpCommand {
    /// A raw message from the page.
    Message(String),
    Reload,
    /// A page load failure and its description.
    LoadError(String),
}

/// Parses one line.  Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<PumpCommand> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }
    if line.starts_with(RELOAD_PREFIX) {
        return Some(PumpCommand::Reload);
    }
    if let Some(description) = line.strip_prefix(ERROR_PREFIX) {
        return Some(PumpCommand::LoadError(description.to_string()));
    }
    Some(PumpCommand::Message(line.to_string()))
}

/// Counters for one pump run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub dispatched: usize,
    pub foreign: usize,
    pub rejected: usize,
    pub reloads: usize,
    pub load_errors: usize,
}

/// Feeds every line of `reader` to `bridge` until end of input.
///
/// # Errors
///
/// Returns an error only if reading from `reader` fails.  Undecodable
/// messages are reported through the bridge's `on_error` callback instead.
pub async fn pump_messages<R, V>(reader: R, bridge: &OnboardingBridge<V>) -> anyhow::Result<PumpStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = PumpStats::default();

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read message line")?
    {
        let Some(command) = parse_line(&line) else {
            continue;
        };
        match command {
            PumpCommand::Message(raw) => match bridge.handle_message(&raw) {
                MessageOutcome::Dispatched => stats.dispatched += 1,
                MessageOutcome::Foreign => stats.foreign += 1,
                MessageOutcome::Rejected => stats.rejected += 1,
            },
            PumpCommand::Reload => {
                bridge.reload();
                stats.reloads += 1;
            }
            PumpCommand::LoadError(description) => {
                bridge.handle_load_error(&description);
                stats.load_errors += 1;
            }
        }
    }

    debug!("message pump reached end of input: {stats:?}");
    Ok(stats)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
