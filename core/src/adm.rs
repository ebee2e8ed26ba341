//! The administrative command channel.
//!
//! Every cache instance exposes one write-only `adm` file accepting a flat
//! `key=value,key=value` line; the two global register/unregister files speak
//! the same protocol. Values are written verbatim — no escaping exists in the
//! line format, so callers must never pass values containing `,` or `=`
//! (paths on the control plane are delimiter-free by construction).
//!
//! Writes to the channel are the only retried operation in the system.
//! Reads are never retried: a transient read failure during discovery is
//! treated as authoritative absence.

use std::fmt::Display;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::errors::{PcacheError, Result};
use crate::sysfs;

/// Bounded retry for channel writes.
pub const ADM_RETRY_ATTEMPTS: u32 = 3;
/// Fixed delay between channel write attempts.
pub const ADM_RETRY_DELAY: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// AdmCommand
// ---------------------------------------------------------------------------

/// A structured administrative command, rendered to the channel line
/// protocol on send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmCommand {
    pairs: Vec<(String, String)>,
}

impl AdmCommand {
    /// A command with an operation key, e.g. `op=dev-start`.
    pub fn op(name: &str) -> Self {
        AdmCommand {
            pairs: vec![("op".into(), name.into())],
        }
    }

    /// A bare command with no operation key (the global register and
    /// unregister channels take only parameters).
    pub fn bare() -> Self {
        AdmCommand { pairs: Vec::new() }
    }

    /// Append one `key=value` pair.
    pub fn arg(mut self, key: &str, value: impl Display) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Render the comma-joined command line. No trailing newline.
    pub fn render(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ---------------------------------------------------------------------------
// CommandChannel
// ---------------------------------------------------------------------------

/// A write handle to one channel file.
#[derive(Debug, Clone)]
pub struct CommandChannel {
    path: PathBuf,
}

impl CommandChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CommandChannel { path: path.into() }
    }

    /// Write the command once. Failures keep the underlying taxonomy: a
    /// missing channel is `NotFound`, any other write failure `Io`.
    pub fn send(&self, cmd: &AdmCommand) -> Result<()> {
        sysfs::write_attr(&self.path, &cmd.render())
    }

    /// Write the command with bounded retry: up to [`ADM_RETRY_ATTEMPTS`]
    /// attempts with a fixed [`ADM_RETRY_DELAY`] between them. Exhausting
    /// the budget wraps the last observed error as `CommandFailed`.
    pub fn send_with_retry(&self, cmd: &AdmCommand) -> Result<()> {
        retry_send(ADM_RETRY_ATTEMPTS, ADM_RETRY_DELAY, || self.send(cmd)).map_err(|e| {
            PcacheError::CommandFailed {
                command: cmd.render(),
                reason: e.to_string(),
            }
        })
    }
}

/// Run `attempt` up to `attempts` times, sleeping `delay` between failures,
/// and return the last error once the budget is exhausted.
pub(crate) fn retry_send<F>(attempts: u32, delay: Duration, mut attempt: F) -> Result<()>
where
    F: FnMut() -> Result<()>,
{
    for i in 1..=attempts {
        match attempt() {
            Ok(()) => return Ok(()),
            Err(e) if i == attempts => return Err(e),
            Err(_) => thread::sleep(delay),
        }
    }
    Err(PcacheError::InvalidArgument(
        "retry budget of zero attempts".into(),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
