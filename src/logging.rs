//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
//! The TUI owns the terminal, so while it runs logs go to a file or
//! nowhere.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    Off,
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "grant_swipe=debug" } else { "warn" })
    })
}

/// Install the global subscriber. Calling it twice is harmless: the
/// second install is ignored.
pub fn init_logging(target: &LogTarget, verbose: bool) -> io::Result<()> {
    let result = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter(verbose))
            .with_writer(io::stderr)
            .with_target(false)
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter(verbose))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    // Already initialised (tests, repeated calls): keep the first one.
    if let Err(e) = result {
        debug!(error = %e, "tracing subscriber already installed");
    }
    Ok(())
}
