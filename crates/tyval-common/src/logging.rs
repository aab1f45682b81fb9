//! `tracing` bootstrap for the CLI binary.
//!
//! Library crates never call this; they only emit `tracing::debug!`/`trace!`
//! events and assume a subscriber has already been installed by the binary.

use tracing_subscriber::EnvFilter;

/// Verbosity requested on the command line, mapped to a `tracing` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    fn default_filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info,tyval=debug",
            Verbosity::Debug => "debug,tyval=trace",
        }
    }
}

/// Installs a global `tracing` subscriber honoring `RUST_LOG` when set,
/// falling back to the verbosity derived from CLI flags.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.default_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
