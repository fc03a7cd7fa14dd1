//! `tracing-subscriber` setup.

use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verbosity {
    Verbose,
    Quiet,
    Default,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Verbosity::Verbose,
            (false, true) => Verbosity::Quiet,
            (false, false) => Verbosity::Default,
        }
    }
}

/// Filter for the given flags.
///
/// `-v`/`-q` win; otherwise `RUST_LOG` if set, else `default_level`.
pub fn filter(verbosity: Verbosity, default_level: &str) -> EnvFilter {
    match verbosity {
        Verbosity::Verbose => EnvFilter::new("debug"),
        Verbosity::Quiet => EnvFilter::new("warn"),
        Verbosity::Default => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
        }
    }
}

/// Install the global subscriber.  A second call is a no-op.
pub fn init(verbosity: Verbosity, default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity, default_level))
        .with_target(false)
        .try_init();
}
