//! Logging bootstrap
//!
//! Diagnostics go through `tracing`; user-facing messages stay on the
//! colored output helpers.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only
    #[default]
    Normal,
    /// Debug and above
    Debug,
}

impl Verbosity {
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug { Self::Debug } else { Self::Normal }
    }

    pub fn to_level(&self) -> Level {
        match self {
            Self::Normal => Level::WARN,
            Self::Debug => Level::DEBUG,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over
/// `verbosity`; calling this more than once is harmless.
pub fn init_logging(verbosity: Verbosity) {
    let default_filter = format!("fengshui={}", verbosity.to_level());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flag() {
        assert_eq!(Verbosity::from_debug_flag(false), Verbosity::Normal);
        assert_eq!(Verbosity::from_debug_flag(true), Verbosity::Debug);
        assert_eq!(Verbosity::Debug.to_level(), Level::DEBUG);
    }

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging(Verbosity::Normal);
        init_logging(Verbosity::Debug);
    }
}
