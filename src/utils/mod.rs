//! Utilities: logging setup (tracing subscriber, level from flags or RUST_LOG)
//! and plain-text rendering of values.
//!
//! Key items:
//!   init_logging / derive_level / level_from_args
//!   output::display_value

/// Logging helpers.
pub mod logging {
    use std::ffi::OsStr;
    use tracing_subscriber::EnvFilter;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
    pub enum LogLevel {
        Error = 0,
        Info = 1,
        Debug = 2,
        Trace = 3,
    }

    impl LogLevel {
        pub fn as_str(&self) -> &'static str {
            match self {
                LogLevel::Error => "error",
                LogLevel::Info => "info",
                LogLevel::Debug => "debug",
                LogLevel::Trace => "trace",
            }
        }
    }

    pub fn derive_level(debug: bool, quiet: bool) -> LogLevel {
        if quiet {
            return LogLevel::Error;
        }
        if debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    /// Level picked from the `--debug` / `--quiet` switches among the leading
    /// option tokens, before the subcommand name. Lets logging start ahead of
    /// command registration and parsing.
    pub fn level_from_args<S: AsRef<OsStr>>(args: &[S]) -> LogLevel {
        let leading = args
            .iter()
            .map(|a| -> &OsStr { a.as_ref() })
            .take_while(|a| a.to_str().is_some_and(|s| s.starts_with('-') && s != "--"));
        let (mut debug, mut quiet) = (false, false);
        for arg in leading {
            debug |= arg == "--debug";
            quiet |= arg == "--quiet";
        }
        derive_level(debug, quiet)
    }

    /// Install the global subscriber on stderr. `RUST_LOG` wins over `level`.
    /// A second call is a no-op.
    pub fn init_logging(level: LogLevel) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }
}

pub use logging::{derive_level, init_logging, level_from_args};

/// Output related helpers.
pub mod output {
    use serde_json::Value;

    /// Render a value for humans: strings without quotes, `null` as-is,
    /// everything else as compact JSON.
    pub fn display_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Render a handler result for stdout: strings raw, other values as pretty JSON.
    pub fn render_result(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}
