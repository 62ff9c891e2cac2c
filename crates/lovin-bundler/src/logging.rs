//! Subscriber setup for binaries embedding the build pipeline.
//!
//! Only compiled with the `logging` feature. Libraries should install their
//! own subscriber; the crates only emit `tracing` events.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Environment variable read by [`init_logging_from_env`].
pub const LOG_ENV: &str = "LOVIN_LOG";

/// Crates whose events the level applies to. Everything else stays at warn.
const LOVIN_TARGETS: &[&str] = &[
    "lovin_bundler",
    "lovin_config",
    "lovin_plugin_css",
    "lovin_plugin_js",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    /// Stage progress and written files.
    #[default]
    Info,
    /// Skipped stages, vendor inclusion, manifest locking.
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Filter directives: `warn` globally, this level for the lovin crates.
    pub fn directives(&self) -> String {
        if *self == LogLevel::Silent {
            return "off".to_string();
        }

        let mut directives = vec!["warn".to_string()];
        directives.extend(
            LOVIN_TARGETS
                .iter()
                .map(|target| format!("{}={}", target, self.as_str())),
        );
        directives.join(",")
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silent" | "off" | "quiet" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install a compact stderr subscriber at `level`.
///
/// Only the first call in a process has any effect.
///
/// ```rust,no_run
/// use lovin_bundler::logging::{LogLevel, init_logging};
///
/// init_logging(LogLevel::Debug);
/// ```
pub fn init_logging(level: LogLevel) {
    install(EnvFilter::new(level.directives()));
}

/// Install a subscriber configured by `LOVIN_LOG`.
///
/// The variable takes either a plain level (`debug`) or full filter
/// directives (`lovin_bundler=trace,warn`). Unset or empty means
/// [`LogLevel::Info`].
pub fn init_logging_from_env() {
    let filter = match std::env::var(LOG_ENV) {
        Ok(value) if !value.trim().is_empty() => match value.parse::<LogLevel>() {
            Ok(level) => EnvFilter::new(level.directives()),
            Err(_) => EnvFilter::new(value),
        },
        _ => EnvFilter::new(LogLevel::Info.directives()),
    };
    install(filter);
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init();
    });
}
