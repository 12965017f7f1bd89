//! Logging setup for hosts embedding the graph engine.
//!
//! The library itself only emits `tracing` events (rebuild summaries at
//! `info`, skipped files and cache decisions at `debug`). Hosts that don't
//! install their own subscriber can call one of these functions.

use std::sync::Once;

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    /// Filter directive scoped to this crate, e.g. `ripple_graph=debug`.
    pub fn directive(&self) -> String {
        format!("ripple_graph={}", self.as_filter())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter())
    }
}

fn install(filter: EnvFilter) {
    // try_init: a host may already own the global subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).without_time())
        .try_init();
}

/// Install a global subscriber logging this crate at `level` and everything
/// else at `warn`. Other `RUST_LOG` directives are kept. Only the first call
/// in a process has any effect.
pub fn init_logging(level: LogLevel) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy();
        if let Ok(directive) = level.directive().parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
        install(filter);
    });
}

/// Install a global subscriber configured from `RUST_LOG`, falling back to
/// `info` when it is unset or invalid.
pub fn init_logging_from_env() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.directive()));
        install(filter);
    });
}
