//! Pipeline log helpers.
//!
//! Stages report progress through `log_info`, `log_success`, `log_warning`
//! and `log_error`. Each helper emits a `tracing` event tagged with its
//! [`LogLevel`] so `success` lines stay distinguishable from plain `info`.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

/// Log level as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

/// Install the global subscriber on stderr. `RUST_LOG` overrides the
/// default `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Emit a message at the given level.
pub fn log(level: LogLevel, msg: impl Into<String>) {
    let msg = msg.into();
    let kind = level.as_str();
    match level {
        LogLevel::Info | LogLevel::Success => tracing::info!(kind, "{}", msg),
        LogLevel::Warning => tracing::warn!(kind, "{}", msg),
        LogLevel::Error => tracing::error!(kind, "{}", msg),
    }
}

pub fn log_info(msg: impl Into<String>) {
    log(LogLevel::Info, msg);
}

pub fn log_success(msg: impl Into<String>) {
    log(LogLevel::Success, msg);
}

pub fn log_warning(msg: impl Into<String>) {
    log(LogLevel::Warning, msg);
}

pub fn log_error(msg: impl Into<String>) {
    log(LogLevel::Error, msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_labels() {
        assert_eq!(LogLevel::Success.as_str(), "success");
        assert_eq!(serde_json::to_string(&LogLevel::Warning).unwrap(), "\"warning\"");
    }

    #[test]
    fn test_helpers_after_repeated_init() {
        init_logging();
        init_logging();
        log_info("info line");
        log_success("success line");
        log_warning("warning line");
        log_error("error line");
    }
}
