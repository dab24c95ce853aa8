//! File-based logging for Flixter
//!
//! The TUI owns the terminal, so everything goes to a daily rolling file
//! under `.logs/` (or `FLIXTER_LOG_DIR`). TMDB calls are logged through
//! [`log_api_request!`] and [`log_api_result!`], which record the endpoint,
//! the HTTP status of failures and how long the call took.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const DEFAULT_LOG_DIR: &str = ".logs";
const LOG_DIR_VAR: &str = "FLIXTER_LOG_DIR";
const LOG_FILE_PREFIX: &str = "flixter";
const LOG_FILE_SUFFIX: &str = "log";
const DEFAULT_FILTER: &str = "flixter=debug,reqwest=info,hyper=warn,warn";

/// Initialize the logging system.
///
/// Logs land in `<dir>/flixter.YYYY-MM-DD.log`. `RUST_LOG` replaces the
/// default filter (`flixter` at DEBUG, `reqwest` at INFO, the rest at WARN);
/// a filter that does not parse falls back to the default.
pub fn init_logging() -> anyhow::Result<()> {
    let log_dir = log_dir(std::env::var(LOG_DIR_VAR).ok().as_deref());
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes on drop, so it has to outlive every log call
    Box::leak(Box::new(guard));

    let requested = std::env::var("RUST_LOG").ok();
    let directives = filter_directives(requested.as_deref());
    let (filter, rejected) = match EnvFilter::try_new(directives) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_FILTER), Some(e)),
    };

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    if let Some(e) = rejected {
        tracing::warn!(error = %e, "Ignoring invalid RUST_LOG, using default filter");
    }
    tracing::info!(dir = %log_dir.display(), "Logging initialized");

    Ok(())
}

fn log_dir(configured: Option<&str>) -> PathBuf {
    match configured.map(str::trim) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_LOG_DIR),
    }
}

fn filter_directives(requested: Option<&str>) -> &str {
    match requested.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives,
        _ => DEFAULT_FILTER,
    }
}

/// Log the start of a TMDB call and evaluate to the `Instant` it started at
#[macro_export]
macro_rules! log_api_request {
    ($operation:expr, $endpoint:expr) => {{
        tracing::debug!(operation = $operation, endpoint = %$endpoint, "TMDB request started");
        std::time::Instant::now()
    }};
    ($operation:expr, $endpoint:expr, $($field:tt)*) => {{
        tracing::debug!(operation = $operation, endpoint = %$endpoint, $($field)*, "TMDB request started");
        std::time::Instant::now()
    }};
}

/// Log how a TMDB call ended; failures carry the HTTP status when there is one
#[macro_export]
macro_rules! log_api_result {
    ($operation:expr, $endpoint:expr, $started:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(
                operation = $operation,
                endpoint = %$endpoint,
                elapsed_ms = $started.elapsed().as_millis() as u64,
                "TMDB request succeeded"
            ),
            Err(e) => tracing::error!(
                operation = $operation,
                endpoint = %$endpoint,
                status = ?e.status(),
                elapsed_ms = $started.elapsed().as_millis() as u64,
                error = %e,
                "TMDB request failed"
            ),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_override() {
        assert_eq!(log_dir(None), PathBuf::from(".logs"));
        assert_eq!(log_dir(Some("  ")), PathBuf::from(".logs"));
        assert_eq!(log_dir(Some("/tmp/flixter")), PathBuf::from("/tmp/flixter"));
    }

    #[test]
    fn rust_log_replaces_default_filter() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("")), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("flixter=trace")), "flixter=trace");
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
