//! Shared observability helpers for the binary and integration tests.
//!
//! The logging initializer centralises our `tracing` setup. Diagnostics always
//! go to `stderr`; when a log directory is configured the same events are also
//! written to a daily rolling file. Call [`init_logging`] once near process
//! start. Additional callers are treated as no-ops.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_INIT: OnceLock<Option<PathBuf>> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Output encoding for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Logical name of the component (used for file names).
    pub app_name: &'static str,
    /// Optional directory for a rolling log file. `stderr` only when `None`.
    pub log_dir: Option<PathBuf>,
    /// Preferred log encoding.
    pub format: LogFormat,
    /// Default filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "promo",
            log_dir: None,
            format: LogFormat::Text,
            default_filter: "info",
        }
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Returns the log file path for the current day when a file sink was
/// configured. Subsequent calls hand back the originally resolved value.
pub fn init_logging(config: LogConfig) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = LOG_INIT.get() {
        return Ok(path.clone());
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    let stderr_layer: BoxedLayer = match config.format {
        LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    let mut layers = vec![stderr_layer];
    let mut file_path = None;

    if let Some(dir) = config.log_dir.as_deref() {
        let resolved_dir = expand_home(dir);
        std::fs::create_dir_all(&resolved_dir).with_context(|| {
            format!("failed to create log directory: {}", resolved_dir.display())
        })?;

        let log_filename = format!("{}.log", config.app_name);
        let today = Local::now().format("%Y-%m-%d").to_string();
        file_path = Some(resolved_dir.join(format!("{log_filename}.{today}")));

        let appender = rolling::daily(&resolved_dir, log_filename);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);

        let file_layer: BoxedLayer = match config.format {
            LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        };
        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_INIT.set(file_path.clone());
    Ok(file_path)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_leaves_plain_paths_alone() {
        let p = Path::new("/var/log/promo");
        assert_eq!(expand_home(p), PathBuf::from("/var/log/promo"));
    }

    #[test]
    fn file_sink_is_created_and_reported_once() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        let config = LogConfig {
            app_name: "promo-tests",
            log_dir: Some(dir.clone()),
            default_filter: "debug",
            ..LogConfig::default()
        };

        let first = init_logging(config.clone()).unwrap();
        assert!(dir.is_dir());
        let path = first.expect("file sink configured");
        assert!(path.starts_with(&dir));

        // Second call is a no-op and returns the same answer.
        let second = init_logging(LogConfig::default()).unwrap();
        assert_eq!(second, Some(path));
    }
}
