//! Logging setup for datadeck.
//!
//! Library code only emits `tracing` events: `debug!` per derivation,
//! `info!` per report and export, `warn!` for every view or page that is
//! skipped. Installing a subscriber is left to the host application, which
//! can call [`init`] once at startup:
//!
//! ```no_run
//! datadeck::logging::init()?;
//! tracing::info!("Report service started");
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Events go to the console and to two daily-rotated files in the log
//! directory: `datadeck.<date>.log` with everything the filter lets through,
//! and `error.<date>.log` with warnings and errors only.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const APP_DIR: &str = "datadeck";
const LOG_PREFIX: &str = "datadeck";
const ERROR_PREFIX: &str = "error";
const RETAINED_FILES: usize = 10;

/// Platform data directory plus `datadeck/logs`, created if missing.
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join(APP_DIR).join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    Ok(log_dir)
}

fn daily_appender(dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(RETAINED_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to create {prefix} log appender"))
}

/// Installs the global subscriber, logging under [`get_log_dir`].
///
/// # Errors
///
/// Fails if the log directory or the file appenders cannot be created, or if
/// a global subscriber is already set.
pub fn init() -> Result<()> {
    init_in(&get_log_dir()?)
}

/// Like [`init`], but with an explicit log directory.
///
/// The level defaults to `info`; `RUST_LOG` overrides it.
pub fn init_in(log_dir: &Path) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    let console = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .pretty();

    let all_logs = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(daily_appender(log_dir, LOG_PREFIX)?);

    let error_logs = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(daily_appender(log_dir, ERROR_PREFIX)?)
        .with_filter(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(all_logs)
        .with(error_logs)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    tracing::info!("Logging initialized, log directory: {}", log_dir.display());
    Ok(())
}

/// Today's file for `prefix` inside `log_dir`. The appender rolls over on
/// UTC dates, so the name uses the UTC date too.
fn dated_log_path(log_dir: &Path, prefix: &str) -> PathBuf {
    let today = chrono::Utc::now().format("%Y-%m-%d");
    log_dir.join(format!("{prefix}.{today}.log"))
}

pub fn get_current_log_path() -> Result<PathBuf> {
    Ok(dated_log_path(&get_log_dir()?, LOG_PREFIX))
}

pub fn get_current_error_log_path() -> Result<PathBuf> {
    Ok(dated_log_path(&get_log_dir()?, ERROR_PREFIX))
}
