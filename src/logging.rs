use std::path::PathBuf;

use tokio::sync::RwLock;
use tracing::{debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::error::StartupError;

fn env_filter() -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
}

fn do_init(log_dir: Option<PathBuf>) -> Result<(), StartupError> {
    let mut message = String::from("Logging with: stdout");

    let stdout_layer = tracing_subscriber::fmt::layer().with_filter(env_filter());

    let registry = tracing_subscriber::registry().with(stdout_layer);

    let maybe_file_layer = if let Some(output_dir) = log_dir {
        message += &format!(", file (in dir {output_dir:?})");

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("users.log")
            .build(output_dir)?;

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_filter(env_filter());
        Some(file_layer)
    } else {
        None
    };

    registry.with(maybe_file_layer).init();

    debug!(message);

    Ok(())
}

/// Initialize tracing.
///
/// Will only initialize once, so tests may call this.
/// Only the first successful call decides where logs go:
/// `log_dir` is ignored once logging is up.
///
/// Fails if `log_dir` can't be used as a log directory,
/// in which case nothing is initialized and a later call may try again.
pub async fn init(log_dir: Option<PathBuf>) -> Result<(), StartupError> {
    static TRACING_IS_INITIALIZED: RwLock<bool> = RwLock::const_new(false);

    let initialized = { *TRACING_IS_INITIALIZED.read().await };

    if !initialized {
        let mut initialized = TRACING_IS_INITIALIZED.write().await;

        // To avoid race condition between the `.read()` and the
        // `.write()`.
        if *initialized {
            return Ok(());
        }

        do_init(log_dir)?;

        *initialized = true;
    }

    info!("Logging initialized");

    Ok(())
}
