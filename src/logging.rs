use std::path::PathBuf;
use std::sync::{Once, OnceLock};

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Structured logging backed by `tracing`.
///
/// Installs a global subscriber once: stderr output for the interactive
/// session plus a daily-rotated file sink under the user's data directory.
/// Stdout is left to the chat transcript.

static INIT_LOGGING: Once = Once::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "mongo-chat.log";

pub fn resolve_log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("mongo-chat")
        .join("logs")
}

fn build_file_appender() -> Option<(RollingFileAppender, PathBuf)> {
    let log_dir = resolve_log_dir();
    if let Err(err) = std::fs::create_dir_all(&log_dir) {
        eprintln!(
            "[mongo-chat][WARN] Failed to create log directory {}: {}",
            log_dir.display(),
            err
        );
        return None;
    }

    Some((RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX), log_dir))
}

fn build_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(std::env::var("MONGO_CHAT_LOG_LEVEL").unwrap_or_else(|_| "info".into()))
        })
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let (file_layer, log_dir) = if let Some((appender, dir)) = build_file_appender() {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(non_blocking);
            LOG_GUARD.set(guard).ok();
            (Some(layer), Some(dir))
        } else {
            (None, None)
        };

        let stderr_layer = fmt::layer()
            .with_target(true)
            .with_ansi(true)
            .with_timer(UtcTime::rfc_3339())
            .with_writer(std::io::stderr);

        let registry = tracing_subscriber::registry().with(build_filter()).with(stderr_layer);
        if let Some(file_layer) = file_layer {
            registry.with(file_layer).init();
        } else {
            registry.init();
        }

        match log_dir {
            Some(dir) => info!(
                target: "mongo_chat",
                "Structured logging initialized; logs rotate daily under {}",
                dir.display()
            ),
            None => warn!(target: "mongo_chat", "Structured logging initialized without file sink (stderr only)"),
        }
    });
}
