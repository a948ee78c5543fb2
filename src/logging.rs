//! tracing subscriber setup for hosts embedding the scheduler
//!
//! Filters come from [`SchedulerConfig::log_level`]. A bare level applies to this
//! crate only; a full directive is used verbatim. When `log_dir` is set, events are
//! also written to a daily rolling `recall.log` in that directory.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::SchedulerConfig;

const LOG_FILE_PREFIX: &str = "recall.log";

/// Keeps the non-blocking file writer alive; dropping it flushes pending events.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// `"debug"` becomes `"danci_recall=debug"`; directives with a target or a list
/// are kept as given.
pub fn filter_directive(log_level: &str) -> String {
    let level = log_level.trim();
    if level.is_empty() {
        return format!("{}=info", env!("CARGO_CRATE_NAME"));
    }
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("{}={level}", env!("CARGO_CRATE_NAME"))
    }
}

/// Install the global subscriber described by `config`.
///
/// Returns a guard only when a file layer was installed. If a subscriber is
/// already set the call changes nothing and returns `None`.
pub fn init_tracing(config: &SchedulerConfig) -> Option<FileLogGuard> {
    let directive = filter_directive(&config.log_level);
    let env_filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("invalid log filter {directive:?}: {err}");
        EnvFilter::new(filter_directive("info"))
    });
    let stdout_layer = fmt::layer().with_target(true);

    if let Some(log_dir) = config.log_dir.as_deref() {
        match std::fs::create_dir_all(log_dir) {
            Ok(()) => {
                let file_appender =
                    RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_target(true);

                let installed = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .try_init()
                    .is_ok();
                if installed {
                    tracing::info!(log_dir, "recall file logging enabled");
                }
                return installed.then(|| FileLogGuard { _guard: guard });
            }
            Err(err) => eprintln!("failed to create log directory {log_dir}: {err}"),
        }
    }

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init();
    None
}
