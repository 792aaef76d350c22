use std::str::FromStr;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

use crate::settings::Config;

/// Install the global tracing subscriber.
///
/// Logs go to a daily rolling file when `log_dir` is configured, otherwise to
/// stdout. The returned guard must be held for the lifetime of the process so
/// buffered file logs are flushed.
pub fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let log_level = config
        .log_level
        .as_deref()
        .and_then(|val| Level::from_str(val).ok())
        .unwrap_or(Level::DEBUG);

    match &config.log_dir {
        Some(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "app.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_writer(non_blocking)
                .with_max_level(log_level)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_max_level(log_level).init();
            None
        }
    }
}
