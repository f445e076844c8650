//! Console and rolling-file log output.

use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;
use crate::error::AppError;

/// Used when `RUST_LOG` is unset. Gateway chatter from serenity stays at warn.
const DEFAULT_FILTER: &str = "guildkeeper=info,serenity=warn,poise=warn";

/// Installs the global subscriber: ANSI output on stdout plus one plain log
/// file per day under `config.logs_path`, keeping the last week.
pub fn setup_logging(config: &Config) -> Result<(), AppError> {
    let file_writer = daily_file_writer(config)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout).with_ansi(true))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .map_err(|e| AppError::ConfigurationError {
            msg: format!("Failed to install log subscriber: {}", e),
        })
}

fn daily_file_writer(config: &Config) -> Result<NonBlocking, AppError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("guildkeeper")
        .filename_suffix("log")
        .max_log_files(7)
        .build(&config.logs_path)
        .map_err(|e| AppError::ConfigurationError {
            msg: format!(
                "Cannot write logs to '{}': {}",
                config.logs_path.display(),
                e
            ),
        })?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Dropping the guard stops the background flusher.
    std::mem::forget(guard);
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_path_pointing_at_a_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("guildkeeper-log-{}", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"not a directory").unwrap();

        let mut config = Config::new();
        config.logs_path = path.clone();
        let err = daily_file_writer(&config).err();
        assert!(matches!(err, Some(AppError::ConfigurationError { .. })));

        std::fs::remove_file(path).unwrap();
    }
}
