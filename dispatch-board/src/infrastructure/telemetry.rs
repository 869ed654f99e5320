use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{Layer, Registry};

use super::config::TelemetryConfig;

fn filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.max_level.into())
        .parse_lossy(config.filter.as_str())
}

/// Installs the global subscriber: stderr always, a rolling file when enabled.
pub fn initialize_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    if !config.enable {
        return Ok(());
    }
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter(config));
    let file = {
        let file_config = &config.file;
        if file_config.enable {
            let file_appender = RollingFileAppender::new(
                file_config.rolling_time.into(),
                &file_config.path,
                &file_config.prefix,
            );
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(file_appender)
                    .with_filter(filter(config)),
            )
        } else {
            None
        }
    };
    Registry::default().with(console).with(file).try_init()?;
    Ok(())
}
