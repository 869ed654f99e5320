use std::path::PathBuf;

use chrono::NaiveDate;
use domain_dispatch::model::vo::BoardConfig;
use getset::Getters;
use serde::*;
use tracing::metadata::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::filter::Directive;

#[derive(Default, Deserialize, Clone, Debug, Getters)]
#[getset(get = "pub")]
pub struct DispatchConfig {
    #[serde(default)]
    board: BoardConfig,
    #[serde(default)]
    store: StoreConfig,
    #[serde(default)]
    telemetry: TelemetryConfig,
    /// First visible day; today when absent.
    #[serde(default)]
    anchor_date: Option<NaiveDate>,
}

#[derive(Default, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Rest,
    #[default]
    File,
}

#[derive(Deserialize, Clone, Debug, Getters)]
#[getset(get = "pub")]
pub struct StoreConfig {
    #[serde(default)]
    kind: StoreKind,
    #[serde(default = "StoreConfig::default_base_url")]
    base_url: String,
    #[serde(default)]
    api_key: String,
    #[serde(default = "StoreConfig::default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default = "StoreConfig::default_snapshot_path")]
    snapshot_path: PathBuf,
}

impl StoreConfig {
    fn default_base_url() -> String {
        "http://localhost:3000/rest/v1/".to_string()
    }
    fn default_timeout_secs() -> u64 {
        10
    }
    fn default_snapshot_path() -> PathBuf {
        PathBuf::from("fixtures/board.yaml")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: Default::default(),
            base_url: Self::default_base_url(),
            api_key: Default::default(),
            timeout_secs: Self::default_timeout_secs(),
            snapshot_path: Self::default_snapshot_path(),
        }
    }
}

/// Log output. Console logs go to stderr so the board stays readable.
#[derive(Deserialize, Clone, Debug)]
pub struct TelemetryConfig {
    #[serde(default = "default_enabled")]
    pub enable: bool,
    #[serde(default)]
    pub max_level: LoggingLevel,
    /// Extra `EnvFilter` directives, e.g. `service_dispatch=debug`.
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub file: FileConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable: default_enabled(),
            max_level: Default::default(),
            filter: Default::default(),
            file: Default::default(),
        }
    }
}

#[derive(Default, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoggingLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl From<LoggingLevel> for LevelFilter {
    fn from(val: LoggingLevel) -> Self {
        match val {
            LoggingLevel::Error => LevelFilter::ERROR,
            LoggingLevel::Warn => LevelFilter::WARN,
            LoggingLevel::Info => LevelFilter::INFO,
            LoggingLevel::Debug => LevelFilter::DEBUG,
            LoggingLevel::Trace => LevelFilter::TRACE,
            LoggingLevel::Off => LevelFilter::OFF,
        }
    }
}

impl From<LoggingLevel> for Directive {
    fn from(val: LoggingLevel) -> Self {
        let level: LevelFilter = val.into();
        level.into()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct FileConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub rolling_time: RotationLevel,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enable: Default::default(),
            path: default_path(),
            prefix: default_prefix(),
            rolling_time: Default::default(),
        }
    }
}

#[derive(Default, Deserialize, Clone, Copy, Debug)]
pub enum RotationLevel {
    #[default]
    Daily,
    Hourly,
    Never,
}

impl From<RotationLevel> for Rotation {
    fn from(val: RotationLevel) -> Self {
        match val {
            RotationLevel::Daily => Rotation::DAILY,
            RotationLevel::Hourly => Rotation::HOURLY,
            RotationLevel::Never => Rotation::NEVER,
        }
    }
}

fn default_enabled() -> bool {
    true
}
fn default_path() -> String {
    "./logs".to_string()
}
fn default_prefix() -> String {
    "dispatch-board.log".to_string()
}

/// `config.yaml` in the working directory, then every yaml path on the
/// command line, then `DISPATCH__*` environment variables.
pub fn build_config() -> anyhow::Result<config::Config> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = config::Config::builder().add_source(
        config::File::with_name("config")
            .required(false)
            .format(config::FileFormat::Yaml),
    );
    for arg in args {
        if arg.ends_with("yaml") || arg.ends_with("yml") {
            config = config.add_source(
                config::File::from(std::path::Path::new(arg.as_str()))
                    .format(config::FileFormat::Yaml)
                    .required(false),
            );
        }
    }
    config = config.add_source(
        config::Environment::with_prefix("DISPATCH")
            .separator("__")
            .try_parsing(true),
    );
    Ok(config.build()?)
}
