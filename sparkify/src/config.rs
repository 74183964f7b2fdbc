use crate::pipeline::error::Error;
use config::FileFormat;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, Level};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

pub const CONFIG_FILE_PATH: &str = "dwh.cfg";
const LOG_FILE_NAME: &str = "sparkify.log";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub cluster: ClusterConfig,
    pub iam_role: IamRoleConfig,
    pub s3: S3Config,
    pub runner: RunnerConfig,
    pub logger: LoggerConfig,
}

#[derive(Deserialize, Clone)]
pub struct ClusterConfig {
    pub host: String,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub db_port: u16,
    pub region: String,
    pub ssl_mode: String,
}

impl fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("host", &self.host)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_port", &self.db_port)
            .field("region", &self.region)
            .field("ssl_mode", &self.ssl_mode)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IamRoleConfig {
    pub arn: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    pub log_data: String,
    pub log_jsonpath: String,
    pub song_data: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunnerConfig {
    /// Seconds a single statement may run, `0` disables the limit.
    pub statement_timeout: u64,
}

impl RunnerConfig {
    pub fn statement_timeout(&self) -> Option<Duration> {
        if self.statement_timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(self.statement_timeout))
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggerConfig {
    pub level: String,
    pub directory: Option<String>,
    pub rotation: Option<String>,
}

impl Config {
    pub fn connect_options(&self) -> Result<PgConnectOptions, Error> {
        let ssl_mode = match self.cluster.ssl_mode.to_lowercase().as_str() {
            "disable" => PgSslMode::Disable,
            "allow" => PgSslMode::Allow,
            "prefer" => PgSslMode::Prefer,
            "require" => PgSslMode::Require,
            "verify-ca" => PgSslMode::VerifyCa,
            "verify-full" => PgSslMode::VerifyFull,
            _ => {
                return Err(Error::Setting {
                    key: "cluster.ssl_mode",
                    value: self.cluster.ssl_mode.clone(),
                })
            }
        };

        Ok(PgConnectOptions::new()
            .host(&self.cluster.host)
            .port(self.cluster.db_port)
            .database(&self.cluster.db_name)
            .username(&self.cluster.db_user)
            .password(&self.cluster.db_password)
            .ssl_mode(ssl_mode))
    }
}

pub fn read_config(path: &Path) -> Result<Config, Error> {
    let config = config::Config::builder()
        .set_default("cluster.ssl_mode", "prefer")?
        // runner
        .set_default("runner.statement_timeout", 0)?
        // logger
        .set_default("logger.level", "INFO")?
        .add_source(config::File::new(&path.to_string_lossy(), FileFormat::Ini).required(true))
        .build()?;

    Ok(config.try_deserialize()?)
}

fn logger_level(level: &str) -> Result<Level, Error> {
    match level.to_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARN" => Ok(Level::WARN),
        "ERROR" => Ok(Level::ERROR),
        _ => Err(Error::Setting {
            key: "logger.level",
            value: level.to_string(),
        }),
    }
}

fn logger_rotation(rotation: Option<&str>) -> Result<Rotation, Error> {
    match rotation.map(str::to_uppercase).as_deref() {
        None | Some("HOURLY") => Ok(Rotation::HOURLY),
        Some("MINUTELY") => Ok(Rotation::MINUTELY),
        Some("DAILY") => Ok(Rotation::DAILY),
        Some(_) => Err(Error::Setting {
            key: "logger.rotation",
            value: rotation.unwrap_or_default().to_string(),
        }),
    }
}

pub fn subscribe_logger(config: &LoggerConfig) -> Result<(), Error> {
    let level = logger_level(&config.level)?;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false);

    let result = if let Some(directory) = &config.directory {
        let rotation = logger_rotation(config.rotation.as_deref())?;
        let appender = RollingFileAppender::new(rotation, directory, LOG_FILE_NAME);
        subscriber.with_writer(appender).try_init()
    } else {
        subscriber.try_init()
    };

    // a subscriber already installed by the host process stays in place
    if let Err(e) = result {
        debug!("keeping existing tracing subscriber: {}", e);
    }
    Ok(())
}
