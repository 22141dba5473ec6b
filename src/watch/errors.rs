use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WatchError>;

/// Fatal errors. Anything in here terminates the run with a non-zero status;
/// per-email failures live in [`crate::watch::mailer::NotifyError`] instead.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("config error: could not read config file '{path}' - {source}")]
    Config { path: String, source: std::io::Error },
    #[error("log error: could not write log file '{path}' - {source}")]
    Log { path: PathBuf, source: std::io::Error },
    #[error("runfile error: could not write runfile '{path}' - {source}")]
    RunState { path: PathBuf, source: std::io::Error },
    #[error("time delta less than zero (last run {lastrun}, now {now}) - did the system time change?")]
    ClockRegression { lastrun: i64, now: i64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}
