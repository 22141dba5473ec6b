use super::errors::{Result, WatchError};
use serde::Deserialize;
use std::path::PathBuf;

/// Everything the watch needs for one run, loaded once at startup.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub logfile: PathBuf,
    pub repo_dir: PathBuf,
    /// Base URL the page name is appended to, e.g. "https://wiki.example.com/".
    pub wiki_url: String,
    pub smtp_subject: String,
    pub smtp_from: String,
    pub smtp_to: String,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub gmail_username: String,
    pub gmail_password: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Config> {
        let file_text = std::fs::read_to_string(path).map_err(|source| WatchError::Config {
            path: path.to_string(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&file_text)?;
        Ok(config)
    }
}
