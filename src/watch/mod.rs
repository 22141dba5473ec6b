pub mod config;
pub mod errors;
pub mod git_ops;
pub mod logger;
pub mod mailer;
pub mod page;
pub mod run_state;
pub mod watcher;

pub use errors::{Result, WatchError};
pub use watcher::{run, RunOutcome, RunSummary};
