use super::errors::{Result, WatchError};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

/// The single persisted watermark: the epoch second this program last ran.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    pub lastrun: i64,
}

/// Absence of the runfile is the expected first-run case, not an error.
#[derive(Debug)]
pub enum LoadedState {
    Found(RunState),
    NotFound,
}

pub struct RunStateStore {
    path: PathBuf,
}

impl RunStateStore {
    pub fn new(path: impl Into<PathBuf>) -> RunStateStore {
        RunStateStore { path: path.into() }
    }

    pub fn load(&self) -> Result<LoadedState> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Ok(LoadedState::NotFound)
            }
            Err(error) => return Err(error.into()),
        };
        let state: RunState = serde_yaml::from_str(&text)?;
        Ok(LoadedState::Found(state))
    }

    /// Rewrites the file in full.
    pub fn save(&self, state: &RunState) -> Result<()> {
        let text = serde_yaml::to_string(state)?;
        std::fs::write(&self.path, text).map_err(|source| WatchError::RunState {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStateStore::new(dir.path().join("runfile.yaml"));
        assert!(matches!(store.load().unwrap(), LoadedState::NotFound));
    }

    #[test]
    fn save_then_load_round_trips_the_integer() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStateStore::new(dir.path().join("runfile.yaml"));

        store.save(&RunState { lastrun: 1756200000 }).unwrap();
        match store.load().unwrap() {
            LoadedState::Found(state) => assert_eq!(state.lastrun, 1756200000),
            LoadedState::NotFound => panic!("runfile should exist"),
        }
    }

    #[test]
    fn save_overwrites_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStateStore::new(dir.path().join("runfile.yaml"));

        store.save(&RunState { lastrun: 100 }).unwrap();
        store.save(&RunState { lastrun: 200 }).unwrap();
        match store.load().unwrap() {
            LoadedState::Found(state) => assert_eq!(state.lastrun, 200),
            LoadedState::NotFound => panic!("runfile should exist"),
        }
    }

    #[test]
    fn file_is_a_plain_yaml_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runfile.yaml");
        let store = RunStateStore::new(&path);

        store.save(&RunState { lastrun: 42 }).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("lastrun: 42"));
    }

    #[test]
    fn unwritable_path_is_a_run_state_error() {
        let store = RunStateStore::new("/no/such/dir/runfile.yaml");
        let error = store.save(&RunState { lastrun: 1 }).unwrap_err();
        assert!(matches!(error, WatchError::RunState { .. }));
    }
}
