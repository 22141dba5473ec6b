use super::errors::{Result, WatchError};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only run log, one `<ISO8601> <message>` line per event. This is the
/// program's user-visible record; failure to write it is fatal because the
/// emails must not go out unobserved.
#[derive(Debug)]
pub struct Logger {
    path: PathBuf,
}

impl Logger {
    /// Opens (creating if absent) the log file once to prove it is writable.
    pub fn open(path: &Path) -> Result<Logger> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| WatchError::Log {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Logger {
            path: path.to_path_buf(),
        })
    }

    /// The file is opened and closed within the call; no handle is held
    /// across the commit loop.
    pub fn log(&self, message: &str) -> Result<()> {
        let stamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| WatchError::Log {
                path: self.path.clone(),
                source,
            })?;
        writeln!(file, "{stamp} {message}").map_err(|source| WatchError::Log {
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
    fn appends_one_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.log");

        let logger = Logger::open(&path).unwrap();
        logger.log("first message").unwrap();
        logger.log("second message").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first message"));
        assert!(lines[1].ends_with("second message"));
        // stamp comes first and looks like a date
        assert!(lines[0].starts_with(|c: char| c.is_ascii_digit()));
        assert!(lines[0].contains('T'));
    }

    #[test]
    fn open_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.log");
        assert!(!path.exists());

        Logger::open(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn unwritable_path_is_fatal() {
        let error = Logger::open(Path::new("/no/such/dir/watch.log")).unwrap_err();
        assert!(matches!(error, WatchError::Log { .. }));
    }
}
