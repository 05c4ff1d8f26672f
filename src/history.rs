use std::{
    fmt,
    fs::{File, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// Default location of the history log, relative to the working directory.
pub const HISTORY_FILE: &str = "shell-history";

#[derive(Debug)]
pub enum HistoryError {
    Open(PathBuf, std::io::Error),
    Append(std::io::Error),
    Flush(std::io::Error),
    Closed,
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Open(path, e) => {
                write!(f, "could not open {} in append mode: {}", path.display(), e)
            }
            HistoryError::Append(e) => write!(f, "append failed: {}", e),
            HistoryError::Flush(e) => write!(f, "flush failed: {}", e),
            HistoryError::Closed => write!(f, "history log is closed"),
        }
    }
}

impl std::error::Error for HistoryError {}

/// Append-only record of every raw input line, opened once for the lifetime
/// of the process. The handle is replaced with `None` on close so that no
/// later path can write to or close a stale handle.
pub struct HistoryLog {
    file: Option<File>,
}

impl HistoryLog {
    /// Opens the log for append, creating it if absent. The file is never
    /// truncated and never read back.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|e| HistoryError::Open(path, e))?;

        Ok(HistoryLog { file: Some(file) })
    }

    /// Writes the exact bytes of one input line, trailing newline included.
    /// The line is not required to be valid UTF-8; whatever was typed is
    /// what gets recorded.
    pub fn append(&mut self, raw_line: &[u8]) -> Result<(), HistoryError> {
        let file = self.file.as_mut().ok_or(HistoryError::Closed)?;
        file.write_all(raw_line).map_err(HistoryError::Append)
    }

    /// Forces appended bytes to durable storage. A no-op once closed.
    pub fn flush(&mut self) -> Result<(), HistoryError> {
        match self.file.as_mut() {
            Some(file) => file.sync_all().map_err(HistoryError::Flush),
            None => Ok(()),
        }
    }

    /// Releases the file handle. Idempotent: closing twice is a no-op.
    pub fn close(&mut self) {
        self.file = None;
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_append_preserves_bytes_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history");

        let mut log = HistoryLog::open(&path).expect("open");
        log.append(b"ls -la /tmp\n").expect("append");
        log.append(b"\n").expect("append blank");
        log.append(b"exit\n").expect("append");
        log.flush().expect("flush");

        let contents = fs::read_to_string(&path).expect("read back");
        assert_eq!(contents, "ls -la /tmp\n\nexit\n");
    }

    #[test]
    fn test_append_accepts_arbitrary_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history");

        let mut log = HistoryLog::open(&path).expect("open");
        log.append(b"\xff\xfe not utf8\n").expect("append");
        log.flush().expect("flush");

        let contents = fs::read(&path).expect("read back");
        assert_eq!(contents, b"\xff\xfe not utf8\n");
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut log = HistoryLog::open(dir.path().join("history")).expect("open");

        log.close();
        assert!(log.is_closed());
        log.close();
        assert!(log.is_closed());
        assert!(log.flush().is_ok());
    }

    #[test]
    fn test_append_after_close_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut log = HistoryLog::open(dir.path().join("history")).expect("open");

        log.close();
        assert!(matches!(log.append(b"late\n"), Err(HistoryError::Closed)));
    }

    #[test]
    fn test_reopen_appends_without_truncating() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history");

        let mut log = HistoryLog::open(&path).expect("open");
        log.append(b"first\n").expect("append");
        log.flush().expect("flush");
        log.close();

        let mut log = HistoryLog::open(&path).expect("reopen");
        log.append(b"second\n").expect("append");
        log.flush().expect("flush");
        log.close();

        let contents = fs::read_to_string(&path).expect("read back");
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_open_failure_reports_path() {
        let err = HistoryLog::open("/definitely/not/a/real/dir/history")
            .err()
            .expect("open should fail");
        assert!(err.to_string().contains("/definitely/not/a/real/dir/history"));
    }
}
