use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

pub mod signal;

use crate::history::{HistoryError, HistoryLog};

/// Seconds of prompt idleness tolerated before the session expires.
pub const DEFAULT_TIMEOUT_SECS: u32 = 30;

/// The three asynchronous conditions that end the session, each with its own
/// exit status and user-visible notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Fault,
    Interrupt,
    Timeout,
}

impl Condition {
    pub fn exit_code(self) -> i32 {
        match self {
            Condition::Fault => -1,
            Condition::Interrupt => -2,
            Condition::Timeout => -3,
        }
    }

    pub fn notice(self) -> &'static str {
        match self {
            Condition::Fault => "A segmentation fault has been detected.",
            Condition::Interrupt => "The Interrupt signal has been caught.",
            Condition::Timeout => "The session has expired.",
        }
    }
}

/// Process-wide shared state: the open history log, the countdown timer, and
/// the single-writer `closing` flag that keeps the loop-initiated and
/// signal-initiated shutdown paths from ever double-closing the log.
///
/// Clones share the same log and flag; the signal-notification threads each
/// capture one.
#[derive(Clone)]
pub struct Session {
    history: Arc<Mutex<HistoryLog>>,
    closing: Arc<AtomicBool>,
    timeout_secs: u32,
}

impl Session {
    pub fn new(history: HistoryLog, timeout_secs: u32) -> Self {
        Session {
            history: Arc::new(Mutex::new(history)),
            closing: Arc::new(AtomicBool::new(false)),
            timeout_secs,
        }
    }

    fn lock_history(&self) -> MutexGuard<'_, HistoryLog> {
        match self.history.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Appends one raw input line to the log and flushes it to durable
    /// storage, so that a fault at any later point loses nothing.
    pub fn record(&self, raw_line: &[u8]) -> Result<(), HistoryError> {
        let mut log = self.lock_history();
        log.append(raw_line)?;
        log.flush()
    }

    /// The shared shutdown sequence: flush, report a flush failure
    /// non-fatally, close. The `closing` flag makes this idempotent; only
    /// the first caller touches the log.
    pub fn shutdown(&self) {
        if self.closing.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut log = self.lock_history();
        if let Err(e) = log.flush() {
            eprintln!("scribe: history {}", e);
        }
        log.close();
    }

    /// Prints the condition's notice, shuts the log down, and terminates the
    /// whole process with the condition's status. Never returns; the command
    /// loop does not resume once a condition has fired.
    pub fn terminate(&self, condition: Condition) -> ! {
        match condition {
            Condition::Fault => eprintln!("{}\nExiting...", condition.notice()),
            Condition::Interrupt | Condition::Timeout => {
                println!("\n{}\nExiting...", condition.notice());
            }
        }
        self.shutdown();
        process::exit(condition.exit_code())
    }

    /// Arms the countdown for one prompt/read cycle. Called immediately
    /// before each prompt; the next iteration arms a fresh window.
    pub fn arm_timer(&self) {
        unsafe {
            libc::alarm(self.timeout_secs);
        }
    }

    /// Cancels the countdown once the read has completed, so a long-running
    /// child is not cut short by a stale window.
    pub fn disarm_timer(&self) {
        unsafe {
            libc::alarm(0);
        }
    }

    pub fn history_is_closed(&self) -> bool {
        self.lock_history().is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryLog;
    use std::fs;

    fn session_in(dir: &tempfile::TempDir) -> Session {
        let log = HistoryLog::open(dir.path().join("history")).expect("open");
        Session::new(log, DEFAULT_TIMEOUT_SECS)
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            Condition::Fault.exit_code(),
            Condition::Interrupt.exit_code(),
            Condition::Timeout.exit_code(),
        ];
        assert_eq!(codes, [-1, -2, -3]);
    }

    #[test]
    fn test_record_is_flushed_immediately() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = session_in(&dir);

        session.record(b"explode\n").expect("record");

        let contents = fs::read_to_string(dir.path().join("history")).expect("read back");
        assert_eq!(contents, "explode\n");
    }

    #[test]
    fn test_shutdown_closes_the_log() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = session_in(&dir);

        assert!(!session.history_is_closed());
        session.shutdown();
        assert!(session.history_is_closed());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = session_in(&dir);

        session.shutdown();
        session.shutdown();
        assert!(session.history_is_closed());
    }

    #[test]
    fn test_record_after_shutdown_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = session_in(&dir);

        session.shutdown();
        assert!(matches!(
            session.record(b"late\n"),
            Err(HistoryError::Closed)
        ));
    }

    #[test]
    fn test_clones_share_the_closing_flag() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = session_in(&dir);
        let clone = session.clone();

        clone.shutdown();
        assert!(session.history_is_closed());
    }
}
