use std::io::{self, BufRead, Write};

use crate::{
    error::ShellError,
    flags::Flags,
    highlight::OutputStyler,
    history::{HistoryLog, HISTORY_FILE},
    process::ProcessExecutor,
    session::{signal, Session, DEFAULT_TIMEOUT_SECS},
    tokenizer,
};

const PROMPT: &str = "prompt> ";

pub struct Shell {
    session: Session,
    executor: ProcessExecutor,
    styler: OutputStyler,
    flags: Flags,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        // No open log, no loop: failing here is fatal by contract.
        let history_path = flags
            .get_value("history")
            .cloned()
            .unwrap_or_else(|| HISTORY_FILE.to_string());
        let history = HistoryLog::open(history_path)?;

        let timeout_secs = match flags.get_value("timeout") {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                ShellError::FlagError(format!("invalid timeout value: {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let session = Session::new(history, timeout_secs);
        signal::install(&session)?;

        let executor = ProcessExecutor::new(&flags);

        Ok(Shell {
            session,
            executor,
            styler: OutputStyler::new(),
            flags,
        })
    }

    /// Runs the command loop; the log shutdown sequence runs on every way
    /// out of it, error returns included, never more than once.
    pub fn run(&mut self) -> Result<(), ShellError> {
        let result = self.command_loop();
        self.session.shutdown();
        result
    }

    fn command_loop(&mut self) -> Result<(), ShellError> {
        let stdin = io::stdin();

        loop {
            self.session.arm_timer();
            print!("{}", self.styler.prompt(PROMPT));
            io::stdout().flush()?;

            // Raw bytes, not UTF-8: whatever the user typed is read and
            // logged verbatim, decodable or not.
            let mut line = Vec::new();
            let bytes_read = stdin.lock().read_until(b'\n', &mut line)?;
            self.session.disarm_timer();
            if bytes_read == 0 {
                // End of input takes the same orderly path as `exit`.
                break;
            }

            // The log records the line before anything is done with it, so
            // it stays a faithful account of user intent even when the
            // command fails to parse, fails to launch, or faults.
            if let Err(e) = self.session.record(&line) {
                if !self.flags.is_set("quiet") {
                    eprintln!("{}", self.styler.error(&format!("scribe: history {}", e)));
                }
            }

            let text = String::from_utf8_lossy(&line);
            let command = text.strip_suffix('\n').unwrap_or(&text);
            let tokens = match tokenizer::tokenize(command) {
                Ok(tokens) => tokens,
                Err(e) => {
                    eprintln!("{}", self.styler.error(&format!("scribe: {}", e)));
                    continue;
                }
            };

            match tokens.first().copied() {
                None => continue,
                Some("exit") => break,
                Some("explode") => signal::trigger_fault(),
                Some(_) => {
                    if let Err(e) = self.executor.run(&tokens) {
                        if !self.flags.is_set("quiet") {
                            eprintln!("{}", self.styler.error(&format!("scribe: {}", e)));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
