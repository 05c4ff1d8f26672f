use std::process::{Command, ExitStatus, Stdio};

use super::ProcessError;
use crate::flags::Flags;

/// Runs one external command per call: spawn, then block until that child
/// exits. Exactly one child exists at a time; the caller never dispatches
/// another command before this one has been reaped.
#[derive(Clone)]
pub struct ProcessExecutor {
    quiet_mode: bool,
}

impl ProcessExecutor {
    pub fn new(flags: &Flags) -> Self {
        ProcessExecutor {
            quiet_mode: flags.is_set("quiet"),
        }
    }

    /// Spawns `argv[0]` (resolved through PATH) with the remaining tokens as
    /// its arguments and returns the child's raw exit status.
    ///
    /// A launch failure is the child's failure, not ours: it is returned for
    /// the caller to report once, and the command loop carries on.
    pub fn run(&self, argv: &[&str]) -> Result<ExitStatus, ProcessError> {
        let mut command = Command::new(argv[0]);
        command
            .args(&argv[1..])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProcessError::CommandNotFound(argv[0].to_string()));
            }
            Err(e) => return Err(ProcessError::Spawn(e)),
        };

        let status = child.wait().map_err(ProcessError::Wait)?;

        if !status.success() && !self.quiet_mode {
            println!("Process exited with status: {}", status);
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_executor() -> ProcessExecutor {
        let mut flags = Flags::new();
        flags
            .parse(&["--quiet".to_string()])
            .expect("parse flags");
        ProcessExecutor::new(&flags)
    }

    #[test]
    fn test_successful_command() {
        let status = quiet_executor()
            .run(&["sh", "-c", "exit 0"])
            .expect("run");
        assert!(status.success());
    }

    #[test]
    fn test_exit_status_is_propagated() {
        let status = quiet_executor()
            .run(&["sh", "-c", "exit 3"])
            .expect("run");
        assert_eq!(status.code(), Some(3));
    }

    #[test]
    fn test_missing_command_is_reported_not_fatal() {
        let result = quiet_executor().run(&["definitely-not-a-real-command"]);
        assert!(matches!(result, Err(ProcessError::CommandNotFound(_))));
    }
}
