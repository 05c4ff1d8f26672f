use crate::error::ShellError;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Flags {
    flags: HashMap<String, Flag>,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub short: String,
    pub long: String,
    pub description: String,
    pub value: Option<String>,
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Flags {
    pub fn new() -> Self {
        let mut flags = HashMap::new();

        flags.insert(
            "help".to_string(),
            Flag {
                short: "-h".to_string(),
                long: "--help".to_string(),
                description: "Print this help message".to_string(),
                value: None,
            },
        );

        flags.insert(
            "version".to_string(),
            Flag {
                short: "-v".to_string(),
                long: "--version".to_string(),
                description: "Show version information".to_string(),
                value: None,
            },
        );

        flags.insert(
            "quiet".to_string(),
            Flag {
                short: "-q".to_string(),
                long: "--quiet".to_string(),
                description: "Suppress non-essential output".to_string(),
                value: None,
            },
        );

        flags.insert(
            "timeout".to_string(),
            Flag {
                short: "-t".to_string(),
                long: "--timeout".to_string(),
                description: "Seconds of prompt idleness before the session expires".to_string(),
                value: None,
            },
        );

        flags.insert(
            "history".to_string(),
            Flag {
                short: "-f".to_string(),
                long: "--history".to_string(),
                description: "Path of the history log file".to_string(),
                value: None,
            },
        );

        Flags { flags }
    }

    pub fn parse(&mut self, args: &[String]) -> Result<(), ShellError> {
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];

            for flag in self.flags.values_mut() {
                if arg == &flag.short || arg == &flag.long {
                    // timeout and history take a value, the rest are switches
                    if arg == "-t" || arg == "--timeout" || arg == "-f" || arg == "--history" {
                        if i + 1 < args.len() {
                            flag.value = Some(args[i + 1].clone());
                            i += 1;
                        } else {
                            return Err(ShellError::FlagError(format!(
                                "Flag {} requires a value",
                                arg
                            )));
                        }
                    } else {
                        flag.value = Some("true".to_string());
                    }
                }
            }
            i += 1;
        }
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flags
            .get(name)
            .and_then(|f| f.value.as_ref())
            .is_some()
    }

    pub fn get_value(&self, name: &str) -> Option<&String> {
        self.flags.get(name).and_then(|f| f.value.as_ref())
    }

    pub fn print_help(&self) {
        println!("Usage: scribe [OPTIONS]");
        println!("\nOptions:");
        for flag in self.flags.values() {
            println!("  {}, {:<15} {}", flag.short, flag.long, flag.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_switch_flag() {
        let mut flags = Flags::new();
        flags.parse(&args(&["--quiet"])).expect("parse");
        assert!(flags.is_set("quiet"));
        assert!(!flags.is_set("help"));
    }

    #[test]
    fn test_value_flag() {
        let mut flags = Flags::new();
        flags.parse(&args(&["--timeout", "5"])).expect("parse");
        assert_eq!(flags.get_value("timeout").map(String::as_str), Some("5"));
    }

    #[test]
    fn test_value_flag_missing_value() {
        let mut flags = Flags::new();
        assert!(flags.parse(&args(&["--history"])).is_err());
    }

    #[test]
    fn test_unknown_arguments_are_ignored() {
        let mut flags = Flags::new();
        flags.parse(&args(&["--no-such-flag"])).expect("parse");
        assert!(!flags.is_set("quiet"));
    }
}
