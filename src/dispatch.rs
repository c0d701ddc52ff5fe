//! Hands a decoded file to its interpreter

use crate::error::{Error, Result};
use crate::language::LanguageDescriptor;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, warn};

/// Runs interpreters synchronously with the caller's stdio
pub struct Dispatcher {
    extra_args: Vec<OsString>,
}

impl Dispatcher {
    /// Create a dispatcher with no extra script arguments
    pub fn new() -> Self {
        Self {
            extra_args: Vec::new(),
        }
    }

    /// Arguments appended after the script path
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.extra_args = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        self
    }

    /// `command [default args...] <file> [extra args...]`
    pub fn command(&self, language: &LanguageDescriptor, file: &Path) -> Command {
        let mut cmd = Command::new(&language.command);
        cmd.args(&language.args)
            .arg(file)
            .args(&self.extra_args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Run `file` with `language`'s interpreter and wait for it.
    ///
    /// A launch failure or non-zero exit is an error. There is no retry and
    /// no timeout.
    pub fn run(&self, language: &LanguageDescriptor, file: &Path) -> Result<()> {
        let mut cmd = self.command(language, file);
        debug!(command = ?cmd, "dispatching");

        let status = cmd.status().map_err(|e| Error::InterpreterLaunch {
            command: language.command.clone(),
            reason: e.to_string(),
        })?;

        if status.success() {
            return Ok(());
        }

        warn!(command = %language.command, code = ?status.code(), "interpreter failed");
        Err(Error::InterpreterLaunch {
            command: language.command.clone(),
            reason: describe_status(status),
        })
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn describe_status(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;
    match (status.code(), status.signal()) {
        (Some(code), _) => format!("exit status {}", code),
        (None, Some(signal)) => format!("terminated by signal {}", signal),
        (None, None) => status.to_string(),
    }
}

#[cfg(not(unix))]
fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {}", code),
        None => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> LanguageDescriptor {
        LanguageDescriptor::new("Shell", &["sh"], &["#!/bin/sh"], "sh")
    }

    #[test]
    fn test_command_layout() {
        let lang = LanguageDescriptor::new("Python", &["py"], &[], "python3").with_args(&["-u"]);
        let dispatcher = Dispatcher::new().with_args(["one", "two"]);
        let cmd = dispatcher.command(&lang, Path::new("script.py"));

        assert_eq!(cmd.get_program(), "python3");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec!["-u", "script.py", "one", "two"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_run_success() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("ok.sh");
        let marker = dir.path().join("ran");
        std::fs::write(&script, format!("touch '{}'\n", marker.display())).unwrap();

        Dispatcher::new().run(&shell(), &script).unwrap();
        assert!(marker.exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_run_passes_extra_args() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("args.sh");
        let out = dir.path().join("out");
        std::fs::write(&script, format!("echo \"$1-$2\" > '{}'\n", out.display())).unwrap();

        Dispatcher::new()
            .with_args(["a", "b"])
            .run(&shell(), &script)
            .unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "a-b\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_run_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fail.sh");
        std::fs::write(&script, "exit 3\n").unwrap();

        let err = Dispatcher::new().run(&shell(), &script).unwrap_err();
        assert!(matches!(err, Error::InterpreterLaunch { ref command, .. } if command == "sh"));
        assert_eq!(err.to_string(), "Failed to execute with sh: exit status 3");
    }

    #[test]
    fn test_run_missing_interpreter() {
        let lang = LanguageDescriptor::new("Nope", &["nope"], &[], "backlang-no-such-interpreter");
        let err = Dispatcher::new()
            .run(&lang, Path::new("whatever.nope"))
            .unwrap_err();
        assert!(matches!(err, Error::InterpreterLaunch { .. }));
        assert!(err
            .to_string()
            .starts_with("Failed to execute with backlang-no-such-interpreter:"));
    }
}
