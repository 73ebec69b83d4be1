//! A narrow extension trait over [`std::process::Command`] so that callers
//! can run a command and, in one shot, either check its exit status or parse
//! its stdout as JSON. Keeping this as a trait over `&mut Command` (rather
//! than a bespoke builder) lets call sites keep using the standard library's
//! own `Command` API for everything else (args, env, cwd).

use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Extension methods for running a [`Command`] and inspecting the result.
pub trait CommandRunExt {
    /// Execute the command, erroring (with the command line included) if it
    /// did not exit successfully. Inherits stdout/stderr.
    fn run(&mut self) -> Result<()>;

    /// Execute the command and return its stdout, trimmed of trailing
    /// whitespace. Errors (with the command line included) if it did not
    /// exit successfully.
    fn run_get_stdout_trimmed(&mut self) -> Result<String>;

    /// Execute the command, parsing its stdout as JSON into `T`.
    fn run_and_parse_json<T: DeserializeOwned>(&mut self) -> Result<T>;

    /// Run the command and return its raw [`Output`] without checking the
    /// exit status; useful when the caller needs to interpret specific exit
    /// codes itself (e.g. "not found" vs. "failed").
    fn run_capturing(&mut self) -> Result<Output>;
}

impl CommandRunExt for Command {
    fn run(&mut self) -> Result<()> {
        let st = self
            .status()
            .with_context(|| format!("Spawning {self:?}"))?;
        if !st.success() {
            anyhow::bail!("Command {self:?} failed: {st:?}");
        }
        Ok(())
    }

    fn run_get_stdout_trimmed(&mut self) -> Result<String> {
        self.stdout(Stdio::piped());
        let output = self
            .output()
            .with_context(|| format!("Spawning {self:?}"))?;
        if !output.status.success() {
            anyhow::bail!("Command {self:?} failed: {:?}", output.status);
        }
        let stdout = String::from_utf8(output.stdout)
            .with_context(|| format!("Command {self:?} returned non-UTF-8 stdout"))?;
        Ok(stdout.trim_end().to_string())
    }

    fn run_and_parse_json<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.stdout(Stdio::piped());
        let output = self
            .output()
            .with_context(|| format!("Spawning {self:?}"))?;
        if !output.status.success() {
            anyhow::bail!("Command {self:?} failed: {:?}", output.status);
        }
        serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Parsing JSON output of {self:?}"))
    }

    fn run_capturing(&mut self) -> Result<Output> {
        self.stdout(Stdio::piped());
        self.stderr(Stdio::piped());
        self.output().with_context(|| format!("Spawning {self:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_get_stdout_trimmed() {
        let mut cmd = Command::new("printf");
        cmd.arg("hello\n");
        assert_eq!(cmd.run_get_stdout_trimmed().unwrap(), "hello");
    }

    #[test]
    fn test_run_fails_on_nonzero_exit() {
        let mut cmd = Command::new("false");
        assert!(cmd.run().is_err());
    }

    #[test]
    fn test_run_and_parse_json() {
        let mut cmd = Command::new("printf");
        cmd.arg(r#"{"a": 1}"#);
        #[derive(serde::Deserialize)]
        struct T {
            a: i32,
        }
        let t: T = cmd.run_and_parse_json().unwrap();
        assert_eq!(t.a, 1);
    }
}
