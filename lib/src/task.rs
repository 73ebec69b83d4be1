//! A thin, narratable wrapper around [`std::process::Command`]: prints a
//! one-line description before running (matching the progress narrative the
//! design calls for — "Building image for context ...", "Adding container
//! ..." — and turns a nonzero exit into an `anyhow::Error` that includes the
//! command line.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use anyhow::Result;
use wheelsticks_utils::CommandRunExt;

#[derive(Debug)]
pub(crate) struct Task {
    description: String,
    quiet: bool,
    cmd: Command,
}

impl Task {
    pub(crate) fn new(description: impl Into<String>, exe: impl AsRef<OsStr>) -> Self {
        Self {
            description: description.into(),
            quiet: false,
            cmd: Command::new(exe),
        }
    }

    /// Don't print the description line (used for probes whose failure is
    /// expected and handled, such as `network exists`).
    pub(crate) fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub(crate) fn args<S: AsRef<OsStr>>(mut self, args: impl IntoIterator<Item = S>) -> Self {
        self.cmd.args(args);
        self
    }

    pub(crate) fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.cmd.arg(arg);
        self
    }

    pub(crate) fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    fn announce(&self) {
        if !self.quiet {
            println!("{}", self.description);
        }
        tracing::debug!("exec: {:?}", self.cmd);
    }

    /// Run the command, returning an error (including the command line) if
    /// it does not exit successfully.
    pub(crate) fn run(mut self) -> Result<()> {
        self.announce();
        self.cmd.run()
    }

    /// Like [`Task::run`], but return stdout trimmed of trailing whitespace.
    pub(crate) fn read(mut self) -> Result<String> {
        self.announce();
        self.cmd.run_get_stdout_trimmed()
    }

    /// Like [`Task::run`], but return the raw exit status and output without
    /// treating a nonzero exit as an error. Used where the caller interprets
    /// specific exit codes (e.g. `network exists`).
    pub(crate) fn run_capturing(mut self) -> Result<std::process::Output> {
        self.announce();
        self.cmd.run_capturing()
    }

    /// Run the command, parsing stdout as JSON.
    pub(crate) fn read_json<T: serde::de::DeserializeOwned>(mut self) -> Result<T> {
        self.announce();
        self.cmd.run_and_parse_json()
    }
}
