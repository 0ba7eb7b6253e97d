//! Running the external tools

use std::{
    ffi::{OsStr, OsString},
    fmt::{self, Display},
    path::{Path, PathBuf},
    process::Command,
};

use log::debug;

use crate::Error;

/// One run of an external program, as a value we can log, print or test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: Vec<(OsString, OsString)>,
    pub current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Invocation {
        Invocation {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Invocation {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn envs(mut self, vars: impl IntoIterator<Item = (OsString, OsString)>) -> Invocation {
        self.env.extend(vars);
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Invocation {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    /// Program and arguments, lossily converted for display and comparison
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command.envs(self.env.iter().map(|(k, v)| (k, v)));
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arg in self.argv() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == '\'') {
                write!(f, "'{}'", arg.replace('\'', r"'\''"))?;
            } else {
                f.write_str(&arg)?;
            }
        }
        Ok(())
    }
}

/// Something that can execute an [`Invocation`], blocking until it finishes
pub trait Runner {
    fn run(&mut self, invocation: &Invocation) -> Result<(), Error>;
}

/// Runs invocations as child processes sharing our stdio
#[derive(Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<(), Error> {
        debug!("exec {invocation}");
        let status = invocation
            .command()
            .status()
            .map_err(|source| Error::Spawn {
                program: invocation.program.display().to_string(),
                source,
            })?;
        if !status.success() {
            return Err(Error::ToolFailed {
                command: invocation.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
