use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No project file at '{0}'")]
    ConfigNotFound(PathBuf),
    #[error("Invalid project configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown axis '{0}', expected one of ESIZ, ROND, BLED, XESP, EJIT")]
    UnknownAxis(String),
    #[error("Invalid value '{value}' for axis {axis}")]
    InvalidAxisValue { axis: String, value: String },
    #[error("'{0}' exists but is not a directory")]
    ExpectedDirectory(PathBuf),
    #[error("Missing file '{0}'")]
    FileExpected(PathBuf),
    #[error("io failed for '{path}': '{source}'")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    YamlSerError(#[from] serde_yaml::Error),
    #[error("Unable to start '{program}': '{source}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` failed: {}", describe_exit(.code))]
    ToolFailed { command: String, code: Option<i32> },
    #[error("No .bdf files found in '{0}'")]
    NoSources(PathBuf),
    #[error("Bad font filter: {0}")]
    InvalidFilter(#[from] regex::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Error {
        Error::FileIo {
            path: path.into(),
            source,
        }
    }

    /// The process exit code to report for this error.
    ///
    /// A failing external tool hands its own code through, everything else is 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::ToolFailed {
                code: Some(code), ..
            } => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }
}
