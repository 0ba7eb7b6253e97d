//! Builds vector and variable fonts from BDF bitmap sources.
//!
//! The heavy lifting is done by two external tools, a BDF to UFO converter
//! and a font builder, both run from a Python virtual environment. This crate
//! prepares that environment, turns a project file into command lines and
//! runs them one after another.

#[cfg(feature = "cli")]
mod args;
pub mod axes;
pub mod builder;
pub mod config;
pub mod convert;
mod error;
pub mod metadata;
pub mod paths;
pub mod pipeline;
pub mod process;
pub mod publish;
pub mod timing;
pub mod venv;

#[cfg(test)]
mod test_util;

#[cfg(feature = "cli")]
pub use args::Args;
pub use config::ProjectConfig;
pub use error::Error;
pub use pipeline::{Flags, Pipeline, Report};

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;

pub fn require_dir(dir: &Path) -> Result<PathBuf, Error> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::ExpectedDirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?
    }
    debug!("require_dir {:?}", dir);
    Ok(dir.to_path_buf())
}
