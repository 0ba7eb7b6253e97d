//! Running the font builder on what the converter produced

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::Deserialize;
use write_fonts::types::Tag;

use crate::{
    axes::Axis,
    process::{Invocation, Runner},
    venv::Toolchain,
    Error,
};

/// The bits of the builder's `config.yaml` we look at
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderConfig {
    pub sources: Vec<String>,
    #[serde(default)]
    pub axis_order: Vec<Tag>,
}

impl BuilderConfig {
    pub fn load(path: &Path) -> Result<BuilderConfig, Error> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_yaml::from_str(&contents).map_err(Into::into)
    }
}

/// Builds the final fonts from one builder config
#[derive(Debug, Clone)]
pub struct BuildJob {
    config_file: PathBuf,
    invocation: Invocation,
}

impl BuildJob {
    /// `builder` is the program followed by any leading arguments, e.g. `gftools builder`
    pub fn new(
        builder: &[String],
        config_file: &Path,
        toolchain: &Toolchain,
        root: &Path,
    ) -> BuildJob {
        // ProjectConfig::validate rejects an empty builder
        let (program, leading) = match builder.split_first() {
            Some((program, rest)) => (program.as_str(), rest),
            None => ("gftools", &[][..]),
        };
        let invocation = toolchain
            .invocation(program)
            .args(leading)
            .arg(config_file)
            .current_dir(root);
        BuildJob {
            config_file: config_file.to_path_buf(),
            invocation,
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Run the builder; the converter must have written the config already.
    ///
    /// `variable_axes` is what we asked the converter for, used to sanity check its output.
    pub fn run(&self, runner: &mut dyn Runner, variable_axes: &[Axis]) -> Result<(), Error> {
        if !self.config_file.is_file() {
            return Err(Error::FileExpected(self.config_file.clone()));
        }
        let config = BuilderConfig::load(&self.config_file)?;
        let expected: Vec<Tag> = variable_axes.iter().map(|a| a.tag()).collect();
        if config.axis_order != expected {
            warn!(
                "{} has axis order {:?}, expected {:?}",
                self.config_file.display(),
                config.axis_order,
                expected
            );
        }
        info!(
            "Building {} from {}",
            config.sources.join(", "),
            self.config_file.display()
        );
        runner.run(&self.invocation)
    }
}
