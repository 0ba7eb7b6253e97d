//! The whole build, one step after another

use std::path::{Path, PathBuf};

use bitflags::bitflags;
use log::{info, warn};
use regex::Regex;

use crate::{
    builder::BuildJob,
    config::{FontSource, ProjectConfig},
    convert::ConvertJob,
    paths::Paths,
    process::{Invocation, Runner},
    publish::{bdf_files, publish},
    timing::{Step, StepTimer},
    venv::{Toolchain, Venv},
    Error,
};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Flags: u32 {
        /// Print the commands instead of running them
        const DRY_RUN = 0b0001;
        /// Use the python and builder already on PATH
        const SKIP_VENV = 0b0010;
        /// Don't copy the bitmap sources
        const SKIP_PUBLISH = 0b0100;
        /// Chattier logs, also passed on to the converter
        const VERBOSE = 0b1000;
    }
}

/// What a successful run did
#[derive(Debug)]
pub struct Report {
    pub timer: StepTimer,
    /// Builder configs that were built, in order
    pub built: Vec<PathBuf>,
    /// Bitmap fonts copied to the publish directory
    pub published: Vec<PathBuf>,
}

pub struct Pipeline {
    config: ProjectConfig,
    paths: Paths,
    flags: Flags,
    font_filter: Option<Regex>,
}

impl Pipeline {
    pub fn new(root: &Path, config: ProjectConfig, flags: Flags) -> Pipeline {
        let paths = Paths::new(root, &config);
        Pipeline {
            config,
            paths,
            flags,
            font_filter: None,
        }
    }

    /// Only build fonts whose style name or source file matches `filter`
    pub fn with_font_filter(mut self, filter: Option<&str>) -> Result<Pipeline, Error> {
        self.font_filter = filter.map(Regex::new).transpose()?;
        if let Some(filter) = &self.font_filter {
            if self.fonts().next().is_none() {
                return Err(Error::InvalidConfig(format!(
                    "'{filter}' matches none of the configured fonts"
                )));
            }
        }
        Ok(self)
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn fonts(&self) -> impl Iterator<Item = &FontSource> + '_ {
        self.config.fonts.iter().filter(move |font| match &self.font_filter {
            Some(re) => {
                re.is_match(&font.style_name) || re.is_match(&font.source.to_string_lossy())
            }
            None => true,
        })
    }

    fn venv(&self) -> Venv {
        Venv::new(self.paths.venv_dir())
    }

    fn toolchain(&self) -> Result<Toolchain, Error> {
        if self.flags.contains(Flags::SKIP_VENV) {
            Ok(Toolchain::ambient(&self.config.python))
        } else {
            Toolchain::from_venv(&self.venv())
        }
    }

    fn jobs(&self, toolchain: &Toolchain) -> Vec<(&FontSource, ConvertJob, BuildJob)> {
        let verbose = self.flags.contains(Flags::VERBOSE);
        self.fonts()
            .map(|font| {
                let convert = ConvertJob::new(&self.config, font, &self.paths, toolchain, verbose);
                let build = BuildJob::new(
                    &self.config.builder,
                    convert.builder_config(),
                    toolchain,
                    self.paths.root(),
                );
                (font, convert, build)
            })
            .collect()
    }

    /// The external commands a run would execute, in order
    pub fn plan(&self) -> Result<Vec<Invocation>, Error> {
        let mut plan = Vec::new();
        if !self.flags.contains(Flags::SKIP_VENV) {
            let venv = self.venv();
            let requirements = self.paths.requirements();
            let install = if venv.exists() {
                venv.requirements_changed(requirements)
            } else {
                plan.push(venv.create_invocation(&self.config.python));
                requirements.is_file()
            };
            if install {
                plan.push(venv.install_invocation(requirements)?);
            }
        }
        let toolchain = self.toolchain()?;
        for (_, convert, build) in self.jobs(&toolchain) {
            plan.push(convert.invocation().clone());
            plan.push(build.invocation().clone());
        }
        Ok(plan)
    }

    /// Run every step, stopping at the first failure
    pub fn run(&self, runner: &mut dyn Runner) -> Result<Report, Error> {
        let mut timer = StepTimer::new();

        // fail before spending minutes on pip
        if !self.flags.contains(Flags::SKIP_PUBLISH) {
            bdf_files(self.paths.source_dir())?;
        }

        if self.flags.contains(Flags::SKIP_VENV) {
            info!("Using {} from PATH", self.config.python);
        } else {
            let venv = self.venv();
            let status = timer.time(Step::Venv, || {
                venv.ensure(runner, &self.config.python, self.paths.requirements())
            })?;
            info!("{} {status:?}", venv.dir().display());
        }

        let toolchain = self.toolchain()?;
        let mut built = Vec::new();
        for (font, convert, build) in self.jobs(&toolchain) {
            timer.time(Step::Convert(font.style_name.clone()), || {
                convert.run(runner)
            })?;
            timer.time(Step::Build(font.style_name.clone()), || {
                build.run(runner, &self.config.variable_axes)
            })?;
            built.push(build.config_file().to_path_buf());
        }

        let published = if self.flags.contains(Flags::SKIP_PUBLISH) {
            warn!("Not copying bitmap sources");
            Vec::new()
        } else {
            timer.time(Step::Publish, || {
                publish(self.paths.source_dir(), self.paths.publish_dir())
            })?
        };

        Ok(Report {
            timer,
            built,
            published,
        })
    }
}
