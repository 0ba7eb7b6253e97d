//! BDF to UFO: running the conversion script for one font

use std::path::{Path, PathBuf};

use log::info;

use crate::{
    axes::{format_axes, format_limits, format_location},
    config::{FontSource, ProjectConfig},
    metadata::FlagWriter,
    paths::Paths,
    process::{Invocation, Runner},
    require_dir,
    venv::Toolchain,
    Error,
};

/// Converts one BDF into UFO masters, a designspace and a builder config
#[derive(Debug, Clone)]
pub struct ConvertJob {
    input: PathBuf,
    output_dir: PathBuf,
    builder_config: PathBuf,
    invocation: Invocation,
}

/// The converter flags for one font, everything between the script and the paths
pub fn converter_flags(config: &ProjectConfig, font: &FontSource, verbose: bool) -> Vec<String> {
    let mut w = FlagWriter::default();
    w.switch("verbose", verbose);
    w.value("family-name", &config.metadata.family_name);
    w.value("style-name", &font.style_name);
    let mut flags = w.finish();
    flags.extend(config.metadata.flags());

    let mut w = FlagWriter::default();
    if !config.axes_limits.is_empty() {
        w.value("axes-limits", format_limits(&config.axes_limits));
    }
    if !config.variable_axes.is_empty() {
        w.value("variable-axes", format_axes(&config.variable_axes));
    }
    for instance in &config.instances {
        w.value("variable-instance", instance.flag_value());
    }
    if !config.static_axes.is_empty() {
        w.value("static-axes", format_location(&config.static_axes));
    }
    flags.extend(w.finish());
    flags.extend(font.extra_args.iter().cloned());
    flags
}

impl ConvertJob {
    pub fn new(
        config: &ProjectConfig,
        font: &FontSource,
        paths: &Paths,
        toolchain: &Toolchain,
        verbose: bool,
    ) -> ConvertJob {
        let input = paths.source_file(font);
        let output_dir = paths.build_dir().to_path_buf();
        let invocation = toolchain
            .python_invocation()
            .arg(paths.converter())
            .args(converter_flags(config, font, verbose))
            .arg(&input)
            .arg(&output_dir)
            .current_dir(paths.root());
        ConvertJob {
            input,
            output_dir,
            builder_config: paths.builder_config(&config.metadata.family_name, &font.style_name),
            invocation,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Where the converter will leave the config for the builder
    pub fn builder_config(&self) -> &Path {
        &self.builder_config
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    pub fn run(&self, runner: &mut dyn Runner) -> Result<(), Error> {
        if !self.input.is_file() {
            return Err(Error::FileExpected(self.input.clone()));
        }
        require_dir(&self.output_dir)?;
        info!("Converting {}", self.input.display());
        runner.run(&self.invocation)
    }
}
