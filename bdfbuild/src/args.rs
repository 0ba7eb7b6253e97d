//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::{config::DEFAULT_CONFIG_FILE, Flags};

/// Build a pixel font family: venv, BDF to UFO, font builder, copy the BDFs.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version)]
pub struct Args {
    /// The project file; paths inside it are relative to its directory
    #[arg(short, long)]
    #[clap(default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Print the commands that would run, then stop
    #[arg(long)]
    pub dry_run: bool,

    /// Don't create or use the virtual environment, run tools from PATH
    #[arg(long)]
    pub skip_venv: bool,

    /// Don't copy the BDF sources to the publish directory
    #[arg(long)]
    pub skip_publish: bool,

    /// Only build fonts whose style name or source file matches this regex
    #[arg(long)]
    pub only: Option<String>,

    /// Log debug output, and ask the converter to do the same
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Collect various relevant flags into a [`Flags`] object.
    pub fn flags(&self) -> Flags {
        let mut flags = Flags::default();

        flags.set(Flags::DRY_RUN, self.dry_run);
        flags.set(Flags::SKIP_VENV, self.skip_venv);
        flags.set(Flags::SKIP_PUBLISH, self.skip_publish);
        flags.set(Flags::VERBOSE, self.verbose);

        flags
    }
}
