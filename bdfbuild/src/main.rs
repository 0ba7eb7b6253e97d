use std::{io::Write, path::Path, process::ExitCode};

use bdfbuild::{process::SystemRunner, Args, Error, Flags, Pipeline, ProjectConfig};
use clap::Parser;
use log::{error, info, LevelFilter};

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
        .format(|buf, record| {
            let ts = buf.timestamp_millis();
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{ts}: {style}{}{style:#}: {}",
                record.level(),
                record.args()
            )
        })
        .init();
}

fn run(args: &Args) -> Result<(), Error> {
    let config = ProjectConfig::load(&args.config)?;
    // everything in the project file is relative to it
    let root = match args.config.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let root = root.canonicalize().map_err(|e| Error::FileIo {
        path: root.to_path_buf(),
        source: e,
    })?;

    let pipeline =
        Pipeline::new(&root, config, args.flags()).with_font_filter(args.only.as_deref())?;

    if pipeline.flags().contains(Flags::DRY_RUN) {
        for invocation in pipeline.plan()? {
            println!("{invocation}");
        }
        if !pipeline.flags().contains(Flags::SKIP_PUBLISH) {
            println!(
                "cp {}/*.bdf {}",
                pipeline.paths().source_dir().display(),
                pipeline.paths().publish_dir().display()
            );
        }
        return Ok(());
    }

    let report = pipeline.run(&mut SystemRunner)?;
    for line in report.timer.summary() {
        info!("{line}");
    }
    info!(
        "Built {} font(s), published {} bitmap font(s) in {:.1}s",
        report.built.len(),
        report.published.len(),
        report.timer.total().as_secs_f64()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
