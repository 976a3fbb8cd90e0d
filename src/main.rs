mod common;
mod cmd_organise;
mod rules;
mod sanitise;

use std::fs;
use std::path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use colog;

/// Shelves downloaded episode audio into show folders, naming each file
/// from its embedded tags. Tag strings are rewritten by the substitution
/// rules in `DEST/rules.json`, if that file exists.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files or directories to organise (supports GLOB file path
    /// syntax), followed by the destination library directory.
    #[arg(value_name = "SOURCE... DEST")]
    paths : Vec<String>,
    /// Report what would happen without moving any files (implies
    /// --verbose).
    #[arg(short = 't', long)]
    dry_run : bool,
    /// Report per-file activity.
    #[arg(short, long)]
    verbose : bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut logger = colog::default_builder();
    logger.filter(None, if cli.verbose || cli.dry_run {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
    logger.init();

    if cli.paths.len() < 2 {
        Cli::command().print_help().expect("cannot print help text");
        return ExitCode::SUCCESS;
    }
    if cli.dry_run {
        log::debug!("running in test mode, no files will be moved");
    }

    let (sources, dest) = cli.paths.split_at(cli.paths.len() - 1);
    let dest = path::Path::new(&dest[0]);
    match fs::metadata(dest) {
        Ok(info) if info.is_dir() => (),
        Ok(_) => {
            log::error!("cannot move files to '{}': not a directory", dest.display());
            return ExitCode::FAILURE;
        },
        Err(err) => {
            log::error!("cannot move files to '{}': {}", dest.display(), err);
            return ExitCode::FAILURE;
        },
    }

    let rules = match rules::load(&common::rules_path(dest)) {
        Ok(rules) => rules,
        Err(err) => {
            log::error!("cannot read rename rules: {}", err);
            return ExitCode::FAILURE;
        },
    };
    log::debug!("read {} rename rules", rules.len());

    let stats = cmd_organise::run(sources, dest, &rules, cli.dry_run);
    log::debug!(
        "{} moved, {} skipped, {} failed",
        stats.moved, stats.skipped, stats.failed
    );
    if stats.failed > 0 {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
