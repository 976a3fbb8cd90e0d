use std::fs;
use std::path;
use crate::common;
use crate::common::meta::TrackMeta;
use crate::rules::{self, RenameRule};
use crate::sanitise::sanitise;

use glob;
use log;
use walkdir;

/// Containers that hold a downloaded episode.
const EPISODE_EXTS : &'static [&'static str] = &["m4a", "mp4"];

/// Always ignored, whatever their extension.
const SKIP_NAMES : &'static [&'static str] = &[".DS_Store", "Icon\r"];

#[derive(Debug, Default, PartialEq)]
pub struct Stats {
    pub moved : usize,
    pub skipped : usize,
    pub failed : usize,
}

/// Walks every source and shelves each episode file it finds under the
/// destination library. Problems with one source or one file are
/// reported and counted, never fatal to the rest of the run.
pub fn run(
    sources : &[String],
    dest : &path::Path,
    rules : &[RenameRule],
    dry_run : bool,
) -> Stats {
    let mut stats = Stats::default();
    for source in sources {
        organise_source(source, dest, rules, dry_run, &mut stats);
    }
    stats
}

fn organise_source(
    source : &str,
    dest : &path::Path,
    rules : &[RenameRule],
    dry_run : bool,
    stats : &mut Stats,
) {
    let paths = match glob::glob(source) {
        Ok(paths) => paths,
        Err(err) => {
            log::error!("invalid source pattern '{}': {}", source, err);
            stats.failed += 1;
            return;
        },
    };
    let mut matched = false;
    for path in paths {
        matched = true;
        match path {
            Ok(path) => organise_tree(&path, dest, rules, dry_run, stats),
            Err(err) => {
                log::error!("cannot access '{}': {}", source, err);
                stats.failed += 1;
            },
        }
    }
    if !matched {
        log::error!("'{}' does not match any files", source);
        stats.failed += 1;
    }
}

fn organise_tree(
    root : &path::Path,
    dest : &path::Path,
    rules : &[RenameRule],
    dry_run : bool,
    stats : &mut Stats,
) {
    for entry in walkdir::WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::error!("cannot walk '{}': {}", root.display(), err);
                stats.failed += 1;
                continue;
            },
        };
        if entry.file_type().is_dir() {
            continue;
        }
        organise_file(entry.path(), dest, rules, dry_run, stats);
    }
}

fn organise_file(
    file : &path::Path,
    dest : &path::Path,
    rules : &[RenameRule],
    dry_run : bool,
    stats : &mut Stats,
) {
    // skip macos crud
    let name = file.file_name().and_then(|x| x.to_str()).unwrap_or_default();
    if SKIP_NAMES.contains(&name) {
        log::debug!("skipping os artifact '{}'", file.display());
        stats.skipped += 1;
        return;
    }
    let ext = file.extension().and_then(|x| x.to_str()).unwrap_or_default();
    if !EPISODE_EXTS.iter().any(|x| ext.eq_ignore_ascii_case(x)) {
        log::debug!("skipping '{}': not an episode container", file.display());
        stats.skipped += 1;
        return;
    }
    let meta = match common::meta::parse(file) {
        Ok(meta) => meta,
        Err(err) => {
            log::error!("cannot read tags from '{}': {}", file.display(), err);
            stats.failed += 1;
            return;
        },
    };
    log::debug!("{:?}", meta);
    match shelve(file, &meta, dest, rules, dry_run) {
        Ok(_) => stats.moved += 1,
        Err(err) => {
            log::error!("cannot move '{}': {}", file.display(), err);
            stats.failed += 1;
        },
    }
}

/// Moves `file` to its computed place under `dest`, creating the show
/// folder on the way. In a dry run the target is computed and reported
/// but nothing on disk changes, not even the folder.
fn shelve(
    file : &path::Path,
    meta : &TrackMeta,
    dest : &path::Path,
    rules : &[RenameRule],
    dry_run : bool,
) -> common::Result<path::PathBuf> {
    let ext = file.extension().and_then(|x| x.to_str()).unwrap_or_default();
    let target = destination(dest, meta, rules, ext);
    log::debug!("moving '{}' to '{}'", file.display(), target.display());
    if dry_run {
        return Ok(target);
    }
    if let Some(show_dir) = target.parent() {
        fs::create_dir_all(show_dir)?;
    }
    fs::rename(file, &target)?;
    Ok(target)
}

/// Pure path arithmetic: `dest / show / "sNN eNN title.ext"`, where the
/// show and title have been through the rule pipeline and the sanitiser.
fn destination(
    dest : &path::Path,
    meta : &TrackMeta,
    rules : &[RenameRule],
    ext : &str,
) -> path::PathBuf {
    let show = sanitise(&rules::apply_with(rules, &meta.album, report_rule_change));
    let title = sanitise(&rules::apply_with(rules, &meta.title, report_rule_change));
    let mut file_name = format!(
        "s{:02} e{:02} {}",
        meta.disc_number, meta.track_number, title
    );
    if !ext.is_empty() {
        file_name.push('.');
        file_name.push_str(ext);
    }
    dest.join(show).join(file_name)
}

fn report_rule_change(index : usize, before : &str, after : &str) {
    log::debug!("rule {} changed '{}' to '{}'", index + 1, before, after);
}
