use crate::config;
use crate::parsing::beatmap;
use crate::parsing::lane::{LanePicker, RandomLanePicker};
use log::{error, info, warn};
use std::fs;
use std::path::Path;

/// Counts for one batch run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConvertSummary {
    pub converted: usize,
    pub skipped: usize,
}

/// Converts every beatmap found one directory below `root`.
///
/// Failures never abort the batch: an unreadable directory, a rejected
/// beatmap, or a write error is logged and the run moves on.
pub fn convert_all(root: &Path) -> ConvertSummary {
    info!("Scanning for beatmap directories in: {:?}", root);
    let mut summary = ConvertSummary::default();
    let mut lanes = RandomLanePicker;

    match fs::read_dir(root) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    convert_directory(&path, &mut lanes, &mut summary);
                }
            }
        }
        Err(e) => {
            error!("Failed to read root directory {:?}: {}", root, e);
        }
    }

    info!(
        "Finished. Converted {} maps, skipped {}.",
        summary.converted, summary.skipped
    );
    summary
}

fn convert_directory(dir: &Path, lanes: &mut dyn LanePicker, summary: &mut ConvertSummary) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to read directory {:?}: {}", dir, e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.to_lowercase() == config::BEATMAP_EXTENSION => {}
            _ => continue,
        }
        convert_file(&path, lanes, summary);
    }
}

fn convert_file(path: &Path, lanes: &mut dyn LanePicker, summary: &mut ConvertSummary) {
    let parsed = match beatmap::parse_beatmap(path, lanes) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Skipping beatmap {:?}: {}", path, e);
            summary.skipped += 1;
            return;
        }
    };
    if !parsed.skipped.is_empty() {
        warn!("{} malformed lines dropped in {:?}", parsed.skipped.len(), path);
    }

    let out_path = path.with_extension(config::OUTPUT_EXTENSION);
    match parsed.map.write(&out_path) {
        Ok(()) => {
            info!(
                "Converted {:?} -> {:?} ({} hit objects)",
                path,
                out_path,
                parsed.map.objects.len()
            );
            summary.converted += 1;
        }
        Err(e) => {
            error!("Failed to write {:?}: {}", out_path, e);
            summary.skipped += 1;
        }
    }
}
