//! Ingestion: bind new images in the assets directory to tracker slots, copy
//! them into the tiered icon tree and record the result in the tracker.
//!
//! Copies are not transactional with the tracker save. A crash between the
//! two leaves icons on disk that the tracker does not list yet. Running two
//! ingestions against the same tracker at once is unsafe.

use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::{
    args::ProjectPaths,
    error::TrackerError,
    matcher::{Assignment, IconMatcher, title_from_file_name},
    tier::Tier,
    tracker::{AUTO_INGESTED_DESCRIPTION, Tracker},
};

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub threshold: f32,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub matched: usize,
    pub newly_assigned: usize,
    pub skipped: Vec<String>,
    pub remaining_empty_slots: usize,
    pub total_complete: usize,
}

impl IngestReport {
    pub fn processed(&self) -> usize {
        self.matched + self.newly_assigned
    }
}

/// PNG files in `dir`, any extension case, sorted by name.
pub fn list_png_assets(dir: &Path) -> Result<Vec<String>, TrackerError> {
    if !dir.is_dir() {
        return Err(TrackerError::AssetsDirNotFound(dir.to_path_buf()));
    }

    let mut assets = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| TrackerError::io(dir, e))? {
        let entry = entry.map_err(|e| TrackerError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() || !matches!(ImageFormat::from_path(&path), Ok(ImageFormat::Png)) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            assets.push(name.to_string());
        } else {
            log::warn!("Skipping asset with a non UTF-8 name: {:?}", path);
        }
    }
    assets.sort();
    Ok(assets)
}

pub fn icon_destination(icons_dir: &Path, tier: Tier, id: u32) -> PathBuf {
    icons_dir
        .join(tier.folder_name())
        .join(format!("icon_{id}.png"))
}

/// Copies `source` over `destination` and carries the source's modification
/// time across.
pub fn copy_preserving_mtime(source: &Path, destination: &Path) -> Result<(), TrackerError> {
    std::fs::copy(source, destination).map_err(|e| TrackerError::io(source, e))?;
    let modified = std::fs::metadata(source)
        .and_then(|metadata| metadata.modified())
        .map_err(|e| TrackerError::io(source, e))?;
    std::fs::File::options()
        .write(true)
        .open(destination)
        .and_then(|file| file.set_modified(modified))
        .map_err(|e| TrackerError::io(destination, e))?;
    Ok(())
}

pub fn create_tier_dirs(icons_dir: &Path) -> Result<(), TrackerError> {
    for tier in Tier::ALL {
        let dir = icons_dir.join(tier.folder_name());
        std::fs::create_dir_all(&dir).map_err(|e| TrackerError::io(&dir, e))?;
    }
    Ok(())
}

/// Records an assignment in the tracker: the slot is checked off, and a slot
/// claimed by an unmatched asset also takes the asset's name and the
/// auto-ingested description.
pub fn apply_assignment(tracker: &mut Tracker, assignment: Assignment, file_name: &str) {
    let Some(id) = assignment.target() else {
        return;
    };
    tracker.mark_complete(id);
    if assignment.is_new_assignment() {
        tracker.rename(id, &title_from_file_name(file_name));
        tracker.set_description(id, AUTO_INGESTED_DESCRIPTION);
    }
}

pub fn ingest(paths: &ProjectPaths, options: &IngestOptions) -> Result<IngestReport, TrackerError> {
    let tracker_path = paths.tracker();
    let mut tracker = Tracker::load(&tracker_path)?;
    let mut matcher = IconMatcher::new(&tracker, options.threshold);
    log::info!(
        "Found {} tracked icons. {} empty slots.",
        tracker.len(),
        matcher.empty_slots().len()
    );

    let assets_dir = paths.assets_dir();
    let assets = list_png_assets(&assets_dir)?;
    log::info!("Found {} asset files in {:?}", assets.len(), assets_dir);

    let icons_dir = paths.icons_dir();
    if !options.dry_run {
        create_tier_dirs(&icons_dir)?;
    }

    let mut report = IngestReport::default();
    for file_name in &assets {
        let assignment = matcher.assign(file_name);
        let Some(id) = assignment.target() else {
            log::warn!(
                "No matches and no empty slots for {:?}. Skipping.",
                file_name
            );
            report.skipped.push(file_name.clone());
            continue;
        };

        let tier = tracker.entry(id).map(|entry| entry.tier).unwrap_or_default();
        let source = assets_dir.join(file_name);
        let destination = icon_destination(&icons_dir, tier, id);
        if options.dry_run {
            log::info!("Would copy {:?} to {:?}", source, destination);
        } else {
            log::debug!("Copying {:?} to {:?}", source, destination);
            copy_preserving_mtime(&source, &destination)?;
        }

        match assignment {
            Assignment::Matched(_) => report.matched += 1,
            Assignment::NewSlot(_) => report.newly_assigned += 1,
            Assignment::Skipped => {}
        }
        apply_assignment(&mut tracker, assignment, file_name);
    }

    report.total_complete = tracker.update_summary();
    report.remaining_empty_slots = matcher.empty_slots().len();

    if options.dry_run {
        log::info!("Dry run, tracker left untouched");
    } else if tracker.is_modified() {
        tracker.save(&tracker_path)?;
    }

    Ok(report)
}
