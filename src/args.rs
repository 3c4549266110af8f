use std::path::{Path, PathBuf};

use clap::Parser;

use crate::matcher::DEFAULT_MATCH_THRESHOLD;

pub const TRACKER_FILE_NAME: &str = "remaining_icons_prompts.txt";

/// Where everything lives, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Walks up from `start` to the first directory holding the tracker,
    /// falling back to `start` itself.
    pub fn detect(start: &Path) -> Self {
        let root = start
            .ancestors()
            .find(|dir| dir.join(TRACKER_FILE_NAME).is_file())
            .unwrap_or(start);
        Self::new(root)
    }

    /// Uses the explicit root if one was given, otherwise detects it from the
    /// working directory.
    pub fn resolve(explicit: Option<PathBuf>) -> std::io::Result<Self> {
        match explicit {
            Some(root) => Ok(Self::new(root)),
            None => Ok(Self::detect(&std::env::current_dir()?)),
        }
    }

    pub fn tracker(&self) -> PathBuf {
        self.root.join(TRACKER_FILE_NAME)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn icons_dir(&self) -> PathBuf {
        self.root.join("public").join("icons")
    }

    pub fn icon_data_json(&self) -> PathBuf {
        self.root.join("src").join("utils").join("icons.json")
    }
}

fn parse_threshold(value: &str) -> Result<f32, String> {
    let threshold: f32 = value
        .parse()
        .map_err(|e| format!("{value:?} is not a number: {e}"))?;
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(format!("threshold must be between 0 and 1, got {value}"))
    }
}

/// Copies new icon images into the tiered icon tree and records them in the
/// tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct IngestCli {
    /// Project root. Detected from the working directory when omitted.
    #[arg(long, env = "ICON_TRACKER_ROOT")]
    pub project_root: Option<PathBuf>,

    /// Minimum name similarity (0 to 1) for an asset to match an existing
    /// entry instead of taking an empty slot.
    #[arg(
        long,
        env = "ICON_TRACKER_THRESHOLD",
        default_value_t = DEFAULT_MATCH_THRESHOLD,
        value_parser = parse_threshold
    )]
    pub threshold: f32,

    /// Log what would happen without copying files or touching the tracker.
    #[arg(long)]
    pub dry_run: bool,
}

/// Exports the tracker as the icon lookup JSON used by the game.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct ExportCli {
    /// Project root. Detected from the working directory when omitted.
    #[arg(long, env = "ICON_TRACKER_ROOT")]
    pub project_root: Option<PathBuf>,
}
