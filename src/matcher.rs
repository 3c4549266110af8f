//! Binding asset files to tracker slots.
//!
//! An asset is first matched by name against every tracker entry. When no
//! name is close enough it takes the next empty slot instead.

use std::{
    collections::{BTreeMap, VecDeque},
    path::Path,
};

use similar::TextDiff;

use crate::tracker::Tracker;

pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.85;

/// Lower-cases, trims and turns underscores and hyphens into spaces.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().trim().replace(['_', '-'], " ")
}

/// File name without its extension.
pub fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
}

/// Display name for an asset that claimed an empty slot, "ember_stone.png"
/// becomes "Ember Stone".
pub fn title_from_file_name(file_name: &str) -> String {
    title_case(&file_stem(file_name).replace('_', " "))
}

/// Upper-cases the first character of every run of cased letters and
/// lower-cases the rest, so "fire-egg 3d" becomes "Fire-Egg 3D". Letters
/// without case, like CJK, start a new run.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_cased = false;
    for c in text.chars() {
        if previous_is_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_cased = c.is_lowercase() || c.is_uppercase();
    }
    out
}

/// Similarity in [0, 1]: twice the matched characters over the combined
/// length of both strings.
pub fn similarity(a: &str, b: &str) -> f32 {
    TextDiff::from_chars(a, b).ratio()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// The asset's name matched an existing entry.
    Matched(u32),
    /// No name matched, the asset claimed this empty slot.
    NewSlot(u32),
    /// No name matched and no empty slot was left.
    Skipped,
}

impl Assignment {
    pub fn target(&self) -> Option<u32> {
        match self {
            Assignment::Matched(id) | Assignment::NewSlot(id) => Some(*id),
            Assignment::Skipped => None,
        }
    }

    pub fn is_new_assignment(&self) -> bool {
        matches!(self, Assignment::NewSlot(_))
    }
}

#[derive(Debug, Clone)]
pub struct IconMatcher {
    /// Normalized tracker name -> id. A later entry with the same normalized
    /// name replaces an earlier one.
    names: BTreeMap<String, u32>,
    empty_slots: VecDeque<u32>,
    threshold: f32,
}

impl IconMatcher {
    /// Snapshots the tracker's names and empty slots. Renames made later in the
    /// run are not matched against.
    pub fn new(tracker: &Tracker, threshold: f32) -> Self {
        let names = tracker
            .entries()
            .map(|entry| (normalize_name(&entry.name), entry.id))
            .collect();
        Self {
            names,
            empty_slots: tracker.incomplete_ids(),
            threshold,
        }
    }

    pub fn empty_slots(&self) -> &VecDeque<u32> {
        &self.empty_slots
    }

    /// The closest tracker name at or above the threshold. Ties go to the
    /// lexicographically greatest name.
    pub fn best_match(&self, normalized: &str) -> Option<(u32, f32)> {
        self.names
            .iter()
            .map(|(name, id)| (name, *id, similarity(normalized, name)))
            .filter(|(_, _, score)| *score >= self.threshold)
            .max_by(|(name_a, _, a), (name_b, _, b)| a.total_cmp(b).then(name_a.cmp(name_b)))
            .map(|(_, id, score)| (id, score))
    }

    pub fn assign(&mut self, file_name: &str) -> Assignment {
        let normalized = normalize_name(file_stem(file_name));

        if let Some((id, score)) = self.best_match(&normalized) {
            log::debug!("Matched {:?} to id {} ({:.2})", file_name, id, score);
            // A matched slot is filled now, it must not be handed out again.
            self.empty_slots.retain(|slot| *slot != id);
            return Assignment::Matched(id);
        }

        match self.empty_slots.pop_front() {
            Some(id) => {
                log::debug!("Assigning {:?} to empty slot {}", file_name, id);
                Assignment::NewSlot(id)
            }
            None => Assignment::Skipped,
        }
    }
}
