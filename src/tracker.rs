//! The markdown tracker recording every icon slot.
//!
//! Entries are parsed into records that remember which line they came from.
//! Edits are kept as line overrides on top of the original text, so a render
//! reproduces every untouched line byte for byte.

use std::{
    collections::{BTreeMap, VecDeque},
    io::Write,
    path::Path,
    sync::LazyLock,
};

use regex::{NoExpand, Regex};

use crate::{error::TrackerError, tier::Tier};

pub const CATALOG_SIZE: usize = 150;
pub const SUMMARY_LINE_INDEX: usize = 2;
pub const COMPLETE_MARKER: &str = "[x]";
pub const INCOMPLETE_MARKER: &str = "[ ]";
pub const AUTO_INGESTED_DESCRIPTION: &str = "Auto-ingested asset. Clean, circular game icon.";

/// Matches: "123. [x] **Icon Name**"
static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.\s+\[([ x])\]\s+\*\*(.+?)\*\*").expect("Entry pattern is valid")
});

static BOLD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("Bold pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerEntry {
    pub id: u32,
    pub name: String,
    pub is_complete: bool,
    pub tier: Tier,
    /// 0-based index of the entry's line in the tracker.
    pub line_index: usize,
}

/// Returns the tier a section header announces, if the line is one.
///
/// Headers look like "## Tier 3: Rare Items". Tiers are checked in ascending
/// order so the first advertised number wins.
pub fn section_header_tier(line: &str) -> Option<Tier> {
    if !(line.contains("Tier") && line.contains("Items")) {
        return None;
    }
    Tier::ALL
        .into_iter()
        .find(|tier| line.contains(&format!("Tier {}:", tier.number())))
}

/// Parses "<id>. [ |x] **<name>**" into (id, is_complete, name).
pub fn parse_entry_line(line: &str) -> Option<(u32, bool, String)> {
    let captures = ENTRY_PATTERN.captures(line)?;
    let id = captures[1].parse().ok()?;
    let is_complete = &captures[2] == "x";
    Some((id, is_complete, captures[3].to_string()))
}

fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tracker {
    lines: Vec<String>,
    overrides: BTreeMap<usize, String>,
    entries: BTreeMap<u32, TrackerEntry>,
    first_seen: Vec<u32>,
}

impl Tracker {
    pub fn load(path: &Path) -> Result<Self, TrackerError> {
        if !path.exists() {
            return Err(TrackerError::TrackerNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|e| TrackerError::io(path, e))?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
        let mut entries = BTreeMap::new();
        let mut first_seen = Vec::new();
        let mut current_tier = Tier::Common;

        for (line_index, line) in lines.iter().enumerate() {
            if let Some(tier) = section_header_tier(line) {
                current_tier = tier;
            }

            let Some((id, is_complete, name)) = parse_entry_line(line) else {
                continue;
            };

            let entry = TrackerEntry {
                id,
                name,
                is_complete,
                tier: current_tier,
                line_index,
            };
            if entries.insert(id, entry).is_some() {
                log::warn!(
                    "Duplicate tracker id {} on line {}, keeping the later entry",
                    id,
                    line_index + 1
                );
            } else {
                first_seen.push(id);
            }
        }

        Self {
            lines,
            overrides: BTreeMap::new(),
            entries,
            first_seen,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: u32) -> Option<&TrackerEntry> {
        self.entries.get(&id)
    }

    /// Entries in the order their ids first appear in the file.
    pub fn entries(&self) -> impl Iterator<Item = &TrackerEntry> {
        self.first_seen.iter().filter_map(|id| self.entries.get(id))
    }

    /// Ids of incomplete entries, in file order.
    pub fn incomplete_ids(&self) -> VecDeque<u32> {
        self.entries()
            .filter(|entry| !entry.is_complete)
            .map(|entry| entry.id)
            .collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Current text of a line, edits included.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.overrides
            .get(&index)
            .or_else(|| self.lines.get(index))
            .map(String::as_str)
    }

    /// The line after an entry, which by convention holds its description.
    pub fn description_line(&self, id: u32) -> Option<&str> {
        let entry = self.entries.get(&id)?;
        self.line(entry.line_index + 1)
    }

    fn set_line(&mut self, index: usize, text: String) {
        if self.lines.get(index) == Some(&text) {
            self.overrides.remove(&index);
        } else {
            self.overrides.insert(index, text);
        }
    }

    /// Flips the entry's checkbox to complete. Returns false for unknown ids.
    pub fn mark_complete(&mut self, id: u32) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        entry.is_complete = true;
        let line_index = entry.line_index;
        if let Some(line) = self.line(line_index) {
            let updated = line.replace(INCOMPLETE_MARKER, COMPLETE_MARKER);
            self.set_line(line_index, updated);
        }
        true
    }

    /// Replaces the bolded name on the entry's line.
    pub fn rename(&mut self, id: u32, name: &str) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        entry.name = name.to_string();
        let line_index = entry.line_index;
        if let Some(line) = self.line(line_index) {
            let bolded = format!("**{name}**");
            let updated = BOLD_PATTERN.replace_all(line, NoExpand(&bolded)).into_owned();
            self.set_line(line_index, updated);
        }
        true
    }

    /// Overwrites the line following the entry. Skipped when that line does
    /// not exist.
    pub fn set_description(&mut self, id: u32, description: &str) -> bool {
        let Some(entry) = self.entries.get(&id) else {
            return false;
        };
        let index = entry.line_index + 1;
        let Some(current) = self.line(index) else {
            log::debug!("No description line after id {}", id);
            return false;
        };
        let updated = format!("{description}{}", line_ending(current));
        self.set_line(index, updated);
        true
    }

    /// Number of lines carrying the complete marker, across the whole file.
    pub fn count_complete(&self) -> usize {
        (0..self.lines.len())
            .filter_map(|index| self.line(index))
            .filter(|line| line.contains(COMPLETE_MARKER))
            .count()
    }

    /// Rewrites the summary line with the recomputed completion count.
    pub fn update_summary(&mut self) -> usize {
        let complete = self.count_complete();
        match self.line(SUMMARY_LINE_INDEX) {
            Some(current) => {
                let updated = format!(
                    "**Total Status**: {}/{} Complete{}",
                    complete,
                    CATALOG_SIZE,
                    line_ending(current)
                );
                self.set_line(SUMMARY_LINE_INDEX, updated);
            }
            None => log::warn!(
                "Tracker has no line {} to hold the summary",
                SUMMARY_LINE_INDEX + 1
            ),
        }
        complete
    }

    pub fn is_modified(&self) -> bool {
        !self.overrides.is_empty()
    }

    pub fn render(&self) -> String {
        (0..self.lines.len())
            .filter_map(|index| self.line(index))
            .collect()
    }

    /// Writes the rendered tracker in one step by persisting a temp file over
    /// the target.
    pub fn save(&self, path: &Path) -> Result<(), TrackerError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| TrackerError::io(dir, e))?;
        file.write_all(self.render().as_bytes())
            .map_err(|e| TrackerError::io(file.path(), e))?;
        file.persist(path)
            .map_err(|e| TrackerError::io(path, e.error))?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) const SAMPLE: &str = "\
# Icon Tracker

**Total Status**: 1/150 Complete

## Tier 1: Common Items
1. [x] **Ember**
A small glowing coal.
2. [ ] **Placeholder Two**
Game asset icon, a stone
3. [ ] **Frost Shard**
A sliver of ice.

## Tier 2: Uncommon Items
4. [ ] **Storm Feather**
Crackling feather.
";

    #[test]
    fn test_tiers_follow_latest_header() {
        let tracker = Tracker::parse(SAMPLE);
        let tiers: Vec<(u32, Tier)> = tracker.entries().map(|e| (e.id, e.tier)).collect();
        assert_eq!(
            tiers,
            vec![
                (1, Tier::Common),
                (2, Tier::Common),
                (3, Tier::Common),
                (4, Tier::Uncommon),
            ]
        );
    }

    #[test]
    fn test_tiers_across_many_sections() {
        let mut text = String::from("# Tracker\n\n**Total Status**: 0/150 Complete\n");
        let mut expected = Vec::new();
        let mut id = 1;
        for tier in Tier::ALL {
            text.push_str(&format!("\n### Tier {}: {} Items\n", tier.number(), tier.name()));
            for _ in 0..3 {
                text.push_str(&format!("{id}. [ ] **Icon {id}**\nDescription {id}\n"));
                expected.push((id, tier));
                id += 1;
            }
        }

        let tracker = Tracker::parse(&text);
        let actual: Vec<(u32, Tier)> = tracker.entries().map(|e| (e.id, e.tier)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_entries_before_any_header_are_common() {
        let tracker = Tracker::parse("7. [ ] **Loose**\n");
        assert_eq!(tracker.entry(7).map(|e| e.tier), Some(Tier::Common));
    }

    #[test]
    fn test_unknown_tier_number_keeps_current_tier() {
        let text = "## Tier 3: Rare Items\n1. [ ] **A**\n## Tier 11: Bogus Items\n2. [ ] **B**\n";
        let tracker = Tracker::parse(text);
        assert_eq!(tracker.entry(2).map(|e| e.tier), Some(Tier::Rare));
    }

    #[test]
    fn test_tier_ten_is_not_tier_one() {
        assert_eq!(
            section_header_tier("## Tier 10: Divine Items"),
            Some(Tier::Divine)
        );
        assert_eq!(section_header_tier("## Tier 1: Common"), None);
        assert_eq!(section_header_tier("Items of Tier 4: Epic"), Some(Tier::Epic));
    }

    #[test]
    fn test_checkbox_parsing() {
        let tracker = Tracker::parse(SAMPLE);
        assert_eq!(tracker.entry(1).map(|e| e.is_complete), Some(true));
        assert_eq!(tracker.entry(2).map(|e| e.is_complete), Some(false));
        assert_eq!(tracker.entry(4).map(|e| e.name.as_str()), Some("Storm Feather"));
        assert_eq!(tracker.entry(3).map(|e| e.line_index), Some(9));
    }

    #[test]
    fn test_malformed_lines_are_ignored() {
        assert_eq!(parse_entry_line("12. [X] **Upper Case Box**"), None);
        assert_eq!(parse_entry_line("12. [ ] Not Bold"), None);
        assert_eq!(parse_entry_line(" 12. [ ] **Indented**"), None);
        assert_eq!(
            parse_entry_line("12.  [x]  **Spaced** trailing"),
            Some((12, true, "Spaced".to_string()))
        );
    }

    #[test]
    fn test_incomplete_ids_in_file_order() {
        let tracker = Tracker::parse("3. [ ] **C**\n1. [ ] **A**\n2. [x] **B**\n");
        assert_eq!(tracker.incomplete_ids(), VecDeque::from([3, 1]));
    }

    #[test]
    fn test_duplicate_id_keeps_last() {
        let tracker = Tracker::parse("1. [ ] **First**\n2. [ ] **Two**\n1. [x] **Second**\n");
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.entry(1).map(|e| e.name.as_str()), Some("Second"));
        assert_eq!(tracker.incomplete_ids(), VecDeque::from([2]));
    }

    #[test]
    fn test_untouched_render_is_identical() {
        let tracker = Tracker::parse(SAMPLE);
        assert!(!tracker.is_modified());
        assert_eq!(tracker.render(), SAMPLE);
    }

    #[test]
    fn test_edits_rewrite_only_their_lines() {
        let mut tracker = Tracker::parse(SAMPLE);
        assert!(tracker.mark_complete(2));
        assert!(tracker.rename(2, "Ember Stone"));
        assert!(tracker.set_description(2, AUTO_INGESTED_DESCRIPTION));
        assert!(!tracker.mark_complete(99));

        let rendered = tracker.render();
        let expected = SAMPLE
            .replace("2. [ ] **Placeholder Two**", "2. [x] **Ember Stone**")
            .replace("Game asset icon, a stone", AUTO_INGESTED_DESCRIPTION);
        assert_eq!(rendered, expected);
        assert_eq!(tracker.entry(2).map(|e| e.name.as_str()), Some("Ember Stone"));
    }

    #[test]
    fn test_description_skipped_on_last_line() {
        let mut tracker = Tracker::parse("# T\n\nsummary\n1. [ ] **Last**");
        assert!(!tracker.set_description(1, AUTO_INGESTED_DESCRIPTION));
        assert_eq!(tracker.render(), "# T\n\nsummary\n1. [ ] **Last**");
    }

    #[test]
    fn test_summary_counts_every_complete_line() {
        let mut text = String::from("# Tracker\n\n**Total Status**: 3/150 Complete\n");
        for id in 1..=50 {
            let mark = if id <= 42 { "x" } else { " " };
            text.push_str(&format!("{id}. [{mark}] **Icon {id}**\n"));
        }

        let mut tracker = Tracker::parse(&text);
        assert_eq!(tracker.update_summary(), 42);
        assert_eq!(
            tracker.line(SUMMARY_LINE_INDEX),
            Some("**Total Status**: 42/150 Complete\n")
        );
    }

    #[test]
    fn test_save_writes_rendered_text() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("tracker.txt");
        std::fs::write(&path, SAMPLE)?;

        let mut tracker = Tracker::load(&path)?;
        tracker.mark_complete(3);
        tracker.update_summary();
        tracker.save(&path)?;

        let saved = std::fs::read_to_string(&path)?;
        assert!(saved.contains("3. [x] **Frost Shard**"));
        assert!(saved.contains("**Total Status**: 2/150 Complete\n"));
        Ok(())
    }

    #[test]
    fn test_load_missing_tracker() {
        let result = Tracker::load(Path::new("definitely/not/here.txt"));
        assert!(matches!(result, Err(TrackerError::TrackerNotFound(_))));
    }
}
