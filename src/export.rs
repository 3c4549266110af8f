//! Turns the tracker into the JSON lookup the game loads its icons from.

use std::{collections::BTreeMap, path::Path};

use serde::Serialize;

use crate::{
    error::TrackerError,
    tier::Tier,
    tracker::{Tracker, TrackerEntry},
};

pub const RAW_PROMPT_PREFIX: &str = "Game asset icon";
pub const FALLBACK_DESCRIPTION: &str = "Collectible Game Icon";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRecord {
    pub id: u32,
    pub name: String,
    pub tier: u8,
    pub description: String,
    pub image_url: String,
}

pub fn image_url(tier: Tier, id: u32) -> String {
    format!("/icons/{}/icon_{}.png", tier.folder_name(), id)
}

/// Description from the line after an entry. Raw generation prompts are
/// replaced by a generic label, blank or missing lines give "".
pub fn derive_description(next_line: Option<&str>) -> String {
    let Some(line) = next_line.map(str::trim) else {
        return String::new();
    };
    if line.starts_with(RAW_PROMPT_PREFIX) {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        line.to_string()
    }
}

impl IconRecord {
    fn from_entry(entry: &TrackerEntry, tracker: &Tracker) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
            tier: entry.tier.number(),
            description: derive_description(tracker.description_line(entry.id)),
            image_url: image_url(entry.tier, entry.id),
        }
    }
}

/// Every entry, complete or not, keyed by id.
pub fn build_records(tracker: &Tracker) -> BTreeMap<u32, IconRecord> {
    tracker
        .entries()
        .map(|entry| (entry.id, IconRecord::from_entry(entry, tracker)))
        .collect()
}

pub fn to_json(records: &BTreeMap<u32, IconRecord>) -> Result<String, TrackerError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Reads the tracker and writes its records to `output`, replacing any
/// previous export. Returns the number of records written.
pub fn export_icons(tracker_path: &Path, output: &Path) -> Result<usize, TrackerError> {
    let tracker = Tracker::load(tracker_path)?;
    let records = build_records(&tracker);
    let json = to_json(&records)?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| TrackerError::io(parent, e))?;
    }
    std::fs::write(output, json).map_err(|e| TrackerError::io(output, e))?;

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tracker::tests::SAMPLE;

    #[test]
    fn test_record_shape() {
        let tracker = Tracker::parse("## Tier 1: Common Items\n7. [x] **Ember**\nA warm coal.\n");
        let records = build_records(&tracker);
        assert_eq!(
            records.get(&7),
            Some(&IconRecord {
                id: 7,
                name: "Ember".to_string(),
                tier: 1,
                description: "A warm coal.".to_string(),
                image_url: "/icons/Tier_1_Common/icon_7.png".to_string(),
            })
        );
    }

    #[test]
    fn test_description_rules() {
        assert_eq!(derive_description(Some("  Crackling feather.\n")), "Crackling feather.");
        assert_eq!(
            derive_description(Some("Game asset icon, a stone\n")),
            FALLBACK_DESCRIPTION
        );
        assert_eq!(derive_description(Some("\n")), "");
        assert_eq!(derive_description(None), "");
    }

    #[test]
    fn test_exports_incomplete_entries_too() {
        let tracker = Tracker::parse(SAMPLE);
        let records = build_records(&tracker);
        assert_eq!(records.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(records[&2].description, FALLBACK_DESCRIPTION);
        assert_eq!(records[&4].image_url, "/icons/Tier_2_Uncommon/icon_4.png");
    }

    #[test]
    fn test_ultra_epic_url_keeps_space() {
        assert_eq!(
            image_url(Tier::UltraEpic, 61),
            "/icons/Tier_5_Ultra Epic/icon_61.png"
        );
    }

    #[test]
    fn test_json_uses_camel_case_and_id_keys() -> anyhow::Result<()> {
        let tracker = Tracker::parse("## Tier 1: Common Items\n7. [x] **Ember**\nA warm coal.\n");
        let json = to_json(&build_records(&tracker))?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["7"]["imageUrl"], "/icons/Tier_1_Common/icon_7.png");
        assert_eq!(value["7"]["tier"], 1);
        assert!(json.contains("\n  \"7\": {\n"));
        Ok(())
    }

    #[test]
    fn test_export_writes_file() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let tracker_path = dir.path().join("tracker.txt");
        let output = dir.path().join("src/utils/icons.json");
        std::fs::write(&tracker_path, SAMPLE)?;

        assert_eq!(export_icons(&tracker_path, &output)?, 4);
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
        assert_eq!(value["3"]["name"], "Frost Shard");
        Ok(())
    }

    #[test]
    fn test_export_missing_tracker() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let result = export_icons(&dir.path().join("nope.txt"), &dir.path().join("out.json"));
        assert!(matches!(result, Err(TrackerError::TrackerNotFound(_))));
    }
}
