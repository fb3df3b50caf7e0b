use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::types::{FixtureKey, MatchRecord, Outcome};

pub const CSV_HEADER: [&str; 6] = [
    "Season",
    "Home_Team",
    "Away_Team",
    "Home_Goals",
    "Away_Goals",
    "Outcome",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// The long-lived match collection backing the whole project. Loaded once
/// at the start of an update run, merged against, and saved once at the
/// end; never ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterDataset {
    records: Vec<MatchRecord>,
}

impl MasterDataset {
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }

    /// Loads the persisted dataset. A missing file is the empty dataset,
    /// not an error: the first run bootstraps from nothing.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            info!("Master file {:?} not found, starting empty", path);
            return Ok(Self::default());
        }
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for result in reader.deserialize() {
            let mut record: MatchRecord = result?;
            // The outcome column is derived data; recompute rather than trust.
            record.outcome = Outcome::from_goals(record.home_goals, record.away_goals);
            records.push(record);
        }
        Ok(Self { records })
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_records(path, &self.records)
    }

    /// Folds freshly scraped records in, newest observation winning per
    /// fixture key. Returns the net change in size; negative only when a
    /// legacy file carried internal duplicate keys.
    pub fn merge(&mut self, new_records: Vec<MatchRecord>) -> i64 {
        let (merged, added) = merge_records(std::mem::take(&mut self.records), new_records);
        self.records = merged;
        added
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Deduplicating merge: existing and new records are folded in insertion
/// order and the last record per fixture key wins, so a re-scraped season
/// whose table was corrected replaces its old observations. Pure: the same
/// inputs always yield the same set and count, and re-merging identical new
/// data adds nothing.
pub fn merge_records(
    existing: Vec<MatchRecord>,
    new_records: Vec<MatchRecord>,
) -> (Vec<MatchRecord>, i64) {
    let before = existing.len() as i64;
    let capacity = existing.len() + new_records.len();
    let mut slots: HashMap<FixtureKey, usize> = HashMap::with_capacity(capacity);
    let mut merged: Vec<MatchRecord> = Vec::with_capacity(capacity);

    for record in existing.into_iter().chain(new_records) {
        match slots.entry(record.fixture_key()) {
            Entry::Occupied(slot) => merged[*slot.get()] = record,
            Entry::Vacant(slot) => {
                slot.insert(merged.len());
                merged.push(record);
            }
        }
    }

    let added = merged.len() as i64 - before;
    (merged, added)
}

/// Writes records in the exact column layout the feature and model scripts
/// consume. An empty set still gets the header row.
pub fn write_records(path: &Path, records: &[MatchRecord]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record(&CSV_HEADER)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
