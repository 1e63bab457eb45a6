//! Persisted form of a slot grid.
//!
//! Slots are saved as item numbers rather than full billing codes and are
//! resolved against the code table on load, so a saved session survives rate
//! changes. The weeks are checksummed to catch truncated or hand-edited files.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::codes::BillingCodeTable;
use crate::error::{TimesheetError, TimesheetResult};
use crate::grid::{SlotGrid, SlotSize, WeekColumns, WeekOffset};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Item numbers per slot, per day (Sunday first), per week offset.
pub type SnapshotWeeks = BTreeMap<WeekOffset, Vec<Vec<Option<String>>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub version: u32,
    pub slot_size_minutes: u32,
    pub checksum: String,
    pub weeks: SnapshotWeeks,
}

impl SessionSnapshot {
    pub fn from_grid(grid: &SlotGrid) -> TimesheetResult<Self> {
        let weeks: SnapshotWeeks = grid
            .weeks()
            .map(|(offset, week)| {
                let days: Vec<Vec<Option<String>>> = week
                    .days()
                    .map(|(_, day)| {
                        day.slots()
                            .iter()
                            .map(|slot| slot.as_ref().map(|code| code.item_number.clone()))
                            .collect::<Vec<_>>()
                    })
                    .collect();
                (offset, days)
            })
            .collect();

        Ok(Self {
            version: SNAPSHOT_VERSION,
            slot_size_minutes: grid.slot_size().minutes(),
            checksum: weeks_checksum(&weeks)?,
            weeks,
        })
    }

    /// Rebuilds the grid, resolving item numbers against `table`.
    pub fn to_grid(&self, table: &BillingCodeTable) -> TimesheetResult<SlotGrid> {
        if self.version != SNAPSHOT_VERSION {
            return Err(TimesheetError::SerializationError(format!(
                "unsupported session version {}",
                self.version
            )));
        }
        if weeks_checksum(&self.weeks)? != self.checksum {
            return Err(TimesheetError::SerializationError(
                "session checksum mismatch".to_string(),
            ));
        }

        let slot_size = SlotSize::new(self.slot_size_minutes)?;
        let slots_per_day = slot_size.slots_per_day();
        let mut weeks = BTreeMap::new();
        for (offset, days) in &self.weeks {
            let days = days
                .iter()
                .map(|slots| {
                    slots
                        .iter()
                        .map(|item| match item {
                            Some(item_number) => {
                                table.lookup(item_number).map(|c| Some(Arc::clone(c)))
                            }
                            None => Ok(None),
                        })
                        .collect::<TimesheetResult<Vec<_>>>()
                })
                .collect::<TimesheetResult<Vec<_>>>()?;
            weeks.insert(*offset, WeekColumns::from_days(days, slots_per_day)?);
        }
        SlotGrid::from_weeks(slot_size, weeks)
    }

    pub fn to_json(&self) -> TimesheetResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a snapshot, reporting the JSON path of the first bad field.
    pub fn from_json(content: &str) -> TimesheetResult<Self> {
        let de = &mut serde_json::Deserializer::from_str(content);
        serde_path_to_error::deserialize(de).map_err(|e| {
            TimesheetError::SerializationError(format!("{} at '{}'", e.inner(), e.path()))
        })
    }
}

/// Hex SHA-256 of the JSON form of `weeks`, keyed in ascending offset order.
fn weeks_checksum(weeks: &SnapshotWeeks) -> TimesheetResult<String> {
    let encoded = serde_json::to_vec(weeks)?;
    Ok(hex::encode(Sha256::digest(&encoded)))
}

/// Encodes `grid` for storage.
pub fn encode_grid(grid: &SlotGrid) -> TimesheetResult<String> {
    SessionSnapshot::from_grid(grid)?.to_json()
}

/// Decodes stored content back into a grid.
pub fn decode_grid(content: &str, table: &BillingCodeTable) -> TimesheetResult<SlotGrid> {
    SessionSnapshot::from_json(content)?.to_grid(table)
}
