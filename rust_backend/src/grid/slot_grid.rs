//! The multi-week slot grid.
//!
//! A [`SlotGrid`] maps a week offset (0 = the current week) to seven day columns
//! of `slots_per_day` slots each. Weeks are materialized lazily.
//!
//! Grids are values: every operation borrows the current grid and returns a new
//! one. Weeks are reference counted, so a new snapshot only copies the weeks it
//! actually changes and earlier snapshots stay valid.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::geometry::{DayIndex, SlotCoord, SlotSize};
use super::selection::Selection;
use crate::codes::{BillingCode, CodeSlotResolver, DayType};
use crate::error::{TimesheetError, TimesheetResult};

/// Week displacement from the current real-world week.
pub type WeekOffset = i64;

/// Codes assigned to the slots of one day, `None` meaning unbilled.
#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    slots: Vec<Option<Arc<BillingCode>>>,
}

impl DayColumn {
    fn empty(slots_per_day: usize) -> Self {
        Self {
            slots: vec![None; slots_per_day],
        }
    }

    pub fn slots(&self) -> &[Option<Arc<BillingCode>>] {
        &self.slots
    }

    pub fn code(&self, slot: usize) -> Option<&Arc<BillingCode>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn assigned(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// The seven day columns of one week, indexed by [`DayIndex`] (Sunday first).
#[derive(Debug, Clone, PartialEq)]
pub struct WeekColumns {
    days: [DayColumn; 7],
}

impl WeekColumns {
    pub fn empty(slots_per_day: usize) -> Self {
        Self {
            days: std::array::from_fn(|_| DayColumn::empty(slots_per_day)),
        }
    }

    /// Rebuilds a week from raw per-day slot vectors, checking its shape.
    pub fn from_days(
        days: Vec<Vec<Option<Arc<BillingCode>>>>,
        slots_per_day: usize,
    ) -> TimesheetResult<Self> {
        if days.len() != 7 {
            return Err(TimesheetError::InvalidGeometry(format!(
                "a week holds 7 days, got {}",
                days.len()
            )));
        }
        if let Some(bad) = days.iter().find(|d| d.len() != slots_per_day) {
            return Err(TimesheetError::InvalidGeometry(format!(
                "a day holds {} slots, got {}",
                slots_per_day,
                bad.len()
            )));
        }

        let days: [DayColumn; 7] = days
            .into_iter()
            .map(|slots| DayColumn { slots })
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| TimesheetError::InvalidGeometry("a week holds 7 days".to_string()))?;
        Ok(Self { days })
    }

    pub fn day(&self, day: DayIndex) -> &DayColumn {
        &self.days[day.as_usize()]
    }

    /// Days in storage order (Sunday first).
    pub fn days(&self) -> impl Iterator<Item = (DayIndex, &DayColumn)> {
        DayIndex::all().zip(self.days.iter())
    }

    pub fn assigned(&self) -> usize {
        self.days.iter().map(DayColumn::assigned).sum()
    }

    fn set(&mut self, coord: SlotCoord, code: Option<Arc<BillingCode>>) {
        self.days[coord.day.as_usize()].slots[coord.slot] = code;
    }
}

/// Result of a bulk grid operation.
#[derive(Debug, Clone)]
pub struct GridUpdate {
    /// The new grid snapshot.
    pub grid: SlotGrid,
    /// Distinct slots written.
    pub written: usize,
    /// Distinct slots left unchanged (no default code available).
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotGrid {
    slot_size: SlotSize,
    weeks: BTreeMap<WeekOffset, Arc<WeekColumns>>,
}

impl SlotGrid {
    /// Creates an empty grid.
    pub fn new(slot_size: SlotSize) -> Self {
        Self {
            slot_size,
            weeks: BTreeMap::new(),
        }
    }

    /// Creates a grid from already-shaped weeks.
    pub fn from_weeks(
        slot_size: SlotSize,
        weeks: BTreeMap<WeekOffset, WeekColumns>,
    ) -> TimesheetResult<Self> {
        let slots_per_day = slot_size.slots_per_day();
        for (offset, week) in &weeks {
            if week.days.iter().any(|d| d.slots.len() != slots_per_day) {
                return Err(TimesheetError::InvalidGeometry(format!(
                    "week {} does not have {} slots per day",
                    offset, slots_per_day
                )));
            }
        }
        Ok(Self {
            slot_size,
            weeks: weeks.into_iter().map(|(k, w)| (k, Arc::new(w))).collect(),
        })
    }

    pub fn slot_size(&self) -> SlotSize {
        self.slot_size
    }

    /// `true` when no week has been materialized.
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    pub fn week(&self, offset: WeekOffset) -> Option<&WeekColumns> {
        self.weeks.get(&offset).map(Arc::as_ref)
    }

    /// Materialized weeks in ascending offset order.
    pub fn weeks(&self) -> impl Iterator<Item = (WeekOffset, &WeekColumns)> {
        self.weeks.iter().map(|(k, w)| (*k, w.as_ref()))
    }

    pub fn code_at(&self, offset: WeekOffset, coord: SlotCoord) -> Option<&Arc<BillingCode>> {
        self.week(offset)
            .and_then(|w| w.day(coord.day).code(coord.slot))
    }

    /// Number of assigned slots across all weeks.
    pub fn assigned(&self) -> usize {
        self.weeks.values().map(|w| w.assigned()).sum()
    }

    /// Returns a grid in which `offset` is materialized.
    pub fn ensure_week(&self, offset: WeekOffset) -> SlotGrid {
        if self.weeks.contains_key(&offset) {
            return self.clone();
        }
        let mut next = self.clone();
        next.week_mut(offset);
        next
    }

    /// Assigns `code` to every selected slot of week `offset`.
    pub fn apply_code(
        &self,
        offset: WeekOffset,
        selection: &Selection,
        code: &Arc<BillingCode>,
    ) -> TimesheetResult<GridUpdate> {
        selection.validate(self.slot_size)?;
        let mut next = self.clone();
        let mut written = 0;
        if !selection.is_empty() {
            let week = next.week_mut(offset);
            for coord in selection.distinct() {
                week.set(*coord, Some(Arc::clone(code)));
                written += 1;
            }
        }
        Ok(GridUpdate {
            grid: next,
            written,
            skipped: 0,
        })
    }

    /// Assigns each selected slot its default code for the day type of its day.
    ///
    /// Slots without an unambiguous default are left as they are.
    pub fn apply_default_code<F>(
        &self,
        offset: WeekOffset,
        selection: &Selection,
        resolver: &CodeSlotResolver,
        day_type_of: F,
    ) -> TimesheetResult<GridUpdate>
    where
        F: Fn(DayIndex) -> DayType,
    {
        if resolver.slot_size() != self.slot_size {
            return Err(TimesheetError::InvalidGeometry(format!(
                "resolver uses {}-minute slots but the grid uses {}-minute slots",
                resolver.slot_size().minutes(),
                self.slot_size.minutes()
            )));
        }
        selection.validate(self.slot_size)?;

        let mut next = self.clone();
        let mut written = 0;
        let mut skipped = 0;
        if !selection.is_empty() {
            let week = next.week_mut(offset);
            for coord in selection.distinct() {
                match resolver.default_code(day_type_of(coord.day), coord.slot) {
                    Some(code) => {
                        week.set(*coord, Some(Arc::clone(code)));
                        written += 1;
                    }
                    None => skipped += 1,
                }
            }
        }
        Ok(GridUpdate {
            grid: next,
            written,
            skipped,
        })
    }

    /// Unassigns every selected slot of week `offset`.
    pub fn clear(&self, offset: WeekOffset, selection: &Selection) -> TimesheetResult<GridUpdate> {
        selection.validate(self.slot_size)?;
        let mut next = self.clone();
        let mut written = 0;
        if !selection.is_empty() {
            let week = next.week_mut(offset);
            for coord in selection.distinct() {
                week.set(*coord, None);
                written += 1;
            }
        }
        Ok(GridUpdate {
            grid: next,
            written,
            skipped: 0,
        })
    }

    /// An empty grid with the same slot size.
    pub fn reset(&self) -> SlotGrid {
        SlotGrid::new(self.slot_size)
    }

    fn week_mut(&mut self, offset: WeekOffset) -> &mut WeekColumns {
        let slots_per_day = self.slot_size.slots_per_day();
        let week = self
            .weeks
            .entry(offset)
            .or_insert_with(|| Arc::new(WeekColumns::empty(slots_per_day)));
        Arc::make_mut(week)
    }
}

#[cfg(test)]
#[path = "slot_grid_tests.rs"]
mod slot_grid_tests;
