//! Slot geometry: how a day is divided into fixed-size slots.
//!
//! A slot is addressed within a week by a [`DayIndex`] (0 = Sunday .. 6 = Saturday,
//! independent of the displayed week start) and a slot index counted from midnight.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TimesheetError, TimesheetResult};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Duration of a single slot in minutes.
///
/// Always divides [`MINUTES_PER_DAY`] evenly, so every day holds a whole
/// number of slots.
///
/// # Examples
///
/// ```
/// use ndis_timesheet::grid::SlotSize;
///
/// let size = SlotSize::new(15).unwrap();
/// assert_eq!(size.slots_per_day(), 96);
/// assert_eq!(size.slot_range(4), (60, 75));
/// assert!(SlotSize::new(7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlotSize(u32);

impl SlotSize {
    /// The slot size used by the picker unless configured otherwise.
    pub const DEFAULT: SlotSize = SlotSize(15);

    /// Creates a slot size, rejecting zero and sizes that do not divide a day.
    pub fn new(minutes: u32) -> TimesheetResult<Self> {
        if minutes == 0 || MINUTES_PER_DAY % minutes != 0 {
            return Err(TimesheetError::InvalidGeometry(format!(
                "slot size of {} minutes does not divide a {}-minute day",
                minutes, MINUTES_PER_DAY
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn slots_per_day(&self) -> usize {
        (MINUTES_PER_DAY / self.0) as usize
    }

    /// Minute-of-day range `[start, end)` covered by `slot`.
    pub fn slot_range(&self, slot: usize) -> (u32, u32) {
        let start = slot as u32 * self.0;
        (start, start + self.0)
    }

    /// Checks that `slot` addresses a slot within one day.
    pub fn check_slot(&self, slot: usize) -> TimesheetResult<()> {
        if slot >= self.slots_per_day() {
            return Err(TimesheetError::InvalidGeometry(format!(
                "slot index {} out of range (0..{})",
                slot,
                self.slots_per_day()
            )));
        }
        Ok(())
    }
}

impl Default for SlotSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for SlotSize {
    type Error = TimesheetError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        SlotSize::new(minutes)
    }
}

impl From<SlotSize> for u32 {
    fn from(size: SlotSize) -> Self {
        size.0
    }
}

/// Day of the week, 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayIndex(u8);

impl DayIndex {
    pub const SUNDAY: DayIndex = DayIndex(0);
    pub const SATURDAY: DayIndex = DayIndex(6);

    pub fn new(index: u8) -> TimesheetResult<Self> {
        if index > 6 {
            return Err(TimesheetError::InvalidGeometry(format!(
                "day index {} out of range (0..=6)",
                index
            )));
        }
        Ok(Self(index))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// All seven days starting from Sunday.
    pub fn all() -> impl Iterator<Item = DayIndex> {
        (0..7u8).map(DayIndex)
    }

    /// All seven days in display order for a week starting on `first`.
    pub fn week_order(first: DayIndex) -> impl Iterator<Item = DayIndex> {
        (0..7u8).map(move |i| DayIndex((first.0 + i) % 7))
    }

    pub fn from_weekday(weekday: chrono::Weekday) -> Self {
        DayIndex(weekday.num_days_from_sunday() as u8)
    }

    pub fn to_weekday(&self) -> chrono::Weekday {
        match self.0 {
            0 => chrono::Weekday::Sun,
            1 => chrono::Weekday::Mon,
            2 => chrono::Weekday::Tue,
            3 => chrono::Weekday::Wed,
            4 => chrono::Weekday::Thu,
            5 => chrono::Weekday::Fri,
            _ => chrono::Weekday::Sat,
        }
    }
}

impl TryFrom<u8> for DayIndex {
    type Error = TimesheetError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        DayIndex::new(index)
    }
}

impl From<DayIndex> for u8 {
    fn from(day: DayIndex) -> Self {
        day.0
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_weekday())
    }
}

/// A `(day, slot)` coordinate within one displayed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotCoord {
    pub day: DayIndex,
    pub slot: usize,
}

impl SlotCoord {
    pub fn new(day: DayIndex, slot: usize) -> Self {
        Self { day, slot }
    }

    /// Builds a coordinate from the raw `[dayIndex, slotIndex]` pair the
    /// selection collaborator hands over.
    pub fn from_raw(day: u8, slot: usize) -> TimesheetResult<Self> {
        Ok(Self {
            day: DayIndex::new(day)?,
            slot,
        })
    }
}
