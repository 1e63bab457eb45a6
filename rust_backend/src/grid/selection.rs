//! The set of slots the user has marked in the displayed week.
//!
//! Selections come from the drag-select collaborator as raw `[dayIndex, slotIndex]`
//! pairs. Order is kept and duplicates are allowed; every grid operation is
//! idempotent per coordinate.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::geometry::{DayIndex, SlotCoord, SlotSize};
use crate::error::TimesheetResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    coords: Vec<SlotCoord>,
}

impl Selection {
    pub fn new(coords: Vec<SlotCoord>) -> Self {
        Self { coords }
    }

    /// Builds a selection from raw `(dayIndex, slotIndex)` pairs.
    ///
    /// Fails if any day index is outside `0..=6`.
    pub fn from_pairs<I>(pairs: I) -> TimesheetResult<Self>
    where
        I: IntoIterator<Item = (u8, usize)>,
    {
        let coords = pairs
            .into_iter()
            .map(|(day, slot)| SlotCoord::from_raw(day, slot))
            .collect::<TimesheetResult<Vec<_>>>()?;
        Ok(Self { coords })
    }

    /// Every slot of `day` in the range `slots`.
    pub fn day_range(day: DayIndex, slots: std::ops::Range<usize>) -> Self {
        Self {
            coords: slots.map(|slot| SlotCoord::new(day, slot)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotCoord> {
        self.coords.iter()
    }

    /// Coordinates in selection order with repeats dropped.
    pub fn distinct(&self) -> impl Iterator<Item = &SlotCoord> {
        let mut seen = HashSet::with_capacity(self.coords.len());
        self.coords.iter().filter(move |coord| seen.insert(**coord))
    }

    pub fn clear(&mut self) {
        self.coords.clear();
    }

    /// Checks every coordinate against the slot geometry.
    pub fn validate(&self, slot_size: SlotSize) -> TimesheetResult<()> {
        self.coords
            .iter()
            .try_for_each(|coord| slot_size.check_slot(coord.slot))
    }
}

impl FromIterator<SlotCoord> for Selection {
    fn from_iter<T: IntoIterator<Item = SlotCoord>>(iter: T) -> Self {
        Self {
            coords: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Selection {
    type Item = SlotCoord;
    type IntoIter = std::vec::IntoIter<SlotCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.coords.into_iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a SlotCoord;
    type IntoIter = std::slice::Iter<'a, SlotCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.coords.iter()
    }
}
