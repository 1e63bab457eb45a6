//! Slot geometry, selections, and the multi-week slot grid.
//!
//! - [`geometry`]: slot size, day index, and slot coordinates
//! - [`selection`]: the user's marked slots in the displayed week
//! - [`slot_grid`]: per-week, per-day, per-slot code assignments

pub mod geometry;
pub mod selection;
pub mod slot_grid;

pub use geometry::{DayIndex, SlotCoord, SlotSize, MINUTES_PER_DAY};
pub use selection::Selection;
pub use slot_grid::{DayColumn, GridUpdate, SlotGrid, WeekColumns, WeekOffset};
