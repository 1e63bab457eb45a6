//! Timesheet algorithms.
//!
//! # Components
//!
//! - [`contiguous`]: Collapses a slot grid into chronologically ordered
//!   [`BilledInterval`]s, one per maximal run of identically coded slots
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ndis_timesheet::algorithms::group_contiguous_slots;
//! use ndis_timesheet::calendar::WeekCalendar;
//! use ndis_timesheet::codes::BillingCodeTable;
//! use ndis_timesheet::grid::{DayIndex, Selection, SlotGrid, SlotSize};
//!
//! # fn example() -> Result<(), ndis_timesheet::TimesheetError> {
//! let table = BillingCodeTable::ndis_default();
//! let code = table.lookup("01_013_0107_1_1")?;
//! let grid = SlotGrid::new(SlotSize::DEFAULT)
//!     .apply_code(0, &Selection::day_range(DayIndex::SATURDAY, 36..44), code)?
//!     .grid;
//!
//! let anchor = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
//! let calendar = WeekCalendar::new(anchor, DayIndex::SUNDAY);
//! let intervals = group_contiguous_slots(&grid, &calendar, true);
//! assert_eq!(intervals.len(), 1);
//! assert_eq!(intervals[0].duration_minutes(), 120);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod contiguous;

pub use contiguous::{group_contiguous_slots, BilledInterval};
