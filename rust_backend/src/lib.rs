//! NDIS timesheet core.
//!
//! Support workers mark time slots on a weekly grid and assign each slot an
//! NDIS billing code, either the default code for the slot's day type and
//! time of day or a code they pick. Coded slots are collapsed into billed
//! intervals, which become invoice lines.
//!
//! # Layout
//!
//! - [`codes`]: billing code table and per-slot code resolution
//! - [`grid`]: slot geometry, selections and the multi-week slot grid
//! - [`calendar`]: week offsets to dates, day-type classification
//! - [`algorithms`]: contiguous-block aggregation into billed intervals
//! - [`invoice`]: invoice lines, details, templates and the export contract
//! - [`db`]: session persistence
//! - [`services`]: the editing session tying it all together
//! - [`config`]: TOML configuration

pub mod algorithms;
pub mod calendar;
pub mod codes;
pub mod config;
pub mod db;
pub mod error;
pub mod grid;
pub mod invoice;
pub mod services;

pub use algorithms::{group_contiguous_slots, BilledInterval};
pub use codes::{BillingCode, BillingCodeTable, CodeSlotResolver, DayType, RateTier};
pub use config::TimesheetConfig;
pub use error::{TimesheetError, TimesheetResult};
pub use grid::{Selection, SlotGrid, SlotSize};
pub use services::{EditOutcome, TimesheetEditor};
