//! Billing codes and their per-slot resolution.
//!
//! - [`table`]: the read-only billing code registry
//! - [`resolver`]: which codes apply to each slot of each day type

pub mod resolver;
pub mod table;

pub use resolver::{
    classify_overlap, AnomalyKind, CodeSlotMapping, CodeSlotResolver, Overlap, RuleAnomaly,
};
pub use table::{AppliedTo, BillingCode, BillingCodeTable, DayType, RateTier, Rates, TimeOfDay};
