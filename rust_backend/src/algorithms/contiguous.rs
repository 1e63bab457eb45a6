//! Contiguous-block aggregation of a slot grid into billed intervals.
//!
//! The grid is walked once in chronological order (weeks ascending, days in
//! display order, slots ascending) while a single open block is carried along.
//! A block closes when the code changes, a slot is unassigned, time stops being
//! adjacent (a gap between materialized weeks), or, with `break_on_day`, at
//! midnight. Weeks the calendar cannot place on real dates are skipped.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

use crate::calendar::WeekCalendar;
use crate::codes::{BillingCode, RateTier};
use crate::grid::SlotGrid;

/// A maximal run of identically coded, time-adjacent slots.
///
/// `end` is exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct BilledInterval {
    pub code: Arc<BillingCode>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BilledInterval {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Hours worked, rounded to cents of an hour.
    pub fn hours(&self) -> Decimal {
        (Decimal::from(self.duration_minutes()) / Decimal::from(60))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn rate(&self, tier: RateTier) -> Decimal {
        self.code.rates.for_tier(tier)
    }

    pub fn cost(&self, tier: RateTier) -> Decimal {
        (self.hours() * self.rate(tier))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

struct OpenBlock {
    code: Arc<BillingCode>,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl OpenBlock {
    fn close(self) -> BilledInterval {
        BilledInterval {
            code: self.code,
            start: self.start,
            end: self.end,
        }
    }
}

/// Collapses `grid` into chronologically ordered billed intervals.
///
/// # Arguments
/// * `grid` - The slot grid to aggregate
/// * `calendar` - Maps week offsets and day indices to dates, and fixes the
///   display order of days within a week
/// * `break_on_day` - When `true`, blocks never span midnight
pub fn group_contiguous_slots(
    grid: &SlotGrid,
    calendar: &WeekCalendar,
    break_on_day: bool,
) -> Vec<BilledInterval> {
    let slot_len = Duration::minutes(grid.slot_size().minutes() as i64);
    let mut blocks = Vec::new();
    let mut open: Option<OpenBlock> = None;

    for (offset, week) in grid.weeks() {
        if let Err(err) = calendar.week_start(offset) {
            log::warn!("Week {} not billed: {}", offset, err);
            if let Some(block) = open.take() {
                blocks.push(block.close());
            }
            continue;
        }

        for day in calendar.display_days() {
            let Ok(day_start) = calendar.day_start(offset, day) else {
                continue;
            };

            for (slot, state) in week.day(day).slots().iter().enumerate() {
                let slot_start = day_start + slot_len * slot as i32;

                if let Some(block) = open.as_mut() {
                    let continues = block.end == slot_start
                        && !(break_on_day && slot == 0)
                        && state
                            .as_ref()
                            .is_some_and(|code| code.item_number == block.code.item_number);

                    if continues {
                        block.end = slot_start + slot_len;
                        continue;
                    }
                    if let Some(block) = open.take() {
                        blocks.push(block.close());
                    }
                }

                if let Some(code) = state {
                    open = Some(OpenBlock {
                        code: Arc::clone(code),
                        start: slot_start,
                        end: slot_start + slot_len,
                    });
                }
            }
        }
    }

    if let Some(block) = open {
        blocks.push(block.close());
    }

    log::debug!(
        "Aggregated {} assigned slot(s) across {} week(s) into {} interval(s)",
        grid.assigned(),
        grid.week_count(),
        blocks.len()
    );
    blocks
}

#[cfg(test)]
#[path = "contiguous_tests.rs"]
mod contiguous_tests;
