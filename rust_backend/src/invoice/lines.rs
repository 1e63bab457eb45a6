//! Invoice rows and per-item totals.
//!
//! Each [`BilledInterval`] becomes one [`InvoiceLine`]. Hours for the same
//! item number are also summed into an [`ItemTotal`], listed in the order the
//! item first appears.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::HashMap;

use crate::algorithms::BilledInterval;
use crate::codes::RateTier;

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%H:%M";

/// One row of the invoice item table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    /// `dd/MM/yyyy`
    pub date: String,
    pub item_number: String,
    /// `HH:mm`
    pub start_time: String,
    /// `HH:mm`
    pub end_time: String,
    pub hours: Decimal,
    pub hourly_rate: Decimal,
    pub cost: Decimal,
}

impl InvoiceLine {
    pub fn from_interval(interval: &BilledInterval, tier: RateTier) -> Self {
        Self {
            date: interval.start.format(DATE_FORMAT).to_string(),
            item_number: interval.code.item_number.clone(),
            start_time: interval.start.format(TIME_FORMAT).to_string(),
            end_time: interval.end.format(TIME_FORMAT).to_string(),
            hours: interval.hours(),
            hourly_rate: interval.rate(tier),
            cost: interval.cost(tier),
        }
    }
}

/// Hours and cost accumulated for one item number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTotal {
    pub item_number: String,
    pub hours: Decimal,
    pub hourly_rate: Decimal,
    pub cost: Decimal,
}

/// Everything an exporter needs to fill the item tables of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub rate_tier: RateTier,
    pub lines: Vec<InvoiceLine>,
    pub item_totals: Vec<ItemTotal>,
    pub total_hours: Decimal,
    pub total_cost: Decimal,
}

impl InvoiceSummary {
    /// Builds invoice lines and item totals from ordered billed intervals.
    pub fn build(intervals: &[BilledInterval], tier: RateTier) -> Self {
        let lines: Vec<InvoiceLine> = intervals
            .iter()
            .map(|interval| InvoiceLine::from_interval(interval, tier))
            .collect();

        let mut item_totals: Vec<ItemTotal> = Vec::new();
        let mut position: HashMap<&str, usize> = HashMap::new();
        for line in &lines {
            match position.get(line.item_number.as_str()) {
                Some(&idx) => item_totals[idx].hours += line.hours,
                None => {
                    position.insert(line.item_number.as_str(), item_totals.len());
                    item_totals.push(ItemTotal {
                        item_number: line.item_number.clone(),
                        hours: line.hours,
                        hourly_rate: line.hourly_rate,
                        cost: Decimal::ZERO,
                    });
                }
            }
        }
        for total in &mut item_totals {
            total.cost = (total.hours * total.hourly_rate)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        }

        let total_hours = item_totals.iter().map(|t| t.hours).sum();
        let total_cost = item_totals.iter().map(|t| t.cost).sum();

        Self {
            rate_tier: tier,
            lines,
            item_totals,
            total_hours,
            total_cost,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
