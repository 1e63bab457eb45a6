//! Billing code registry.
//!
//! A [`BillingCode`] is an immutable, rated NDIS support item that applies to a
//! [`DayType`] and a minute-of-day range. The [`BillingCodeTable`] is built once
//! and shared by reference; nothing mutates it after construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{TimesheetError, TimesheetResult};
use crate::grid::geometry::MINUTES_PER_DAY;

/// Classification of a calendar date for billing purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayType {
    Weekday,
    Saturday,
    Sunday,
    #[serde(rename = "Public Holiday")]
    PublicHoliday,
}

impl DayType {
    pub const ALL: [DayType; 4] = [
        DayType::Weekday,
        DayType::Saturday,
        DayType::Sunday,
        DayType::PublicHoliday,
    ];

    pub(crate) fn ordinal(&self) -> usize {
        match self {
            DayType::Weekday => 0,
            DayType::Saturday => 1,
            DayType::Sunday => 2,
            DayType::PublicHoliday => 3,
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DayType::Weekday => "Weekday",
            DayType::Saturday => "Saturday",
            DayType::Sunday => "Sunday",
            DayType::PublicHoliday => "Public Holiday",
        };
        f.write_str(label)
    }
}

/// Time-of-day label. Display only; applicability comes from [`AppliedTo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Daytime,
    Evening,
    Night,
}

/// Pricing tier selected at export time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateTier {
    #[default]
    National,
    Remote,
    VeryRemote,
}

impl FromStr for RateTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "national" => Ok(Self::National),
            "remote" => Ok(Self::Remote),
            "very_remote" | "veryremote" => Ok(Self::VeryRemote),
            _ => Err(format!("Unknown rate tier: {}", s)),
        }
    }
}

/// Hourly rates for each pricing tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rates {
    pub national: Decimal,
    pub remote: Decimal,
    pub very_remote: Decimal,
}

impl Rates {
    /// Builds rates from values expressed in cents.
    pub fn from_cents(national: i64, remote: i64, very_remote: i64) -> Self {
        Self {
            national: Decimal::new(national, 2),
            remote: Decimal::new(remote, 2),
            very_remote: Decimal::new(very_remote, 2),
        }
    }

    pub fn for_tier(&self, tier: RateTier) -> Decimal {
        match tier {
            RateTier::National => self.national,
            RateTier::Remote => self.remote,
            RateTier::VeryRemote => self.very_remote,
        }
    }
}

/// Where in a day a code applies.
///
/// Only a minute range is supported: `[start, end)` in minutes from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppliedTo {
    MinuteRange { start: u32, end: u32 },
}

impl AppliedTo {
    pub fn minute_range(start: u32, end: u32) -> Self {
        AppliedTo::MinuteRange { start, end }
    }

    pub fn bounds(&self) -> (u32, u32) {
        match *self {
            AppliedTo::MinuteRange { start, end } => (start, end),
        }
    }
}

/// A rated NDIS support item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingCode {
    pub item_number: String,
    pub item_name: String,
    pub day_type: DayType,
    pub time_of_day: Option<TimeOfDay>,
    pub applied_to: AppliedTo,
    pub rates: Rates,
}

impl BillingCode {
    fn validate(&self) -> TimesheetResult<()> {
        if self.item_number.trim().is_empty() {
            return Err(TimesheetError::InvalidCode(
                "item number must not be empty".to_string(),
            ));
        }
        let (start, end) = self.applied_to.bounds();
        if start > end || end > MINUTES_PER_DAY {
            return Err(TimesheetError::InvalidCode(format!(
                "{}: applicable range [{}, {}) is not within [0, {}]",
                self.item_number, start, end, MINUTES_PER_DAY
            )));
        }
        Ok(())
    }
}

/// Read-only registry of billing codes keyed by item number.
///
/// Registration order is preserved for listing (code pick-lists show codes in
/// the order they were authored).
#[derive(Debug, Clone)]
pub struct BillingCodeTable {
    codes: Vec<Arc<BillingCode>>,
    by_item: HashMap<String, usize>,
}

impl BillingCodeTable {
    /// Builds a table, rejecting duplicate item numbers and malformed ranges.
    pub fn new(codes: Vec<BillingCode>) -> TimesheetResult<Self> {
        let mut seen = HashSet::with_capacity(codes.len());
        for code in &codes {
            code.validate()?;
            if !seen.insert(code.item_number.as_str()) {
                return Err(TimesheetError::InvalidCode(format!(
                    "duplicate item number {}",
                    code.item_number
                )));
            }
        }
        Ok(Self::index(codes))
    }

    fn index(codes: Vec<BillingCode>) -> Self {
        let by_item = codes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.item_number.clone(), i))
            .collect();
        Self {
            codes: codes.into_iter().map(Arc::new).collect(),
            by_item,
        }
    }

    /// Resolves an item number to its code.
    pub fn lookup(&self, item_number: &str) -> TimesheetResult<&Arc<BillingCode>> {
        self.get(item_number)
            .ok_or_else(|| TimesheetError::NotFound(item_number.to_string()))
    }

    pub fn get(&self, item_number: &str) -> Option<&Arc<BillingCode>> {
        self.by_item.get(item_number).map(|&i| &self.codes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<BillingCode>> {
        self.codes.iter()
    }

    pub fn codes_for(&self, day_type: DayType) -> impl Iterator<Item = &Arc<BillingCode>> {
        self.codes.iter().filter(move |c| c.day_type == day_type)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The NDIS "Assistance With Self-Care" and "Access Community" items.
    ///
    /// Community-access items carry an empty `[0, 0)` range: they never match a
    /// slot by default and are only assigned explicitly.
    pub fn ndis_default() -> Self {
        let code = |item: &str,
                    name: &str,
                    day_type: DayType,
                    time_of_day: Option<TimeOfDay>,
                    (start, end): (u32, u32),
                    rates: Rates| BillingCode {
            item_number: item.to_string(),
            item_name: name.to_string(),
            day_type,
            time_of_day,
            applied_to: AppliedTo::minute_range(start, end),
            rates,
        };

        let codes = vec![
            code(
                "01_011_0107_1_1",
                "Assistance With Self-Care Activities - Standard - Weekday Daytime",
                DayType::Weekday,
                Some(TimeOfDay::Daytime),
                (hm(6, 0), hm(18, 0)),
                Rates::from_cents(6756, 9458, 10134),
            ),
            code(
                "01_015_0107_1_1",
                "Assistance With Self-Care Activities - Standard - Weekday Evening",
                DayType::Weekday,
                Some(TimeOfDay::Evening),
                (hm(18, 0), hm(24, 0)),
                Rates::from_cents(7444, 10422, 11166),
            ),
            code(
                "01_002_0107_1_1",
                "Assistance With Self-Care Activities - Standard - Weekday Night",
                DayType::Weekday,
                Some(TimeOfDay::Night),
                (hm(0, 0), hm(6, 0)),
                Rates::from_cents(7582, 10615, 11373),
            ),
            code(
                "01_013_0107_1_1",
                "Assistance With Self-Care Activities - Standard - Saturday",
                DayType::Saturday,
                None,
                (hm(0, 0), hm(24, 0)),
                Rates::from_cents(9507, 13310, 14261),
            ),
            code(
                "01_014_0107_1_1",
                "Assistance With Self-Care Activities - Standard - Sunday",
                DayType::Sunday,
                None,
                (hm(0, 0), hm(24, 0)),
                Rates::from_cents(12259, 17163, 18389),
            ),
            code(
                "01_012_0107_1_1",
                "Assistance With Self-Care Activities - Standard - Public Holiday",
                DayType::PublicHoliday,
                None,
                (hm(0, 0), hm(24, 0)),
                Rates::from_cents(15010, 21014, 22515),
            ),
            code(
                "04_104_0125_6_1",
                "Access Community Social and Rec Activ - Standard - Weekday Daytime",
                DayType::Weekday,
                None,
                (0, 0),
                Rates::from_cents(6756, 9458, 10134),
            ),
            code(
                "04_103_0125_6_1",
                "Access Community Social and Rec Activ - Standard - Weekday Evening",
                DayType::Weekday,
                None,
                (0, 0),
                Rates::from_cents(7444, 10422, 11166),
            ),
            code(
                "04_105_0125_6_1",
                "Access Community Social and Rec Activ - Standard - Saturday",
                DayType::Saturday,
                None,
                (0, 0),
                Rates::from_cents(9507, 13310, 14261),
            ),
            code(
                "04_106_0125_6_1",
                "Access Community Social and Rec Activ - Standard - Sunday",
                DayType::Sunday,
                None,
                (0, 0),
                Rates::from_cents(12259, 17163, 18389),
            ),
            code(
                "04_102_0125_6_1",
                "Access Community Social and Rec Activ - Standard - Public Holiday",
                DayType::PublicHoliday,
                None,
                (0, 0),
                Rates::from_cents(15010, 21014, 22515),
            ),
        ];

        // Static data: uniqueness and ranges are covered by the table tests.
        Self::index(codes)
    }
}

fn hm(hours: u32, minutes: u32) -> u32 {
    hours * 60 + minutes
}
