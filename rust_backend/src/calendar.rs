//! Calendar mapping and day-type classification.
//!
//! The grid addresses days by week offset and [`DayIndex`]; billing needs real
//! dates. [`WeekCalendar`] anchors week offset 0 to a reference date ("today")
//! and a display week start. Day-type classification is a pluggable
//! [`DayTypeClassifier`] so that public-holiday support can be supplied by the
//! caller.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;

use crate::codes::DayType;
use crate::error::{TimesheetError, TimesheetResult};
use crate::grid::{DayIndex, WeekOffset};

/// Classifies a calendar date for billing.
pub trait DayTypeClassifier: Send + Sync {
    fn classify(&self, date: NaiveDate) -> DayType;
}

/// Saturday and Sunday are special; every other day is a weekday.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendClassifier;

impl DayTypeClassifier for WeekendClassifier {
    fn classify(&self, date: NaiveDate) -> DayType {
        match date.weekday() {
            chrono::Weekday::Sat => DayType::Saturday,
            chrono::Weekday::Sun => DayType::Sunday,
            _ => DayType::Weekday,
        }
    }
}

/// Marks an explicit list of dates as public holidays and defers every other
/// date to an inner classifier.
#[derive(Debug, Clone)]
pub struct ListedHolidays<C> {
    dates: BTreeSet<NaiveDate>,
    inner: C,
}

impl<C: DayTypeClassifier> ListedHolidays<C> {
    pub fn new<I: IntoIterator<Item = NaiveDate>>(dates: I, inner: C) -> Self {
        Self {
            dates: dates.into_iter().collect(),
            inner,
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

impl<C: DayTypeClassifier> DayTypeClassifier for ListedHolidays<C> {
    fn classify(&self, date: NaiveDate) -> DayType {
        if self.is_holiday(date) {
            DayType::PublicHoliday
        } else {
            self.inner.classify(date)
        }
    }
}

/// Maps `(week offset, day index)` to calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCalendar {
    anchor: NaiveDate,
    week_starts_on: DayIndex,
}

impl WeekCalendar {
    /// `anchor` is the date that week offset 0 contains.
    pub fn new(anchor: NaiveDate, week_starts_on: DayIndex) -> Self {
        Self {
            anchor,
            week_starts_on,
        }
    }

    /// Anchored on the local current date.
    pub fn today(week_starts_on: DayIndex) -> Self {
        Self::new(chrono::Local::now().date_naive(), week_starts_on)
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn week_starts_on(&self) -> DayIndex {
        self.week_starts_on
    }

    /// First displayed date of week `offset`.
    ///
    /// Fails with [`TimesheetError::InvalidGeometry`] when any day of the week
    /// falls outside the representable date range.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use ndis_timesheet::calendar::WeekCalendar;
    /// use ndis_timesheet::grid::DayIndex;
    ///
    /// // Thursday 2026-10-15, weeks starting on Monday
    /// let anchor = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
    /// let calendar = WeekCalendar::new(anchor, DayIndex::new(1).unwrap());
    /// assert_eq!(calendar.week_start(0).unwrap(), NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
    /// assert_eq!(calendar.week_start(-1).unwrap(), NaiveDate::from_ymd_opt(2026, 10, 5).unwrap());
    /// assert!(calendar.week_start(i64::MAX).is_err());
    /// ```
    pub fn week_start(&self, offset: WeekOffset) -> TimesheetResult<NaiveDate> {
        let base = Duration::try_weeks(offset)
            .and_then(|shift| self.anchor.checked_add_signed(shift))
            .ok_or_else(|| unmappable(offset))?;
        let since_start = (base.weekday().num_days_from_sunday() as i64 + 7
            - self.week_starts_on.value() as i64)
            % 7;
        let start = base
            .checked_sub_signed(Duration::days(since_start))
            .ok_or_else(|| unmappable(offset))?;
        // the exclusive end of the week must exist too
        start
            .checked_add_signed(Duration::days(7))
            .ok_or_else(|| unmappable(offset))?;
        Ok(start)
    }

    /// Whether every day of week `offset` has a calendar date.
    pub fn is_mappable(&self, offset: WeekOffset) -> bool {
        self.week_start(offset).is_ok()
    }

    /// Calendar date of `day` within week `offset`.
    pub fn date_of(&self, offset: WeekOffset, day: DayIndex) -> TimesheetResult<NaiveDate> {
        let from_start = (day.value() as i64 + 7 - self.week_starts_on.value() as i64) % 7;
        self.week_start(offset)?
            .checked_add_signed(Duration::days(from_start))
            .ok_or_else(|| unmappable(offset))
    }

    /// Midnight at the start of `day` within week `offset`.
    pub fn day_start(&self, offset: WeekOffset, day: DayIndex) -> TimesheetResult<NaiveDateTime> {
        Ok(self.date_of(offset, day)?.and_time(NaiveTime::MIN))
    }

    /// Days of week `offset` in display order.
    pub fn display_days(&self) -> impl Iterator<Item = DayIndex> {
        DayIndex::week_order(self.week_starts_on)
    }

    /// Day-type lookup for every day of week `offset`.
    pub fn day_types(
        &self,
        offset: WeekOffset,
        classifier: &dyn DayTypeClassifier,
    ) -> TimesheetResult<[DayType; 7]> {
        let mut types = [DayType::Weekday; 7];
        for day in DayIndex::all() {
            types[day.as_usize()] = classifier.classify(self.date_of(offset, day)?);
        }
        Ok(types)
    }
}

fn unmappable(offset: WeekOffset) -> TimesheetError {
    TimesheetError::InvalidGeometry(format!(
        "week offset {} is outside the supported date range",
        offset
    ))
}
