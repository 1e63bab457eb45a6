//! Invoice header details and their defaults.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::algorithms::BilledInterval;
use crate::error::{TimesheetError, TimesheetResult};

const TITLE_PREFIX: &str = "Invoice ";

/// The period an invoice covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePeriod {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl InvoicePeriod {
    /// `dd/MM/yyyy - dd/MM/yyyy`
    pub fn format(&self) -> String {
        format!(
            "{} - {}",
            self.from.format("%d/%m/%Y"),
            self.to.format("%d/%m/%Y")
        )
    }
}

/// Header fields of an exported invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetails {
    pub sheet_title: String,
    pub invoice_number: u32,
    pub period: InvoicePeriod,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InvoiceDetails {
    /// Details pre-filled from the billed intervals and the titles of invoices
    /// that already exist.
    pub fn with_defaults<'a, I>(
        existing_titles: I,
        intervals: &[BilledInterval],
        today: NaiveDate,
    ) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let invoice_number = next_invoice_number(existing_titles);
        Self {
            sheet_title: format!("{}{}", TITLE_PREFIX, invoice_number),
            invoice_number,
            period: default_period(intervals, today),
            from: None,
            to: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> TimesheetResult<()> {
        if self.sheet_title.chars().count() < 2 {
            return Err(TimesheetError::ValidationError(
                "Sheet title must be at least 2 characters".to_string(),
            ));
        }
        if self.invoice_number == 0 {
            return Err(TimesheetError::ValidationError(
                "Invoice number must be positive".to_string(),
            ));
        }
        if self.period.from >= self.period.to {
            return Err(TimesheetError::ValidationError(
                "Start date must be before end date".to_string(),
            ));
        }
        Ok(())
    }

    /// Rejects a sheet title that is already taken.
    pub fn ensure_unique_title<'a, I>(&self, existing_titles: I) -> TimesheetResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if existing_titles.into_iter().any(|t| t == self.sheet_title) {
            return Err(TimesheetError::ValidationError(format!(
                "A worksheet titled '{}' already exists",
                self.sheet_title
            )));
        }
        Ok(())
    }

    pub fn format_period(&self) -> String {
        self.period.format()
    }
}

/// One more than the highest `Invoice N` title, never less than 2.
pub fn next_invoice_number<'a, I>(existing_titles: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    let highest = existing_titles
        .into_iter()
        .filter_map(parse_invoice_title)
        .fold(1, u32::max);
    highest.saturating_add(1)
}

fn parse_invoice_title(title: &str) -> Option<u32> {
    let digits = title.strip_prefix(TITLE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// From the first billed start to the last billed end, or one week from
/// `today` when nothing is billed.
pub fn default_period(intervals: &[BilledInterval], today: NaiveDate) -> InvoicePeriod {
    match (intervals.first(), intervals.last()) {
        (Some(first), Some(last)) => InvoicePeriod {
            from: first.start,
            to: last.end,
        },
        _ => {
            log::warn!("No billed intervals; defaulting the invoice period to one week");
            let from = today.and_time(NaiveTime::MIN);
            InvoicePeriod {
                from,
                to: from + Duration::weeks(1),
            }
        }
    }
}
