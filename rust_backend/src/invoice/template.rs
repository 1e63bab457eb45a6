//! Invoice template descriptors.
//!
//! A template is a worksheet plus a layout telling the exporter where each
//! piece of the invoice goes, in A1 notation. Header fields are single cells;
//! the item tables are a starting row plus one column letter per field.

use serde::{Deserialize, Serialize};

use crate::error::{TimesheetError, TimesheetResult};

/// Worksheets whose title contains this marker hold layouts, not invoices.
pub const METADATA_MARKER: &str = "Metadata";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateLayout {
    pub invoice_period: String,
    pub invoice_number: String,
    pub from: String,
    pub to: String,
    pub notes: String,

    pub items_row_start: u32,
    pub items_date: String,
    pub items_item_number: String,
    pub items_start_time: String,
    pub items_end_time: String,
    pub items_total_hours: String,
    pub items_hourly_rate: String,

    pub item_totals_row_start: u32,
    pub item_totals_item_number: String,
    pub item_totals_cost: String,
    pub item_totals_total_hours: String,
}

impl TemplateLayout {
    pub fn validate(&self) -> TimesheetResult<()> {
        let cells = [
            ("invoicePeriod", &self.invoice_period),
            ("invoiceNumber", &self.invoice_number),
            ("from", &self.from),
            ("to", &self.to),
            ("notes", &self.notes),
        ];
        for (field, cell) in cells {
            if !is_a1_cell(cell) {
                return Err(invalid(field, cell, "is not in valid A1 notation"));
            }
        }

        let columns = [
            ("itemsDate", &self.items_date),
            ("itemsItemNumber", &self.items_item_number),
            ("itemsStartTime", &self.items_start_time),
            ("itemsEndTime", &self.items_end_time),
            ("itemsTotalHours", &self.items_total_hours),
            ("itemsHourlyRate", &self.items_hourly_rate),
            ("itemTotalsItemNumber", &self.item_totals_item_number),
            ("itemTotalsCost", &self.item_totals_cost),
            ("itemTotalsTotalHours", &self.item_totals_total_hours),
        ];
        for (field, column) in columns {
            if !is_column(column) {
                return Err(invalid(field, column, "is not a column letter"));
            }
        }

        if self.items_row_start == 0 {
            return Err(invalid("itemsRowStart", "0", "must be positive"));
        }
        if self.item_totals_row_start == 0 {
            return Err(invalid("itemTotalsRowStart", "0", "must be positive"));
        }
        Ok(())
    }

    /// A1 reference of item row `index` (0-based) in column `column`.
    pub fn item_cell(&self, column: &str, index: usize) -> String {
        format!("{}{}", column, self.items_row_start as usize + index)
    }

    /// A1 reference of item-total row `index` (0-based) in column `column`.
    pub fn item_total_cell(&self, column: &str, index: usize) -> String {
        format!("{}{}", column, self.item_totals_row_start as usize + index)
    }
}

fn invalid(field: &str, value: &str, problem: &str) -> TimesheetError {
    TimesheetError::ValidationError(format!("{} '{}' {}", field, value, problem))
}

fn is_column(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_uppercase())
}

fn is_a1_cell(value: &str) -> bool {
    let split = value
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(value.len());
    let (column, row) = value.split_at(split);
    is_column(column)
        && !row.is_empty()
        && !row.starts_with('0')
        && row.bytes().all(|b| b.is_ascii_digit())
}

/// A named invoice template with a validated layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub title: String,
    pub layout: TemplateLayout,
}

impl TemplateDescriptor {
    pub fn new(title: impl Into<String>, layout: TemplateLayout) -> TimesheetResult<Self> {
        layout.validate()?;
        Ok(Self {
            title: title.into(),
            layout,
        })
    }
}

/// Collects usable templates from `(worksheet title, layout)` pairs.
///
/// Layout worksheets themselves are skipped, as are worksheets with a missing
/// or invalid layout.
pub fn collect_templates<I>(worksheets: I) -> Vec<TemplateDescriptor>
where
    I: IntoIterator<Item = (String, Option<TemplateLayout>)>,
{
    worksheets
        .into_iter()
        .filter(|(title, _)| !title.contains(METADATA_MARKER))
        .filter_map(|(title, layout)| {
            let Some(layout) = layout else {
                log::warn!("Template '{}' has no layout; skipping", title);
                return None;
            };
            match TemplateDescriptor::new(title.clone(), layout) {
                Ok(descriptor) => Some(descriptor),
                Err(e) => {
                    log::warn!("Template '{}' skipped: {}", title, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_layout() -> TemplateLayout {
    TemplateLayout {
        invoice_period: "B4".to_string(),
        invoice_number: "F2".to_string(),
        from: "B6".to_string(),
        to: "E6".to_string(),
        notes: "B30".to_string(),
        items_row_start: 12,
        items_date: "A".to_string(),
        items_item_number: "B".to_string(),
        items_start_time: "C".to_string(),
        items_end_time: "D".to_string(),
        items_total_hours: "E".to_string(),
        items_hourly_rate: "F".to_string(),
        item_totals_row_start: 20,
        item_totals_item_number: "H".to_string(),
        item_totals_cost: "I".to_string(),
        item_totals_total_hours: "J".to_string(),
    }
}
