//! The editing session.
//!
//! [`TimesheetEditor`] owns the current slot grid, the displayed week and the
//! user's selection. Every change goes selection -> bulk grid operation ->
//! session store: the new grid is saved first and only then becomes current,
//! so a failed save leaves the session as it was. After a change the
//! selection is cleared.

use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

use crate::algorithms::{group_contiguous_slots, BilledInterval};
use crate::calendar::{DayTypeClassifier, WeekCalendar};
use crate::codes::{BillingCodeTable, CodeSlotResolver, RateTier};
use crate::config::TimesheetConfig;
use crate::db::SessionStore;
use crate::error::{TimesheetError, TimesheetResult};
use crate::grid::{DayIndex, GridUpdate, Selection, SlotGrid, SlotSize, WeekOffset};
use crate::invoice::{
    ExportReceipt, ExportRequest, InvoiceDetails, InvoiceExporter, InvoiceSummary,
    TemplateDescriptor,
};

/// Why an edit changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    EmptySelection,
    NoCodeSelected,
    /// None of the selected slots has an unambiguous default code.
    NoDefaultCode,
}

impl fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            NoOpReason::EmptySelection => "No timeslots are selected.",
            NoOpReason::NoCodeSelected => "A code must be selected before it can be applied.",
            NoOpReason::NoDefaultCode => "None of the selected timeslots has a default code.",
        };
        f.write_str(message)
    }
}

/// Result of a bulk edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// `slots` distinct slots were written; repeated coordinates count once.
    Applied {
        slots: usize,
    },
    NoOp(NoOpReason),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied { .. })
    }
}

pub struct TimesheetEditor {
    table: Arc<BillingCodeTable>,
    resolver: Arc<CodeSlotResolver>,
    classifier: Arc<dyn DayTypeClassifier>,
    store: Arc<dyn SessionStore>,
    calendar: WeekCalendar,
    grid: SlotGrid,
    week_offset: WeekOffset,
    selection: Selection,
}

impl TimesheetEditor {
    /// Starts an empty session showing week 0.
    pub fn new(
        table: Arc<BillingCodeTable>,
        classifier: Arc<dyn DayTypeClassifier>,
        store: Arc<dyn SessionStore>,
        calendar: WeekCalendar,
        slot_size: SlotSize,
    ) -> Self {
        let resolver = Arc::new(CodeSlotResolver::new(&table, slot_size));
        Self {
            table,
            resolver,
            classifier,
            store,
            calendar,
            grid: SlotGrid::new(slot_size).ensure_week(0),
            week_offset: 0,
            selection: Selection::default(),
        }
    }

    /// Starts an empty session using the configured slot size, week start and
    /// public holidays, with week 0 containing `today`.
    pub fn from_config(
        config: &TimesheetConfig,
        table: Arc<BillingCodeTable>,
        store: Arc<dyn SessionStore>,
        today: NaiveDate,
    ) -> TimesheetResult<Self> {
        config.validate()?;
        let calendar = WeekCalendar::new(today, config.week_starts_on()?);
        Ok(Self::new(
            table,
            Arc::new(config.classifier()),
            store,
            calendar,
            config.slot_size()?,
        ))
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    pub fn week_offset(&self) -> WeekOffset {
        self.week_offset
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn calendar(&self) -> &WeekCalendar {
        &self.calendar
    }

    pub fn table(&self) -> &BillingCodeTable {
        &self.table
    }

    pub fn resolver(&self) -> &CodeSlotResolver {
        &self.resolver
    }

    /// Replaces the grid with the saved session, if there is a usable one.
    ///
    /// Returns `true` when a session was recovered. A missing, malformed or
    /// incompatible session, including one with weeks that have no calendar
    /// dates, leaves an empty grid.
    pub fn restore(&mut self) -> bool {
        let slot_size = self.resolver.slot_size();
        let restored = match self.store.load(&self.table) {
            Some(grid) if grid.slot_size() != slot_size => {
                log::warn!(
                    "Saved session uses {}-minute slots but the editor uses {}-minute slots; starting fresh",
                    grid.slot_size().minutes(),
                    slot_size.minutes()
                );
                None
            }
            Some(grid) => {
                let unmappable = grid
                    .weeks()
                    .map(|(offset, _)| offset)
                    .find(|offset| !self.calendar.is_mappable(*offset));
                match unmappable {
                    Some(offset) => {
                        log::warn!(
                        "Saved session has week {} outside the supported date range; starting fresh",
                        offset
                    );
                        None
                    }
                    None => Some(grid),
                }
            }
            None => None,
        };

        let recovered = restored.is_some();
        self.grid = restored
            .unwrap_or_else(|| SlotGrid::new(slot_size))
            .ensure_week(self.week_offset);
        self.selection.clear();
        recovered
    }

    /// Displays week `offset`, materializing it if needed.
    ///
    /// A week the calendar cannot place on real dates is rejected and the
    /// current week stays displayed.
    pub fn show_week(&mut self, offset: WeekOffset) -> TimesheetResult<()> {
        self.calendar.week_start(offset)?;
        self.grid = self.grid.ensure_week(offset);
        self.week_offset = offset;
        self.selection.clear();
        Ok(())
    }

    /// Replaces the selection. Coordinates are checked against the slot size.
    pub fn select(&mut self, selection: Selection) -> TimesheetResult<()> {
        selection.validate(self.grid.slot_size())?;
        self.selection = selection;
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    /// Assigns every selected slot its default code for its day type.
    ///
    /// Slots without an unambiguous default keep their current code.
    pub fn apply_default(&mut self) -> TimesheetResult<EditOutcome> {
        if let Some(outcome) = self.empty_selection() {
            return Ok(outcome);
        }

        let day_types = self
            .calendar
            .day_types(self.week_offset, self.classifier.as_ref())?;
        let update = self.grid.apply_default_code(
            self.week_offset,
            &self.selection,
            &self.resolver,
            |day: DayIndex| day_types[day.as_usize()],
        )?;

        if update.skipped > 0 {
            log::warn!(
                "{} selected slot(s) have no default code and were left unchanged",
                update.skipped
            );
        }
        if update.written == 0 {
            self.selection.clear();
            return Ok(EditOutcome::NoOp(NoOpReason::NoDefaultCode));
        }
        self.commit(update)
    }

    /// Assigns the code with `item_number` to every selected slot.
    ///
    /// `None` is a no-op. An unknown item number is rejected before anything
    /// changes.
    pub fn apply_specific(&mut self, item_number: Option<&str>) -> TimesheetResult<EditOutcome> {
        let Some(item_number) = item_number.filter(|s| !s.is_empty()) else {
            log::warn!("{}", NoOpReason::NoCodeSelected);
            return Ok(EditOutcome::NoOp(NoOpReason::NoCodeSelected));
        };
        let code = Arc::clone(self.table.lookup(item_number)?);

        if let Some(outcome) = self.empty_selection() {
            return Ok(outcome);
        }
        let update = self
            .grid
            .apply_code(self.week_offset, &self.selection, &code)?;
        self.commit(update)
    }

    /// Unassigns every selected slot.
    pub fn delete(&mut self) -> TimesheetResult<EditOutcome> {
        if let Some(outcome) = self.empty_selection() {
            return Ok(outcome);
        }
        let update = self.grid.clear(self.week_offset, &self.selection)?;
        self.commit(update)
    }

    /// Discards every assignment in every week and the saved session.
    pub fn reset(&mut self) -> TimesheetResult<()> {
        self.store.clear()?;
        self.grid = self.grid.reset().ensure_week(self.week_offset);
        self.selection.clear();
        log::info!("Session reset");
        Ok(())
    }

    pub fn billed_intervals(&self, break_on_day: bool) -> Vec<BilledInterval> {
        group_contiguous_slots(&self.grid, &self.calendar, break_on_day)
    }

    pub fn summary(&self, tier: RateTier, break_on_day: bool) -> InvoiceSummary {
        InvoiceSummary::build(&self.billed_intervals(break_on_day), tier)
    }

    /// Invoice details pre-filled from this session.
    pub fn default_details<'a, I>(&self, existing_titles: I, break_on_day: bool) -> InvoiceDetails
    where
        I: IntoIterator<Item = &'a str>,
    {
        InvoiceDetails::with_defaults(
            existing_titles,
            &self.billed_intervals(break_on_day),
            self.calendar.anchor(),
        )
    }

    /// Hands the billed intervals of this session to `exporter`.
    pub async fn export(
        &self,
        exporter: &dyn InvoiceExporter,
        template: TemplateDescriptor,
        details: InvoiceDetails,
        tier: RateTier,
        break_on_day: bool,
    ) -> TimesheetResult<ExportReceipt> {
        let request = ExportRequest {
            template,
            details,
            intervals: self.billed_intervals(break_on_day),
            rate_tier: tier,
        };
        if request.intervals.is_empty() {
            log::warn!("Exporting an invoice with no billed time");
        }
        let receipt = exporter.export(request).await?;
        log::info!("Invoice '{}' exported", receipt.sheet_title);
        Ok(receipt)
    }

    fn empty_selection(&self) -> Option<EditOutcome> {
        if self.selection.is_empty() {
            log::warn!("{}", NoOpReason::EmptySelection);
            Some(EditOutcome::NoOp(NoOpReason::EmptySelection))
        } else {
            None
        }
    }

    fn commit(&mut self, update: GridUpdate) -> TimesheetResult<EditOutcome> {
        self.store.save(&update.grid).map_err(|e| {
            TimesheetError::StorageError(format!("session not saved, edit discarded: {}", e))
        })?;
        log::debug!(
            "Week {}: wrote {} slot(s), {} assigned in total",
            self.week_offset,
            update.written,
            update.grid.assigned()
        );
        self.grid = update.grid;
        self.selection.clear();
        Ok(EditOutcome::Applied {
            slots: update.written,
        })
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod editor_tests;
