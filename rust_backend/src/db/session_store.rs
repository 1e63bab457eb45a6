//! Session store abstraction.
//!
//! A store only moves opaque session content in and out of some medium.
//! Encoding, checksum verification and code resolution are shared by every
//! store through the provided [`SessionStore::load`] and
//! [`SessionStore::save`] methods.

use super::snapshot::{decode_grid, encode_grid};
use crate::codes::BillingCodeTable;
use crate::error::TimesheetResult;
use crate::grid::SlotGrid;

pub trait SessionStore: Send + Sync {
    /// Raw saved content, `None` when nothing has been saved.
    fn read_raw(&self) -> TimesheetResult<Option<String>>;

    fn write_raw(&self, content: &str) -> TimesheetResult<()>;

    /// Discards the saved session.
    fn clear(&self) -> TimesheetResult<()>;

    /// Short description for log messages.
    fn describe(&self) -> String;

    /// Loads the saved grid.
    ///
    /// Content that cannot be read or no longer matches the grid shape or the
    /// code table is treated as absent, with a warning.
    fn load(&self, table: &BillingCodeTable) -> Option<SlotGrid> {
        let content = match self.read_raw() {
            Ok(Some(content)) => content,
            Ok(None) => {
                log::debug!("No saved session in {}", self.describe());
                return None;
            }
            Err(e) => {
                log::warn!(
                    "Could not read saved session from {}: {}",
                    self.describe(),
                    e
                );
                return None;
            }
        };

        match decode_grid(&content, table) {
            Ok(grid) => {
                log::info!(
                    "Restored session from {} ({} week(s), {} assigned slot(s))",
                    self.describe(),
                    grid.week_count(),
                    grid.assigned()
                );
                Some(grid)
            }
            Err(e) => {
                log::warn!("Ignoring malformed session in {}: {}", self.describe(), e);
                None
            }
        }
    }

    fn save(&self, grid: &SlotGrid) -> TimesheetResult<()> {
        let content = encode_grid(grid)?;
        self.write_raw(&content)?;
        log::debug!("Saved {} week(s) to {}", grid.week_count(), self.describe());
        Ok(())
    }
}
