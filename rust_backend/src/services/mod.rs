//! Service layer.
//!
//! Sits between the selection collaborator and the grid, code table and
//! session store, and orchestrates each edit.

pub mod editor;

pub use editor::{EditOutcome, NoOpReason, TimesheetEditor};
