//! Invoice preparation and export.
//!
//! - [`lines`]: invoice rows and per-item totals from billed intervals
//! - [`details`]: invoice header fields and their defaults
//! - [`template`]: where each field goes in an invoice template
//! - [`export`]: the asynchronous exporter contract

pub mod details;
pub mod export;
pub mod lines;
pub mod template;

pub use details::{default_period, next_invoice_number, InvoiceDetails, InvoicePeriod};
pub use export::{ExportReceipt, ExportRequest, InvoiceExporter, MemoryExporter};
pub use lines::{InvoiceLine, InvoiceSummary, ItemTotal};
pub use template::{collect_templates, TemplateDescriptor, TemplateLayout};
