//! Export collaborator contract.
//!
//! Writing an invoice to a spreadsheet is the only asynchronous step of the
//! workflow. The core hands an [`ExportRequest`] to an [`InvoiceExporter`] and
//! gets back either a receipt or an [`TimesheetError::ExportError`] whose
//! message can be shown to the user as is.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::details::InvoiceDetails;
use super::lines::InvoiceSummary;
use super::template::TemplateDescriptor;
use crate::algorithms::BilledInterval;
use crate::codes::RateTier;
use crate::error::{TimesheetError, TimesheetResult};

/// Everything needed to write one invoice.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub template: TemplateDescriptor,
    pub details: InvoiceDetails,
    pub intervals: Vec<BilledInterval>,
    pub rate_tier: RateTier,
}

impl ExportRequest {
    /// Checks the details and the template layout.
    pub fn validate(&self) -> TimesheetResult<()> {
        self.details.validate()?;
        self.template.layout.validate()
    }

    pub fn summary(&self) -> InvoiceSummary {
        InvoiceSummary::build(&self.intervals, self.rate_tier)
    }
}

/// What an exporter wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub sheet_title: String,
    pub lines_written: usize,
    pub item_totals_written: usize,
}

#[async_trait]
pub trait InvoiceExporter: Send + Sync {
    async fn export(&self, request: ExportRequest) -> Result<ExportReceipt, TimesheetError>;
}

/// In-memory exporter for tests and local development.
///
/// Keeps every accepted request. Can be switched unhealthy to simulate a
/// failing spreadsheet service.
#[derive(Clone, Default)]
pub struct MemoryExporter {
    state: Arc<RwLock<MemoryExporterState>>,
}

#[derive(Default)]
struct MemoryExporterState {
    exported: Vec<ExportRequest>,
    unhealthy: bool,
}

impl MemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set health status (for testing failure paths).
    pub fn set_healthy(&self, healthy: bool) {
        if let Ok(mut state) = self.state.write() {
            state.unhealthy = !healthy;
        }
    }

    /// Requests accepted so far, oldest first.
    pub fn exported(&self) -> Vec<ExportRequest> {
        self.state
            .read()
            .map(|state| state.exported.clone())
            .unwrap_or_default()
    }

    /// Titles of the invoices exported so far.
    pub fn sheet_titles(&self) -> Vec<String> {
        self.exported()
            .into_iter()
            .map(|r| r.details.sheet_title)
            .collect()
    }
}

#[async_trait]
impl InvoiceExporter for MemoryExporter {
    async fn export(&self, request: ExportRequest) -> Result<ExportReceipt, TimesheetError> {
        request
            .validate()
            .map_err(|e| TimesheetError::ExportError(e.to_string()))?;

        let mut state = self.state.write().map_err(|_| {
            TimesheetError::ExportError("Exporter state is unavailable".to_string())
        })?;
        if state.unhealthy {
            return Err(TimesheetError::ExportError(
                "Spreadsheet service is unavailable".to_string(),
            ));
        }
        let titles = state
            .exported
            .iter()
            .map(|r| r.details.sheet_title.as_str());
        request
            .details
            .ensure_unique_title(titles)
            .map_err(|e| TimesheetError::ExportError(e.to_string()))?;

        let summary = request.summary();
        let receipt = ExportReceipt {
            sheet_title: request.details.sheet_title.clone(),
            lines_written: summary.lines.len(),
            item_totals_written: summary.item_totals.len(),
        };
        log::info!(
            "Exported '{}' with {} line(s) using template '{}'",
            receipt.sheet_title,
            receipt.lines_written,
            request.template.title
        );
        state.exported.push(request);
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::template::sample_layout;
    use chrono::NaiveDate;

    fn request(title: &str) -> ExportRequest {
        let table = crate::codes::BillingCodeTable::ndis_default();
        let day = NaiveDate::from_ymd_opt(2026, 10, 13).unwrap();
        let intervals = vec![BilledInterval {
            code: Arc::clone(table.lookup("01_011_0107_1_1").unwrap()),
            start: day.and_hms_opt(9, 0, 0).unwrap(),
            end: day.and_hms_opt(12, 0, 0).unwrap(),
        }];
        let mut details = InvoiceDetails::with_defaults([], &intervals, day);
        details.sheet_title = title.to_string();
        ExportRequest {
            template: TemplateDescriptor::new("Standard", sample_layout()).unwrap(),
            details,
            intervals,
            rate_tier: RateTier::National,
        }
    }

    #[tokio::test]
    async fn test_export_records_request() {
        let exporter = MemoryExporter::new();
        let receipt = exporter.export(request("Invoice 2")).await.unwrap();

        assert_eq!(receipt.sheet_title, "Invoice 2");
        assert_eq!(receipt.lines_written, 1);
        assert_eq!(receipt.item_totals_written, 1);
        assert_eq!(exporter.sheet_titles(), vec!["Invoice 2".to_string()]);
    }

    #[tokio::test]
    async fn test_unhealthy_exporter_fails() {
        let exporter = MemoryExporter::new();
        exporter.set_healthy(false);
        let result = exporter.export(request("Invoice 2")).await;
        assert!(matches!(result, Err(TimesheetError::ExportError(_))));
        assert!(exporter.exported().is_empty());

        exporter.set_healthy(true);
        assert!(exporter.export(request("Invoice 2")).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected() {
        let exporter = MemoryExporter::new();
        exporter.export(request("Invoice 2")).await.unwrap();
        let err = exporter.export(request("Invoice 2")).await.unwrap_err();
        assert!(err.is_user_facing());
        assert_eq!(exporter.exported().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_details_rejected() {
        let exporter = MemoryExporter::new();
        let result = exporter.export(request("x")).await;
        assert!(matches!(result, Err(TimesheetError::ExportError(_))));
    }
}
