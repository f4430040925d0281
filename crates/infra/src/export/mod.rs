//! File exports: categories as CSV, invoices as CSV, XLSX or PDF.
//!
//! Every exporter renders into memory and returns the finished bytes, so a
//! failure never leaves a partial file behind.

use thiserror::Error;

use laundrydesk_invoicing::InvoiceEntry;

pub mod csv;
pub mod pdf;
pub mod xlsx;

pub use self::csv::{categories_csv, invoices_csv};
pub use self::pdf::invoices_pdf;
pub use self::xlsx::invoices_xlsx;

/// Column headings shared by every invoice export.
pub const INVOICE_HEADERS: [&str; 4] = ["NO. INVOICE", "PICK UP DATE", "RETURN DATE", "TOTAL PRICE"];

/// Placeholder written for an invoice without a return date.
pub const NO_RETURN_DATE: &str = "-";

#[derive(Debug, Error)]
pub enum ExportError {
    /// The (filtered) invoice list is empty.
    #[error("nothing to export")]
    Empty,
    #[error("csv export failed: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("xlsx export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("pdf export failed: {0}")]
    Pdf(String),
    #[error("export io failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format of an invoice export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "invoices.csv",
            ExportFormat::Xlsx => "invoices.xlsx",
            ExportFormat::Pdf => "invoices.pdf",
        }
    }
}

/// Render `invoices` in `format`. An empty list is refused.
pub fn export_invoices(format: ExportFormat, invoices: &[InvoiceEntry]) -> Result<Vec<u8>, ExportError> {
    if invoices.is_empty() {
        tracing::warn!(format = ?format, "invoice export refused: nothing to export");
        return Err(ExportError::Empty);
    }

    let bytes = match format {
        ExportFormat::Csv => invoices_csv(invoices)?,
        ExportFormat::Xlsx => invoices_xlsx(invoices)?,
        ExportFormat::Pdf => invoices_pdf(invoices)?,
    };

    tracing::info!(format = ?format, invoices = invoices.len(), bytes = bytes.len(), "invoices exported");
    Ok(bytes)
}

fn return_date_cell(invoice: &InvoiceEntry) -> &str {
    invoice.return_date.as_deref().unwrap_or(NO_RETURN_DATE)
}
