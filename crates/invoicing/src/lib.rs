//! Invoicing domain module: invoices derived from the log book.
//!
//! One invoice per distinct pick-up date, priced from the item table. Invoices
//! are recomputed on demand; manual edits are kept separately and merged back
//! by pick-up date.

pub mod aggregation;
pub mod filter;
pub mod invoice;
pub mod overrides;

pub use aggregation::aggregate;
pub use filter::{InvoiceFilter, MonthFilter, YearFilter, year_options};
pub use invoice::{InvoiceEntry, invoice_number};
pub use overrides::{EditInvoice, InvoiceOverride, InvoiceOverrides};
