//! Calendar date helpers shared by the log book, invoices and orders.

use chrono::NaiveDate;

use crate::error::{DomainError, DomainResult};

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(field: &str, value: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("{field} must be a YYYY-MM-DD date")))
}
