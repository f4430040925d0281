use serde::{Deserialize, Serialize};

use laundrydesk_core::LogEntryId;

/// Invoice for one pick-up date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEntry {
    pub invoice_no: String,
    /// `YYYY-MM-DD`; the grouping key.
    pub pickup_date: String,
    /// Filled in by hand once the linen comes back.
    pub return_date: Option<String>,
    /// Total in smallest currency unit.
    pub total_price: u64,
    pub log_entry_ids: Vec<LogEntryId>,
}

/// `INV-<date without dashes>-<sequence, 3 digits>`.
pub fn invoice_number(pickup_date: &str, sequence: usize) -> String {
    format!("INV-{}-{:03}", pickup_date.replace('-', ""), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_invoice_number() {
        assert_eq!(invoice_number("2024-01-05", 1), "INV-20240105-001");
        assert_eq!(invoice_number("2024-12-31", 42), "INV-20241231-042");
        assert_eq!(invoice_number("2024-12-31", 1234), "INV-20241231-1234");
    }
}
