use laundrydesk_catalog::Category;
use laundrydesk_invoicing::InvoiceEntry;

use super::{ExportError, INVOICE_HEADERS, return_date_cell};

pub const CATEGORY_HEADERS: [&str; 7] =
    ["id", "code", "name", "description", "status", "createdAt", "updatedAt"];

/// Categories as CSV, one row per category. Timestamps are RFC 3339.
pub fn categories_csv(categories: &[Category]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = ::csv::Writer::from_writer(Vec::new());
    wtr.write_record(CATEGORY_HEADERS)?;

    for c in categories {
        let created_at = c.created_at().map(|t| t.to_rfc3339()).unwrap_or_default();
        let updated_at = c.updated_at().map(|t| t.to_rfc3339()).unwrap_or_default();
        wtr.write_record([
            c.id_typed().to_string().as_str(),
            c.code(),
            c.name(),
            c.description(),
            c.status().as_str(),
            created_at.as_str(),
            updated_at.as_str(),
        ])?;
    }

    finish(wtr)
}

/// Invoices as CSV with `-` for a missing return date.
pub fn invoices_csv(invoices: &[InvoiceEntry]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = ::csv::Writer::from_writer(Vec::new());
    wtr.write_record(INVOICE_HEADERS)?;

    for inv in invoices {
        wtr.write_record([
            inv.invoice_no.as_str(),
            inv.pickup_date.as_str(),
            return_date_cell(inv),
            inv.total_price.to_string().as_str(),
        ])?;
    }

    finish(wtr)
}

fn finish(wtr: ::csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use laundrydesk_catalog::{CategoryCommand, CreateCategory};
    use laundrydesk_core::{Aggregate, CategoryId, LogEntryId};

    use super::*;

    #[test]
    fn invoice_rows_use_dash_for_missing_return_date() {
        let invoices = vec![
            InvoiceEntry {
                invoice_no: "INV-20240101-001".to_string(),
                pickup_date: "2024-01-01".to_string(),
                return_date: None,
                total_price: 45000,
                log_entry_ids: vec![LogEntryId::new(1)],
            },
            InvoiceEntry {
                invoice_no: "INV-20240102-002".to_string(),
                pickup_date: "2024-01-02".to_string(),
                return_date: Some("2024-01-04".to_string()),
                total_price: 12000,
                log_entry_ids: vec![LogEntryId::new(2)],
            },
        ];

        let out = String::from_utf8(invoices_csv(&invoices).unwrap()).unwrap();
        assert_eq!(
            out,
            "NO. INVOICE,PICK UP DATE,RETURN DATE,TOTAL PRICE\n\
             INV-20240101-001,2024-01-01,-,45000\n\
             INV-20240102-002,2024-01-02,2024-01-04,12000\n"
        );
    }

    #[test]
    fn category_rows_quote_embedded_commas() {
        let mut c = Category::empty(CategoryId::new(1));
        let events = c
            .handle(&CategoryCommand::CreateCategory(CreateCategory {
                category_id: CategoryId::new(1),
                code: "LIN".to_string(),
                name: "Linen".to_string(),
                description: "Sheets, pillow cases".to_string(),
                occurred_at: Utc::now(),
            }))
            .unwrap();
        c.apply(&events[0]);

        let out = String::from_utf8(categories_csv(&[c]).unwrap()).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("id,code,name,description,status,createdAt,updatedAt"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,LIN,Linen,\"Sheets, pillow cases\",active,"));
    }
}
