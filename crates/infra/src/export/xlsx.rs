use rust_xlsxwriter::{Format, Workbook};

use laundrydesk_invoicing::InvoiceEntry;

use super::{ExportError, INVOICE_HEADERS, return_date_cell};

pub const INVOICE_SHEET: &str = "Invoices";

/// Invoices as a single-sheet workbook. Totals are numeric cells.
pub fn invoices_xlsx(invoices: &[InvoiceEntry]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(INVOICE_SHEET)?;

    for (col, heading) in INVOICE_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *heading, &bold)?;
    }
    sheet.set_column_width(0, 20)?;
    sheet.set_column_width(1, 14)?;
    sheet.set_column_width(2, 14)?;
    sheet.set_column_width(3, 14)?;

    for (idx, inv) in invoices.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, inv.invoice_no.as_str())?;
        sheet.write_string(row, 1, inv.pickup_date.as_str())?;
        sheet.write_string(row, 2, return_date_cell(inv))?;
        sheet.write_number(row, 3, inv.total_price as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}
