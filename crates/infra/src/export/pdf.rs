use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use laundrydesk_invoicing::InvoiceEntry;

use super::{ExportError, INVOICE_HEADERS, return_date_cell};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const TITLE_Y_MM: f32 = 280.0;
const TABLE_TOP_MM: f32 = 266.0;
const ROW_HEIGHT_MM: f32 = 7.0;
const BOTTOM_MM: f32 = 20.0;
const COLUMN_X_MM: [f32; 4] = [15.0, 70.0, 110.0, 150.0];

/// Table rows that fit on one A4 page below the title and header row.
pub fn rows_per_page() -> usize {
    ((TABLE_TOP_MM - ROW_HEIGHT_MM - BOTTOM_MM) / ROW_HEIGHT_MM).floor() as usize
}

/// Pages needed for `rows` invoices (at least one).
pub fn page_count(rows: usize) -> usize {
    rows.div_ceil(rows_per_page()).max(1)
}

/// `45000` → `Rp 45.000`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp {grouped}")
}

/// Invoices as an A4 PDF table, continued over as many pages as needed.
pub fn invoices_pdf(invoices: &[InvoiceEntry]) -> Result<Vec<u8>, ExportError> {
    let (doc, page1, layer1) =
        PdfDocument::new("Invoices", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let total_pages = page_count(invoices.len());
    let mut chunks = invoices.chunks(rows_per_page());

    for page_no in 1..=total_pages {
        let layer = if page_no == 1 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Layer {page_no}"),
            );
            doc.get_page(page).get_layer(layer)
        };

        layer.use_text("Invoices", 16.0, Mm(MARGIN_MM), Mm(TITLE_Y_MM), &font_bold);
        layer.use_text(
            format!("Page {page_no} of {total_pages}"),
            9.0,
            Mm(165.0),
            Mm(TITLE_Y_MM),
            &font,
        );

        for (col, heading) in INVOICE_HEADERS.iter().enumerate() {
            layer.use_text(*heading, 10.0, Mm(COLUMN_X_MM[col]), Mm(TABLE_TOP_MM), &font_bold);
        }
        rule(&layer, TABLE_TOP_MM - 2.5);

        let mut y = TABLE_TOP_MM - ROW_HEIGHT_MM;
        for inv in chunks.next().unwrap_or_default() {
            write_row(&layer, &font, inv, y);
            y -= ROW_HEIGHT_MM;
        }
    }

    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

fn write_row(layer: &PdfLayerReference, font: &IndirectFontRef, inv: &InvoiceEntry, y: f32) {
    layer.use_text(inv.invoice_no.as_str(), 10.0, Mm(COLUMN_X_MM[0]), Mm(y), font);
    layer.use_text(inv.pickup_date.as_str(), 10.0, Mm(COLUMN_X_MM[1]), Mm(y), font);
    layer.use_text(return_date_cell(inv), 10.0, Mm(COLUMN_X_MM[2]), Mm(y), font);
    layer.use_text(format_amount(inv.total_price), 10.0, Mm(COLUMN_X_MM[3]), Mm(y), font);
}

fn rule(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN_MM), Mm(y)), false),
            (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(y)), false),
        ],
        is_closed: false,
    });
}
