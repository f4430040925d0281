use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{Datelike, Utc};

use laundrydesk_auth::Permission;
use laundrydesk_infra::ExportFormat;
use laundrydesk_invoicing::{EditInvoice, InvoiceFilter, MonthFilter, YearFilter, year_options};

use crate::app::{dto, errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices))
        .route("/years", get(list_years))
        .route("/export.csv", get(export_csv))
        .route("/export.xlsx", get(export_xlsx))
        .route("/export.pdf", get(export_pdf))
        .route("/:pickup_date", put(edit_invoice))
}

fn parse_filter(q: &dto::InvoiceQuery) -> Result<InvoiceFilter, axum::response::Response> {
    let month: MonthFilter = q
        .month
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(errors::domain_error_to_response)?;
    let year: YearFilter = q
        .year
        .as_deref()
        .unwrap_or("all")
        .parse()
        .map_err(errors::domain_error_to_response)?;
    Ok(InvoiceFilter::new(month, year))
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(q): Query<dto::InvoiceQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::INVOICES_READ) {
        return resp;
    }
    let filter = match parse_filter(&q) {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    match services.list_invoices(&filter) {
        Ok(invoices) => (StatusCode::OK, Json(invoices)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

/// Year picker choices around the current year.
pub async fn list_years(
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::INVOICES_READ) {
        return resp;
    }

    (StatusCode::OK, Json(year_options(Utc::now().year()))).into_response()
}

/// Manually set the invoice number and return date for a pick-up date.
pub async fn edit_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(pickup_date): Path<String>,
    Json(body): Json<dto::EditInvoiceRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&principal, Permission::INVOICES_WRITE) {
        return resp;
    }

    let edit = EditInvoice {
        pickup_date,
        invoice_no: body.invoice_no,
        return_date: body.return_date,
    };
    match services.edit_invoice(edit) {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn export_csv(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(q): Query<dto::InvoiceQuery>,
) -> axum::response::Response {
    export(&services, &principal, &q, ExportFormat::Csv)
}

pub async fn export_xlsx(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(q): Query<dto::InvoiceQuery>,
) -> axum::response::Response {
    export(&services, &principal, &q, ExportFormat::Xlsx)
}

pub async fn export_pdf(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(q): Query<dto::InvoiceQuery>,
) -> axum::response::Response {
    export(&services, &principal, &q, ExportFormat::Pdf)
}

fn export(
    services: &AppServices,
    principal: &PrincipalContext,
    q: &dto::InvoiceQuery,
    format: ExportFormat,
) -> axum::response::Response {
    if let Err(resp) = authz::require(principal, Permission::INVOICES_EXPORT) {
        return resp;
    }
    let filter = match parse_filter(q) {
        Ok(f) => f,
        Err(resp) => return resp,
    };

    match services.export_invoices(format, &filter) {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", format.file_name()),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => errors::export_error_to_response(e),
    }
}
