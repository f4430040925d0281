use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use laundrydesk_core::DomainError;
use laundrydesk_infra::{DispatchError, ExportError, ImageError, ImportError};

use crate::app::services::ApiExportError;

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    match err {
        DispatchError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DispatchError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DispatchError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DispatchError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized"),
        DispatchError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DispatchError::Repository(e) => {
            tracing::error!(error = %e, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    dispatch_error_to_response(DispatchError::from(err))
}

pub fn import_error_to_response(err: ImportError) -> axum::response::Response {
    match err {
        ImportError::Csv(e) => json_error(StatusCode::BAD_REQUEST, "malformed_csv", e.to_string()),
    }
}

pub fn export_error_to_response(err: ApiExportError) -> axum::response::Response {
    match err {
        ApiExportError::Dispatch(e) => dispatch_error_to_response(e),
        ApiExportError::Export(ExportError::Empty) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "nothing_to_export",
            "the selected filter matches no invoices",
        ),
        ApiExportError::Export(e) => {
            tracing::error!(error = %e, "export failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "export_error", e.to_string())
        }
    }
}

pub fn image_error_to_response(err: ImageError) -> axum::response::Response {
    match err {
        ImageError::Empty | ImageError::UnsupportedType(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        ImageError::Poisoned => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path id, mapping failure to a 400 response.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: core::str::FromStr<Err = DomainError>,
{
    raw.parse::<T>()
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}
