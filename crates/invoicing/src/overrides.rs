//! Manual invoice edits that survive recomputation.
//!
//! Invoices are regenerated from the log book on every read, so the invoice
//! number and return date typed in by a user are stored here, keyed by
//! pick-up date, and laid over each freshly generated list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use laundrydesk_core::{DomainError, DomainResult, parse_iso_date};

use crate::invoice::InvoiceEntry;

/// A user edit of one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditInvoice {
    pub pickup_date: String,
    pub invoice_no: String,
    /// `YYYY-MM-DD`, or `None` to clear.
    pub return_date: Option<String>,
}

/// Stored override for one pick-up date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceOverride {
    pub invoice_no: String,
    pub return_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceOverrides {
    by_pickup_date: BTreeMap<String, InvoiceOverride>,
}

impl InvoiceOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pickup_date: &str) -> Option<&InvoiceOverride> {
        self.by_pickup_date.get(pickup_date)
    }

    pub fn len(&self) -> usize {
        self.by_pickup_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pickup_date.is_empty()
    }

    /// Validate `edit` against the currently shown invoices and record it.
    ///
    /// `current` must already have overrides merged, so that a number typed
    /// in earlier for another date counts as taken.
    pub fn edit(&mut self, current: &[InvoiceEntry], edit: EditInvoice) -> DomainResult<InvoiceEntry> {
        let invoice_no = edit.invoice_no.trim().to_string();
        DomainError::require_non_empty("invoice number", &invoice_no)?;

        let return_date = match edit.return_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let date = parse_iso_date("return date", raw)?;
                Some(date.format("%Y-%m-%d").to_string())
            }
        };

        let Some(target) = current.iter().find(|i| i.pickup_date == edit.pickup_date) else {
            return Err(DomainError::not_found());
        };

        let duplicate = current
            .iter()
            .any(|i| i.pickup_date != edit.pickup_date && i.invoice_no == invoice_no);
        if duplicate {
            return Err(DomainError::conflict(format!(
                "invoice number '{invoice_no}' is already in use"
            )));
        }

        self.by_pickup_date.insert(
            edit.pickup_date.clone(),
            InvoiceOverride {
                invoice_no: invoice_no.clone(),
                return_date: return_date.clone(),
            },
        );

        Ok(InvoiceEntry {
            invoice_no,
            return_date,
            ..target.clone()
        })
    }

    /// Lay stored edits over freshly generated invoices.
    ///
    /// Overrides for dates that currently have no invoice are kept and
    /// reapply once the date shows up again.
    pub fn merge(&self, generated: Vec<InvoiceEntry>) -> Vec<InvoiceEntry> {
        generated
            .into_iter()
            .map(|mut invoice| {
                if let Some(o) = self.by_pickup_date.get(&invoice.pickup_date) {
                    invoice.invoice_no = o.invoice_no.clone();
                    invoice.return_date = o.return_date.clone();
                }
                invoice
            })
            .collect()
    }
}
