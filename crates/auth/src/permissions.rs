use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings named after the module they open
/// (e.g. "invoices.export"). The wildcard `"*"` grants everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const CATEGORIES_READ: &'static str = "categories.read";
    pub const CATEGORIES_WRITE: &'static str = "categories.write";
    pub const LOGBOOK_READ: &'static str = "logbook.read";
    pub const LOGBOOK_WRITE: &'static str = "logbook.write";
    pub const INVOICES_READ: &'static str = "invoices.read";
    pub const INVOICES_WRITE: &'static str = "invoices.write";
    pub const INVOICES_EXPORT: &'static str = "invoices.export";
    pub const LAUNDRY_READ: &'static str = "laundry.read";
    pub const LAUNDRY_WRITE: &'static str = "laundry.write";
    pub const LAUNDRY_DELETE: &'static str = "laundry.delete";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
