use core::str::FromStr;

use serde::{Deserialize, Serialize};

use laundrydesk_core::{DomainError, DomainResult, ServiceId};

/// Service type recorded on a line when none is chosen.
pub const DEFAULT_SERVICE_TYPE: &str = "Wash & Iron";

/// Turnaround priority; selects the price tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    Express,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Express => "express",
            Priority::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Priority::Normal),
            "express" => Ok(Priority::Express),
            "urgent" => Ok(Priority::Urgent),
            other => Err(DomainError::validation(format!("unknown priority '{other}'"))),
        }
    }
}

/// Price list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaundryService {
    pub id: ServiceId,
    pub name: String,
    pub category: String,
    pub base_price: u64,
    pub express_price: u64,
    pub urgent_price: u64,
    pub estimated_hours: u32,
}

impl LaundryService {
    pub fn unit_price(&self, priority: Priority) -> u64 {
        match priority {
            Priority::Normal => self.base_price,
            Priority::Express => self.express_price,
            Priority::Urgent => self.urgent_price,
        }
    }

    /// Price a line for `quantity` pieces at `priority`.
    pub fn line_item(
        &self,
        line_id: u64,
        quantity: u32,
        priority: Priority,
        service_type: Option<&str>,
    ) -> DomainResult<LaundryItem> {
        if quantity == 0 {
            return Err(DomainError::validation("item quantity must be at least 1"));
        }
        let unit_price = self.unit_price(priority);
        let service = service_type
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SERVICE_TYPE);

        Ok(LaundryItem {
            id: line_id,
            name: self.name.clone(),
            category: self.category.clone(),
            service: service.to_string(),
            quantity,
            unit_price,
            total_price: unit_price.saturating_mul(u64::from(quantity)),
        })
    }
}

/// One priced line of a guest order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaundryItem {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub service: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub total_price: u64,
}
