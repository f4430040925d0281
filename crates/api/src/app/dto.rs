use serde::Deserialize;

use laundrydesk_catalog::{Category, CategoryStatus, Item};
use laundrydesk_core::{ItemId, ServiceId};
use laundrydesk_laundry::{GuestLaundryOrder, OrderDetails, Priority};
use laundrydesk_logbook::{LogEntry, Quantities};

use crate::app::services::{CategoryInput, OrderLineInput};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<CategoryStatus>,
}

impl CategoryRequest {
    pub fn into_parts(self) -> (CategoryInput, Option<CategoryStatus>) {
        (
            CategoryInput {
                code: self.code,
                name: self.name,
                description: self.description,
            },
            self.status,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryRequest {
    pub date: String,
    pub item_id: ItemId,
    pub out_quantity: u32,
    pub in_quantity: u32,
    pub pending_quantity: u32,
}

impl LogEntryRequest {
    pub fn quantities(&self) -> Quantities {
        Quantities {
            out_quantity: self.out_quantity,
            in_quantity: self.in_quantity,
            pending_quantity: self.pending_quantity,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReturnRequest {
    pub quantity: u32,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditInvoiceRequest {
    pub invoice_no: String,
    pub return_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub service_id: ServiceId,
    pub quantity: u32,
    /// Service type, e.g. "Dry Clean"; defaults to "Wash & Iron".
    pub service: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub guest_name: String,
    pub room_number: String,
    pub phone_number: String,
    #[serde(default)]
    pub priority: Priority,
    pub pickup_date: String,
    pub delivery_date: String,
    #[serde(default)]
    pub notes: String,
    pub items: Vec<OrderLineRequest>,
}

impl PlaceOrderRequest {
    pub fn into_parts(self) -> (OrderDetails, Vec<OrderLineInput>) {
        let lines = self
            .items
            .into_iter()
            .map(|l| OrderLineInput {
                service_id: l.service_id,
                quantity: l.quantity,
                service_type: l.service,
            })
            .collect();
        let details = OrderDetails {
            guest_name: self.guest_name,
            room_number: self.room_number,
            phone_number: self.phone_number,
            priority: self.priority,
            pickup_date: self.pickup_date,
            delivery_date: self.delivery_date,
            notes: self.notes,
        };
        (details, lines)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

// -------------------------
// Response mapping
// -------------------------

pub fn category_to_json(c: &Category, item_count: usize) -> serde_json::Value {
    serde_json::json!({
        "id": c.id_typed(),
        "code": c.code(),
        "name": c.name(),
        "description": c.description(),
        "status": c.status(),
        "itemCount": item_count,
        "createdAt": c.created_at().map(|t| t.to_rfc3339()),
        "updatedAt": c.updated_at().map(|t| t.to_rfc3339()),
    })
}

pub fn item_to_json(item: &Item) -> serde_json::Value {
    serde_json::json!({
        "id": item.id,
        "name": item.name,
        "category": item.category,
        "price": item.price,
    })
}

pub fn log_entry_to_json(e: &LogEntry) -> serde_json::Value {
    serde_json::json!({
        "id": e.id_typed(),
        "date": e.date_iso(),
        "itemId": e.item_id(),
        "itemName": e.item_name(),
        "outQuantity": e.out_quantity(),
        "inQuantity": e.in_quantity(),
        "pendingQuantity": e.pending_quantity(),
        "returnedQuantity": e.returned_quantity(),
        "remainingQuantity": e.remaining(),
        "returnedImageUrl": e.returned_image_url(),
        "returnedDate": e.returned_date().map(|t| t.to_rfc3339()),
        "status": e.status(),
    })
}

pub fn order_to_json(o: &GuestLaundryOrder) -> serde_json::Value {
    serde_json::json!({
        "id": o.id_typed(),
        "orderNumber": o.order_number(),
        "guestName": o.guest_name(),
        "roomNumber": o.room_number(),
        "phoneNumber": o.phone_number(),
        "items": o.items(),
        "totalAmount": o.total_amount(),
        "status": o.status(),
        "priority": o.priority(),
        "pickupDate": o.pickup_date().map(|d| d.format("%Y-%m-%d").to_string()),
        "deliveryDate": o.delivery_date().map(|d| d.format("%Y-%m-%d").to_string()),
        "actualDeliveryDate": o.actual_delivery_date().map(|t| t.to_rfc3339()),
        "notes": o.notes(),
        "createdAt": o.created_at().map(|t| t.to_rfc3339()),
        "updatedAt": o.updated_at().map(|t| t.to_rfc3339()),
        "createdBy": o.created_by(),
    })
}
