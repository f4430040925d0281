use core::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use laundrydesk_core::{
    Aggregate, AggregateRoot, DomainError, Event, OrderId, UserId, parse_iso_date,
};

use crate::service::{LaundryItem, Priority};

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Received,
    InProgress,
    Completed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::InProgress => "in-progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Still being worked on.
    pub fn is_active(self) -> bool {
        matches!(self, OrderStatus::Received | OrderStatus::InProgress)
    }

    /// Finished (ready or handed over); counts toward revenue.
    pub fn is_finished(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Delivered)
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "received" => Ok(OrderStatus::Received),
            "in-progress" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!("unknown order status '{other}'"))),
        }
    }
}

/// `GL-<year>-<sequence, 3 digits>`.
pub fn order_number(year: i32, sequence: usize) -> String {
    format!("GL-{}-{:03}", year, sequence)
}

/// Sequence for the next order: one past the highest sequence in use.
///
/// Numbers of deleted orders are never handed out again.
pub fn next_order_sequence(existing: &[GuestLaundryOrder]) -> usize {
    existing
        .iter()
        .filter_map(|o| o.order_number.rsplit('-').next()?.parse::<usize>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

/// Guest and scheduling fields of an order, as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub guest_name: String,
    pub room_number: String,
    pub phone_number: String,
    pub priority: Priority,
    /// `YYYY-MM-DD`.
    pub pickup_date: String,
    /// `YYYY-MM-DD`.
    pub delivery_date: String,
    #[serde(default)]
    pub notes: String,
}

/// Aggregate root: GuestLaundryOrder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestLaundryOrder {
    id: OrderId,
    order_number: String,
    guest_name: String,
    room_number: String,
    phone_number: String,
    items: Vec<LaundryItem>,
    total_amount: u64,
    status: OrderStatus,
    priority: Priority,
    pickup_date: Option<NaiveDate>,
    delivery_date: Option<NaiveDate>,
    actual_delivery_date: Option<DateTime<Utc>>,
    notes: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    created_by: Option<UserId>,
    version: u64,
    created: bool,
    deleted: bool,
}

impl GuestLaundryOrder {
    /// Create an empty, not-yet-created instance (target of `PlaceOrder`).
    pub fn empty(id: OrderId) -> Self {
        Self {
            id,
            order_number: String::new(),
            guest_name: String::new(),
            room_number: String::new(),
            phone_number: String::new(),
            items: Vec::new(),
            total_amount: 0,
            status: OrderStatus::Received,
            priority: Priority::Normal,
            pickup_date: None,
            delivery_date: None,
            actual_delivery_date: None,
            notes: String::new(),
            created_at: None,
            updated_at: None,
            created_by: None,
            version: 0,
            created: false,
            deleted: false,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn guest_name(&self) -> &str {
        &self.guest_name
    }

    pub fn room_number(&self) -> &str {
        &self.room_number
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn items(&self) -> &[LaundryItem] {
        &self.items
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn pickup_date(&self) -> Option<NaiveDate> {
        self.pickup_date
    }

    pub fn delivery_date(&self) -> Option<NaiveDate> {
        self.delivery_date
    }

    pub fn actual_delivery_date(&self) -> Option<DateTime<Utc>> {
        self.actual_delivery_date
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}

impl AggregateRoot for GuestLaundryOrder {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: PlaceOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub order_id: OrderId,
    pub order_number: String,
    pub details: OrderDetails,
    pub items: Vec<LaundryItem>,
    pub created_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateOrderStatus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderStatus {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOrder {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    PlaceOrder(PlaceOrder),
    UpdateOrderStatus(UpdateOrderStatus),
    DeleteOrder(DeleteOrder),
}

/// Event: OrderPlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
    pub order_number: String,
    pub details: OrderDetails,
    pub pickup_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub items: Vec<LaundryItem>,
    pub total_amount: u64,
    pub created_by: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDeleted {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderPlaced(OrderPlaced),
    OrderStatusChanged(OrderStatusChanged),
    OrderDeleted(OrderDeleted),
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "laundry.order.placed",
            OrderEvent::OrderStatusChanged(_) => "laundry.order.status_changed",
            OrderEvent::OrderDeleted(_) => "laundry.order.deleted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderPlaced(e) => e.occurred_at,
            OrderEvent::OrderStatusChanged(e) => e.occurred_at,
            OrderEvent::OrderDeleted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for GuestLaundryOrder {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderPlaced(e) => {
                self.id = e.order_id;
                self.order_number = e.order_number.clone();
                self.guest_name = e.details.guest_name.trim().to_string();
                self.room_number = e.details.room_number.trim().to_string();
                self.phone_number = e.details.phone_number.trim().to_string();
                self.priority = e.details.priority;
                self.notes = e.details.notes.clone();
                self.pickup_date = Some(e.pickup_date);
                self.delivery_date = Some(e.delivery_date);
                self.items = e.items.clone();
                self.total_amount = e.total_amount;
                self.status = OrderStatus::Received;
                self.created_by = Some(e.created_by);
                self.created_at = Some(e.occurred_at);
                self.updated_at = Some(e.occurred_at);
                self.created = true;
            }
            OrderEvent::OrderStatusChanged(e) => {
                self.status = e.to;
                if e.to == OrderStatus::Delivered {
                    self.actual_delivery_date = Some(e.occurred_at);
                }
                self.updated_at = Some(e.occurred_at);
            }
            OrderEvent::OrderDeleted(_) => {
                self.deleted = true;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::PlaceOrder(cmd) => self.handle_place(cmd),
            OrderCommand::UpdateOrderStatus(cmd) => self.handle_update_status(cmd),
            OrderCommand::DeleteOrder(cmd) => self.handle_delete(cmd),
        }
    }

    fn exists(&self) -> bool {
        self.created && !self.deleted
    }
}

impl GuestLaundryOrder {
    fn ensure_order_id(&self, order_id: OrderId) -> Result<(), DomainError> {
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn handle_place(&self, cmd: &PlaceOrder) -> Result<Vec<OrderEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("order already exists"));
        }
        let d = &cmd.details;
        DomainError::require_non_empty("guest name", &d.guest_name)?;
        DomainError::require_non_empty("room number", &d.room_number)?;
        DomainError::require_non_empty("phone number", &d.phone_number)?;
        let pickup_date = parse_iso_date("pickup date", &d.pickup_date)?;
        let delivery_date = parse_iso_date("delivery date", &d.delivery_date)?;

        if cmd.items.is_empty() {
            return Err(DomainError::validation(
                "an order needs at least one laundry item",
            ));
        }

        let mut total: u64 = 0;
        for item in &cmd.items {
            if item.quantity == 0 {
                return Err(DomainError::validation("item quantity must be at least 1"));
            }
            let line_total = item
                .unit_price
                .checked_mul(u64::from(item.quantity))
                .ok_or_else(|| DomainError::invariant("order line amount overflow"))?;
            if line_total != item.total_price {
                return Err(DomainError::invariant(format!(
                    "line '{}' total does not match unit price x quantity",
                    item.name
                )));
            }
            total = total
                .checked_add(line_total)
                .ok_or_else(|| DomainError::invariant("order total overflow"))?;
        }

        Ok(vec![OrderEvent::OrderPlaced(OrderPlaced {
            order_id: cmd.order_id,
            order_number: cmd.order_number.clone(),
            details: cmd.details.clone(),
            pickup_date,
            delivery_date,
            items: cmd.items.clone(),
            total_amount: total,
            created_by: cmd.created_by,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_status(
        &self,
        cmd: &UpdateOrderStatus,
    ) -> Result<Vec<OrderEvent>, DomainError> {
        if !self.exists() {
            return Err(DomainError::not_found());
        }
        self.ensure_order_id(cmd.order_id)?;

        Ok(vec![OrderEvent::OrderStatusChanged(OrderStatusChanged {
            order_id: cmd.order_id,
            from: self.status,
            to: cmd.status,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteOrder) -> Result<Vec<OrderEvent>, DomainError> {
        if !self.exists() {
            return Err(DomainError::not_found());
        }
        self.ensure_order_id(cmd.order_id)?;

        Ok(vec![OrderEvent::OrderDeleted(OrderDeleted {
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

/// Search + status + priority filter for the order list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub search: String,
    /// `None` = all statuses.
    pub status: Option<OrderStatus>,
    /// `None` = all priorities.
    pub priority: Option<Priority>,
}

impl OrderFilter {
    /// Build from query-string values where `"all"` (or empty) disables an axis.
    pub fn from_query(
        search: Option<&str>,
        status: Option<&str>,
        priority: Option<&str>,
    ) -> Result<Self, DomainError> {
        let is_all = |v: &str| v.trim().is_empty() || v.trim().eq_ignore_ascii_case("all");
        let status = match status {
            Some(s) if !is_all(s) => Some(s.parse()?),
            _ => None,
        };
        let priority = match priority {
            Some(p) if !is_all(p) => Some(p.parse()?),
            _ => None,
        };
        Ok(Self {
            search: search.unwrap_or_default().to_string(),
            status,
            priority,
        })
    }

    pub fn matches(&self, order: &GuestLaundryOrder) -> bool {
        let term = self.search.trim().to_lowercase();
        let matches_search = term.is_empty()
            || order.guest_name.to_lowercase().contains(&term)
            || order.room_number.to_lowercase().contains(&term)
            || order.order_number.to_lowercase().contains(&term);
        let matches_status = self.status.is_none_or(|s| order.status == s);
        let matches_priority = self.priority.is_none_or(|p| order.priority == p);
        matches_search && matches_status && matches_priority
    }

    pub fn apply<'a>(&self, orders: &'a [GuestLaundryOrder]) -> Vec<&'a GuestLaundryOrder> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }
}

/// Dashboard figures over all orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_orders: usize,
    pub active_orders: usize,
    pub completed_orders: usize,
    /// Sum of totals of completed and delivered orders.
    pub total_revenue: u64,
}

impl OrderStats {
    pub fn compute(orders: &[GuestLaundryOrder]) -> Self {
        orders.iter().fold(Self::default(), |mut acc, o| {
            acc.total_orders += 1;
            if o.status.is_active() {
                acc.active_orders += 1;
            }
            if o.status.is_finished() {
                acc.completed_orders += 1;
                acc.total_revenue = acc.total_revenue.saturating_add(o.total_amount);
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::LaundryService;
    use laundrydesk_core::ServiceId;

    fn shirt_line(quantity: u32, priority: Priority) -> LaundryItem {
        LaundryService {
            id: ServiceId::new(1),
            name: "Shirt".to_string(),
            category: "Clothing".to_string(),
            base_price: 15000,
            express_price: 22500,
            urgent_price: 30000,
            estimated_hours: 24,
        }
        .line_item(1, quantity, priority, None)
        .unwrap()
    }

    fn details(guest: &str, room: &str, priority: Priority) -> OrderDetails {
        OrderDetails {
            guest_name: guest.to_string(),
            room_number: room.to_string(),
            phone_number: "+62 812-3456-7890".to_string(),
            priority,
            pickup_date: "2024-01-15".to_string(),
            delivery_date: "2024-01-16".to_string(),
            notes: String::new(),
        }
    }

    fn place(id: u64, guest: &str, room: &str, items: Vec<LaundryItem>) -> Result<GuestLaundryOrder, DomainError> {
        let mut order = GuestLaundryOrder::empty(OrderId::new(id));
        let events = order.handle(&OrderCommand::PlaceOrder(PlaceOrder {
            order_id: OrderId::new(id),
            order_number: order_number(2024, id as usize),
            details: details(guest, room, Priority::Normal),
            items,
            created_by: UserId::new(1),
            occurred_at: Utc::now(),
        }))?;
        order.apply(&events[0]);
        Ok(order)
    }

    fn set_status(order: &mut GuestLaundryOrder, status: OrderStatus) {
        let events = order
            .handle(&OrderCommand::UpdateOrderStatus(UpdateOrderStatus {
                order_id: order.id_typed(),
                status,
                occurred_at: Utc::now(),
            }))
            .unwrap();
        order.apply(&events[0]);
    }

    #[test]
    fn order_numbers_are_padded() {
        assert_eq!(order_number(2024, 1), "GL-2024-001");
        assert_eq!(order_number(2025, 12), "GL-2025-012");
    }

    #[test]
    fn next_sequence_skips_numbers_of_deleted_orders() {
        assert_eq!(next_order_sequence(&[]), 1);

        let first = place(1, "John Smith", "101", vec![shirt_line(1, Priority::Normal)]).unwrap();
        let third = place(3, "Jane Doe", "305", vec![shirt_line(1, Priority::Normal)]).unwrap();
        assert_eq!(next_order_sequence(&[first.clone(), third.clone()]), 4);
        assert_eq!(next_order_sequence(&[third]), 4);
        assert_eq!(next_order_sequence(&[first]), 2);
    }

    #[test]
    fn place_order_totals_lines_and_starts_received() {
        let order = place(1, "John Smith", "101", vec![shirt_line(3, Priority::Normal)]).unwrap();
        assert_eq!(order.total_amount(), 45000);
        assert_eq!(order.status(), OrderStatus::Received);
        assert_eq!(order.order_number(), "GL-2024-001");
        assert_eq!(order.created_by(), Some(UserId::new(1)));
    }

    #[test]
    fn empty_item_list_is_rejected() {
        let err = place(1, "John Smith", "101", vec![]).unwrap_err();
        assert_eq!(err, DomainError::validation("an order needs at least one laundry item"));
    }

    #[test]
    fn required_guest_fields() {
        let err = place(1, " ", "101", vec![shirt_line(1, Priority::Normal)]).unwrap_err();
        assert_eq!(err, DomainError::validation("guest name cannot be empty"));
    }

    #[test]
    fn tampered_line_total_is_rejected() {
        let mut line = shirt_line(2, Priority::Normal);
        line.total_price = 1;
        assert!(matches!(
            place(1, "John", "101", vec![line]),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn delivered_stamps_actual_delivery_date() {
        let mut order = place(1, "John", "101", vec![shirt_line(1, Priority::Normal)]).unwrap();
        set_status(&mut order, OrderStatus::InProgress);
        assert!(order.actual_delivery_date().is_none());

        set_status(&mut order, OrderStatus::Delivered);
        assert_eq!(order.status(), OrderStatus::Delivered);
        assert!(order.actual_delivery_date().is_some());
        assert_eq!(order.actual_delivery_date(), order.updated_at());
    }

    #[test]
    fn filter_by_search_status_and_priority() {
        let mut a = place(1, "John Smith", "101", vec![shirt_line(1, Priority::Normal)]).unwrap();
        let b = place(2, "Maria Garcia", "205", vec![shirt_line(1, Priority::Normal)]).unwrap();
        set_status(&mut a, OrderStatus::Completed);
        let orders = vec![a, b];

        let by_room = OrderFilter::from_query(Some("205"), Some("all"), Some("all")).unwrap();
        assert_eq!(by_room.apply(&orders).len(), 1);

        let by_number = OrderFilter::from_query(Some("gl-2024-001"), None, None).unwrap();
        assert_eq!(by_number.apply(&orders)[0].guest_name(), "John Smith");

        let completed = OrderFilter::from_query(None, Some("completed"), None).unwrap();
        assert_eq!(completed.apply(&orders).len(), 1);

        let urgent = OrderFilter::from_query(None, None, Some("urgent")).unwrap();
        assert!(urgent.apply(&orders).is_empty());

        assert!(OrderFilter::from_query(None, Some("lost"), None).is_err());
    }

    #[test]
    fn stats_count_active_finished_and_revenue() {
        let mut a = place(1, "A", "1", vec![shirt_line(2, Priority::Normal)]).unwrap();
        let mut b = place(2, "B", "2", vec![shirt_line(1, Priority::Normal)]).unwrap();
        let c = place(3, "C", "3", vec![shirt_line(1, Priority::Normal)]).unwrap();
        let mut d = place(4, "D", "4", vec![shirt_line(1, Priority::Normal)]).unwrap();
        set_status(&mut a, OrderStatus::Completed);
        set_status(&mut b, OrderStatus::Delivered);
        set_status(&mut d, OrderStatus::Cancelled);

        let stats = OrderStats::compute(&[a, b, c, d]);
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.active_orders, 1);
        assert_eq!(stats.completed_orders, 2);
        assert_eq!(stats.total_revenue, 30000 + 15000);
    }
}
