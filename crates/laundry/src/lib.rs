//! Guest laundry domain module: the service price list and guest orders.
//!
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod order;
pub mod service;

pub use order::{
    DeleteOrder, GuestLaundryOrder, OrderCommand, OrderDeleted, OrderDetails, OrderEvent,
    OrderFilter, OrderPlaced, OrderStats, OrderStatus, OrderStatusChanged, PlaceOrder,
    UpdateOrderStatus, next_order_sequence, order_number,
};
pub use service::{DEFAULT_SERVICE_TYPE, LaundryItem, LaundryService, Priority};
