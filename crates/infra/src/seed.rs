//! Sample data loaded at startup.
//!
//! Records are created through the same dispatchers the API uses, so every
//! sample passes the domain validation.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use laundrydesk_catalog::{Category, CategoryCommand, CreateCategory, Item, LINEN_CATALOG};
use laundrydesk_core::{ItemId, LogEntryId, OrderId, ServiceId, UserId};
use laundrydesk_laundry::{
    GuestLaundryOrder, LaundryItem, LaundryService, OrderCommand, OrderDetails, OrderStatus,
    PlaceOrder, Priority, UpdateOrderStatus,
};
use laundrydesk_logbook::{AddLogEntry, LogEntry, LogEntryCommand, Quantities};

use crate::dispatcher::{CommandDispatcher, DispatchError};
use crate::repository::{Repository, RepositoryError};

/// Counts of seeded records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub items: usize,
    pub log_entries: usize,
    pub services: usize,
    pub orders: usize,
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .map(|n| n.and_utc())
        .unwrap_or_default()
}

/// `(code, name, description)`.
pub const SAMPLE_CATEGORIES: [(&str, &str, &str); 4] = [
    ("TWL", "Towel", "Bath towels, bath mats and robes"),
    ("BED", "Bed Linen", "Sheets, duvet covers, inner duvets and pillow cases"),
    ("FNB", "F&B Linen", "Napkins, chair covers and table cloths"),
    ("GST", "Guest Laundry", "Guest garments handled per order"),
];

fn item_category_and_price(item_id: u64) -> (&'static str, u64) {
    match item_id {
        1 | 2 => ("Towel", 6_000),
        3 => ("Towel", 4_000),
        4 | 5 => ("Bed Linen", 7_500),
        6 | 7 => ("Bed Linen", 9_000),
        8..=10 => ("Bed Linen", 3_500),
        11 | 12 => ("Bed Linen", 15_000),
        13 | 14 => ("Bed Linen", 10_000),
        15 => ("F&B Linen", 2_500),
        16 | 17 => ("F&B Linen", 8_000),
        _ => ("Towel", 12_000),
    }
}

/// One priced item per linen catalog entry, sharing the catalog ids.
pub fn sample_items() -> Vec<Item> {
    LINEN_CATALOG
        .iter()
        .map(|(id, name)| {
            let (category, price) = item_category_and_price(*id);
            Item {
                id: ItemId::new(*id),
                name: (*name).to_string(),
                category: category.to_string(),
                price,
            }
        })
        .collect()
}

/// The guest laundry price list.
pub fn sample_services() -> Vec<LaundryService> {
    let service = |id: u64, name: &str, category: &str, base: u64, hours: u32| LaundryService {
        id: ServiceId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        base_price: base,
        express_price: base * 3 / 2,
        urgent_price: base * 2,
        estimated_hours: hours,
    };

    vec![
        service(1, "Shirt", "Clothing", 15_000, 24),
        service(2, "Pants/Trousers", "Clothing", 18_000, 24),
        service(3, "Dress", "Clothing", 25_000, 48),
        service(4, "Suit Jacket", "Formal", 35_000, 48),
        service(5, "Bed Sheet", "Linen", 20_000, 12),
        service(6, "Towel", "Linen", 8_000, 8),
        service(7, "Curtain", "Linen", 30_000, 72),
        service(8, "Blanket", "Linen", 25_000, 48),
    ]
}

/// `(date, item id, out, in, pending)`.
const SAMPLE_LOG: [(&str, u64, u32, u32, u32); 6] = [
    ("2024-01-15", 1, 20, 18, 2),
    ("2024-01-15", 4, 15, 15, 0),
    ("2024-01-16", 8, 30, 26, 4),
    ("2024-01-17", 15, 12, 12, 0),
    ("2024-01-17", 11, 0, 3, 0),
    ("2024-02-01", 5, 10, 7, 3),
];

struct SampleOrder {
    details: OrderDetails,
    lines: &'static [(u64, u32, &'static str)],
    status: OrderStatus,
    placed_at: DateTime<Utc>,
    status_at: DateTime<Utc>,
}

fn sample_orders() -> Vec<SampleOrder> {
    let details = |guest: &str, room: &str, phone: &str, priority: Priority, pickup: &str, delivery: &str, notes: &str| {
        OrderDetails {
            guest_name: guest.to_string(),
            room_number: room.to_string(),
            phone_number: phone.to_string(),
            priority,
            pickup_date: pickup.to_string(),
            delivery_date: delivery.to_string(),
            notes: notes.to_string(),
        }
    };

    vec![
        SampleOrder {
            details: details(
                "John Smith",
                "101",
                "+62 812-3456-7890",
                Priority::Normal,
                "2024-01-15",
                "2024-01-16",
                "Please handle with care",
            ),
            lines: &[(1, 3, "Wash & Iron"), (2, 2, "Wash & Iron")],
            status: OrderStatus::InProgress,
            placed_at: at(2024, 1, 15, 9, 0),
            status_at: at(2024, 1, 15, 9, 0),
        },
        SampleOrder {
            details: details(
                "Maria Garcia",
                "205",
                "+62 813-9876-5432",
                Priority::Express,
                "2024-01-14",
                "2024-01-15",
                "Express service requested",
            ),
            lines: &[(3, 1, "Dry Clean"), (4, 1, "Dry Clean")],
            status: OrderStatus::Completed,
            placed_at: at(2024, 1, 14, 10, 30),
            status_at: at(2024, 1, 15, 14, 30),
        },
        SampleOrder {
            details: details(
                "David Johnson",
                "312",
                "+62 814-1111-2222",
                Priority::Normal,
                "2024-01-16",
                "2024-01-17",
                "",
            ),
            lines: &[(5, 2, "Wash & Fold"), (6, 4, "Wash & Fold")],
            status: OrderStatus::Received,
            placed_at: at(2024, 1, 16, 8, 15),
            status_at: at(2024, 1, 16, 8, 15),
        },
    ]
}

/// Seed categories through the category dispatcher.
pub fn seed_categories<R>(categories: &CommandDispatcher<Category, R>) -> Result<usize, DispatchError>
where
    R: Repository<laundrydesk_core::CategoryId, Category>,
{
    for (code, name, description) in SAMPLE_CATEGORIES {
        categories.create(Category::empty, |id, _| {
            Ok(CategoryCommand::CreateCategory(CreateCategory {
                category_id: id,
                code: code.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                occurred_at: at(2024, 1, 1, 8, 0),
            }))
        })?;
    }
    Ok(SAMPLE_CATEGORIES.len())
}

pub fn seed_items<R>(items: &R) -> Result<usize, RepositoryError>
where
    R: Repository<ItemId, Item>,
{
    let sample = sample_items();
    let count = sample.len();
    for item in sample {
        items.upsert(item.id, item)?;
    }
    Ok(count)
}

pub fn seed_services<R>(services: &R) -> Result<usize, RepositoryError>
where
    R: Repository<ServiceId, LaundryService>,
{
    let sample = sample_services();
    let count = sample.len();
    for service in sample {
        services.upsert(service.id, service)?;
    }
    Ok(count)
}

pub fn seed_log_entries<R>(log: &CommandDispatcher<LogEntry, R>) -> Result<usize, DispatchError>
where
    R: Repository<LogEntryId, LogEntry>,
{
    for (date, item, out_quantity, in_quantity, pending_quantity) in SAMPLE_LOG {
        log.create(LogEntry::empty, |id, _| {
            Ok(LogEntryCommand::AddLogEntry(AddLogEntry {
                entry_id: id,
                date: date.to_string(),
                item_id: ItemId::new(item),
                quantities: Quantities {
                    out_quantity,
                    in_quantity,
                    pending_quantity,
                },
                occurred_at: Utc::now(),
            }))
        })?;
    }
    Ok(SAMPLE_LOG.len())
}

/// Seed guest orders, pricing each line from `services`.
pub fn seed_orders<R>(
    orders: &CommandDispatcher<GuestLaundryOrder, R>,
    services: &[LaundryService],
    created_by: UserId,
) -> Result<usize, DispatchError>
where
    R: Repository<OrderId, GuestLaundryOrder>,
{
    let sample = sample_orders();
    let count = sample.len();

    for order in sample {
        let lines = order
            .lines
            .iter()
            .enumerate()
            .map(|(idx, (service_id, quantity, service_type))| {
                let service = services
                    .iter()
                    .find(|s| s.id == ServiceId::new(*service_id))
                    .ok_or(DispatchError::NotFound)?;
                Ok(service.line_item(
                    idx as u64 + 1,
                    *quantity,
                    order.details.priority,
                    Some(*service_type),
                )?)
            })
            .collect::<Result<Vec<LaundryItem>, DispatchError>>()?;

        let placed = orders.create(GuestLaundryOrder::empty, |id, existing| {
            Ok(OrderCommand::PlaceOrder(PlaceOrder {
                order_id: id,
                order_number: laundrydesk_laundry::order_number(
                    order.placed_at.year(),
                    laundrydesk_laundry::next_order_sequence(existing),
                ),
                details: order.details.clone(),
                items: lines,
                created_by,
                occurred_at: order.placed_at,
            }))
        })?;

        if order.status != OrderStatus::Received {
            let id = placed.aggregate.id_typed();
            orders.dispatch(
                id,
                OrderCommand::UpdateOrderStatus(UpdateOrderStatus {
                    order_id: id,
                    status: order.status,
                    occurred_at: order.status_at,
                }),
            )?;
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use laundrydesk_laundry::OrderStats;

    use super::*;
    use crate::repository::InMemoryRepository;

    #[test]
    fn every_catalog_item_has_a_price_and_a_seeded_category() {
        let items = sample_items();
        assert_eq!(items.len(), 18);
        for item in &items {
            assert!(item.price > 0);
            assert!(SAMPLE_CATEGORIES.iter().any(|(_, name, _)| *name == item.category));
        }
    }

    #[test]
    fn service_tiers_follow_base_price() {
        let services = sample_services();
        assert_eq!(services.len(), 8);
        let suit = &services[3];
        assert_eq!(suit.name, "Suit Jacket");
        assert_eq!(
            (suit.base_price, suit.express_price, suit.urgent_price),
            (35_000, 52_500, 70_000)
        );
    }

    #[test]
    fn seeded_orders_match_the_sample_figures() {
        let orders = CommandDispatcher::new(
            "laundry.order",
            Arc::new(InMemoryRepository::<OrderId, GuestLaundryOrder>::new()),
        );
        assert_eq!(seed_orders(&orders, &sample_services(), UserId::new(1)).unwrap(), 3);

        let all = orders.repository().list();
        let numbers: Vec<_> = all.iter().map(|o| o.order_number().to_string()).collect();
        assert_eq!(numbers, vec!["GL-2024-001", "GL-2024-002", "GL-2024-003"]);
        assert_eq!(all[0].total_amount(), 81_000);
        assert_eq!(all[1].total_amount(), 90_000);
        assert_eq!(all[2].total_amount(), 72_000);
        for order in &all {
            let line_ids: Vec<u64> = order.items().iter().map(|l| l.id).collect();
            let expected: Vec<u64> = (1..=order.items().len() as u64).collect();
            assert_eq!(line_ids, expected, "{}", order.order_number());
        }

        let stats = OrderStats::compute(&all);
        assert_eq!(stats.active_orders, 2);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.total_revenue, 90_000);
    }

    #[test]
    fn seeded_log_produces_invoices() {
        let log = CommandDispatcher::new(
            "logbook.entry",
            Arc::new(InMemoryRepository::<LogEntryId, LogEntry>::new()),
        );
        seed_log_entries(&log).unwrap();

        let invoices = laundrydesk_invoicing::aggregate(&log.repository().list(), &sample_items());
        let dates: Vec<_> = invoices.iter().map(|i| i.pickup_date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-15", "2024-01-16", "2024-01-17", "2024-02-01"]);
        assert_eq!(invoices[0].total_price, 20 * 6_000 + 15 * 7_500);
        assert_eq!(invoices[2].log_entry_ids, vec![LogEntryId::new(4)]);
    }
}
