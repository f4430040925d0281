//! Log book → invoices.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use laundrydesk_catalog::ItemPriceLookup;
use laundrydesk_core::LogEntryId;
use laundrydesk_logbook::LogEntry;

use crate::invoice::{InvoiceEntry, invoice_number};

#[derive(Default)]
struct DateGroup {
    total: u64,
    log_entry_ids: Vec<LogEntryId>,
}

/// Build one invoice per distinct pick-up date.
///
/// - only entries with `out_quantity > 0` take part;
/// - each contributes `price(item) * out_quantity`, unknown items price at 0;
/// - invoices come out in ascending date order, numbered 1..N in that order;
/// - `return_date` starts empty.
///
/// The result depends only on the inputs, so recomputing is idempotent.
pub fn aggregate<P>(entries: &[LogEntry], prices: &P) -> Vec<InvoiceEntry>
where
    P: ItemPriceLookup + ?Sized,
{
    let mut groups: BTreeMap<NaiveDate, DateGroup> = BTreeMap::new();

    for entry in entries {
        if entry.out_quantity() == 0 {
            continue;
        }
        let Some(date) = entry.date() else {
            continue;
        };

        let price = prices.price_of(entry.item_id()).unwrap_or(0);
        let group = groups.entry(date).or_default();
        group.total = group
            .total
            .saturating_add(price.saturating_mul(u64::from(entry.out_quantity())));
        group.log_entry_ids.push(entry.id_typed());
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(idx, (date, group))| {
            let pickup_date = date.format("%Y-%m-%d").to_string();
            InvoiceEntry {
                invoice_no: invoice_number(&pickup_date, idx + 1),
                pickup_date,
                return_date: None,
                total_price: group.total,
                log_entry_ids: group.log_entry_ids,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use laundrydesk_catalog::Item;
    use laundrydesk_core::{Aggregate, ItemId};
    use laundrydesk_logbook::{AddLogEntry, LogEntryCommand, Quantities};

    fn entry(id: u64, date: &str, item: u64, out: u32) -> LogEntry {
        let mut e = LogEntry::empty(LogEntryId::new(id));
        let events = e
            .handle(&LogEntryCommand::AddLogEntry(AddLogEntry {
                entry_id: LogEntryId::new(id),
                date: date.to_string(),
                item_id: ItemId::new(item),
                quantities: Quantities {
                    out_quantity: out,
                    in_quantity: out,
                    pending_quantity: 0,
                },
                occurred_at: Utc::now(),
            }))
            .unwrap();
        e.apply(&events[0]);
        e
    }

    fn prices() -> Vec<Item> {
        vec![
            Item {
                id: ItemId::new(1),
                name: "Bath Towel Baru".to_string(),
                category: "Towel".to_string(),
                price: 5000,
            },
            Item {
                id: ItemId::new(4),
                name: "Bed Sheet Single".to_string(),
                category: "Linen".to_string(),
                price: 7500,
            },
        ]
    }

    #[test]
    fn numbers_invoices_in_date_order() {
        let entries = vec![entry(1, "2024-01-02", 1, 2), entry(2, "2024-01-01", 1, 1)];
        let invoices = aggregate(&entries, &prices());

        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].invoice_no, "INV-20240101-001");
        assert_eq!(invoices[0].pickup_date, "2024-01-01");
        assert_eq!(invoices[1].invoice_no, "INV-20240102-002");
        assert_eq!(invoices[1].pickup_date, "2024-01-02");
        assert!(invoices.iter().all(|i| i.return_date.is_none()));
    }

    #[test]
    fn sums_price_times_out_quantity_per_date() {
        let entries = vec![
            entry(1, "2024-03-10", 1, 2),
            entry(2, "2024-03-10", 4, 3),
            entry(3, "2024-03-11", 4, 1),
        ];
        let invoices = aggregate(&entries, &prices());

        assert_eq!(invoices[0].total_price, 2 * 5000 + 3 * 7500);
        assert_eq!(invoices[0].log_entry_ids, vec![LogEntryId::new(1), LogEntryId::new(2)]);
        assert_eq!(invoices[1].total_price, 7500);
    }

    #[test]
    fn zero_out_entries_are_left_out() {
        let entries = vec![entry(1, "2024-03-10", 1, 0), entry(2, "2024-03-11", 1, 1)];
        let invoices = aggregate(&entries, &prices());

        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].pickup_date, "2024-03-11");
        assert_eq!(invoices[0].invoice_no, "INV-20240311-001");
        assert!(!invoices[0].log_entry_ids.contains(&LogEntryId::new(1)));
    }

    #[test]
    fn unknown_items_price_at_zero() {
        let entries = vec![entry(1, "2024-03-10", 17, 5), entry(2, "2024-03-10", 1, 1)];
        let invoices = aggregate(&entries, &prices());

        assert_eq!(invoices[0].total_price, 5000);
        assert_eq!(invoices[0].log_entry_ids.len(), 2);
    }

    #[test]
    fn empty_log_yields_no_invoices() {
        assert!(aggregate(&[], &prices()).is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 300,
                ..ProptestConfig::default()
            })]

            /// Property: aggregation is deterministic, dates are strictly
            /// ascending and numbering is gapless.
            #[test]
            fn aggregation_is_idempotent_and_gapless(
                rows in proptest::collection::vec((1u32..28, 1u64..19, 0u32..10), 0..40)
            ) {
                let entries: Vec<LogEntry> = rows
                    .iter()
                    .enumerate()
                    .map(|(i, (day, item, out))| {
                        entry(i as u64 + 1, &format!("2024-02-{day:02}"), *item, *out)
                    })
                    .collect();

                let first = aggregate(&entries, &prices());
                let second = aggregate(&entries, &prices());
                prop_assert_eq!(&first, &second);

                for (idx, inv) in first.iter().enumerate() {
                    let expected_suffix = format!("-{:03}", idx + 1);
                    prop_assert!(inv.invoice_no.ends_with(&expected_suffix));
                    prop_assert!(!inv.log_entry_ids.is_empty());
                }
                for pair in first.windows(2) {
                    prop_assert!(pair[0].pickup_date < pair[1].pickup_date);
                }

                let zero_out: Vec<LogEntryId> = entries
                    .iter()
                    .filter(|e| e.out_quantity() == 0)
                    .map(|e| e.id_typed())
                    .collect();
                for inv in &first {
                    for id in &inv.log_entry_ids {
                        prop_assert!(!zero_out.contains(id));
                    }
                }
            }
        }
    }
}
