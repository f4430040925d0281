use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use laundrydesk_core::ItemId;

/// Name shown for an item id outside the built-in catalog.
pub const UNKNOWN_ITEM_NAME: &str = "Unknown Item";

/// The fixed catalog of linen item types handled by the laundry.
pub const LINEN_CATALOG: [(u64, &str); 18] = [
    (1, "Bath Towel Baru"),
    (2, "Bath Towel Lama"),
    (3, "Bath Mat"),
    (4, "Bed Sheet Single"),
    (5, "Bed Sheet Double"),
    (6, "Duvet Cover Single"),
    (7, "Duvet Cover Double"),
    (8, "Pillow Case Baru"),
    (9, "Pillow Case Lama"),
    (10, "Pillow Case (MIX)"),
    (11, "Inner Duvet Single"),
    (12, "Inner Duvet Double"),
    (13, "Skarting Duvet Single"),
    (14, "Skarting Duvet Double"),
    (15, "Napkin"),
    (16, "Cover Chair"),
    (17, "Table Cloth"),
    (18, "Bath Robe"),
];

/// Catalog name of a linen item type.
pub fn linen_item_name(item_id: ItemId) -> &'static str {
    LINEN_CATALOG
        .iter()
        .find(|(id, _)| *id == item_id.get())
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_ITEM_NAME)
}

/// Priced item as kept in the item table.
///
/// `category` holds the category *name*; categories are referenced by name,
/// not by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    /// Price in smallest currency unit.
    pub price: u64,
}

/// Price source for invoice aggregation.
pub trait ItemPriceLookup {
    /// Unit price of an item, `None` when the item is unknown.
    fn price_of(&self, item_id: ItemId) -> Option<u64>;
}

impl ItemPriceLookup for [Item] {
    fn price_of(&self, item_id: ItemId) -> Option<u64> {
        self.iter().find(|i| i.id == item_id).map(|i| i.price)
    }
}

impl ItemPriceLookup for Vec<Item> {
    fn price_of(&self, item_id: ItemId) -> Option<u64> {
        self.as_slice().price_of(item_id)
    }
}

impl ItemPriceLookup for HashMap<ItemId, u64> {
    fn price_of(&self, item_id: ItemId) -> Option<u64> {
        self.get(&item_id).copied()
    }
}

/// Number of items whose category is `category_name` (exact match).
pub fn count_items_referencing(items: &[Item], category_name: &str) -> usize {
    items.iter().filter(|i| i.category == category_name).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, category: &str, price: u64) -> Item {
        Item {
            id: ItemId::new(id),
            name: linen_item_name(ItemId::new(id)).to_string(),
            category: category.to_string(),
            price,
        }
    }

    #[test]
    fn catalog_names_resolve() {
        assert_eq!(linen_item_name(ItemId::new(1)), "Bath Towel Baru");
        assert_eq!(linen_item_name(ItemId::new(18)), "Bath Robe");
        assert_eq!(linen_item_name(ItemId::new(19)), UNKNOWN_ITEM_NAME);
        assert_eq!(linen_item_name(ItemId::new(0)), UNKNOWN_ITEM_NAME);
    }

    #[test]
    fn price_lookup_over_item_slice() {
        let items = vec![item(1, "Towel", 5000), item(4, "Linen", 7000)];
        assert_eq!(items.price_of(ItemId::new(4)), Some(7000));
        assert_eq!(items.price_of(ItemId::new(9)), None);
    }

    #[test]
    fn counts_references_by_exact_category_name() {
        let items = vec![
            item(1, "Towel", 5000),
            item(2, "Towel", 4000),
            item(3, "towel", 3000),
        ];
        assert_eq!(count_items_referencing(&items, "Towel"), 2);
        assert_eq!(count_items_referencing(&items, "Linen"), 0);
    }
}
