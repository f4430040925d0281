//! Catalog domain module: linen item types, the item price table and the
//! item categories.
//!
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod category;
pub mod item;

pub use category::{
    Category, CategoryCommand, CategoryCreated, CategoryDeleted, CategoryEvent, CategoryStatus,
    CategoryUpdated, CreateCategory, DeleteCategory, UpdateCategory, ensure_unique_code,
    search_categories,
};
pub use item::{
    Item, ItemPriceLookup, LINEN_CATALOG, UNKNOWN_ITEM_NAME, count_items_referencing,
    linen_item_name,
};
