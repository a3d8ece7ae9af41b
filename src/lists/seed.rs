//! Starter content for new lists

use crate::db::Item;

/// Guidance text for the starter items, in display order
pub const DEFAULT_ITEM_NAMES: [&str; 3] = [
    "Welcome to your to-do list!",
    "Hit + button to add new items",
    "<-- Hit this to delete an item",
];

/// Build a fresh set of starter items.
///
/// Every call allocates new identities so seeded lists never share items.
pub fn default_items() -> Vec<Item> {
    DEFAULT_ITEM_NAMES.iter().map(|name| Item::new(*name)).collect()
}
