//! Database schemas
//!
//! Defines MongoDB document structures for default-list items, custom lists
//! and seed claims.

mod item;
mod list;
mod metadata;
mod seed_claim;

pub use item::{item_filter, Item, ItemDoc, ITEM_COLLECTION};
pub use list::{list_filter, ListDoc, LIST_COLLECTION};
pub use metadata::Metadata;
pub use seed_claim::{claim_filter, SeedClaim, DEFAULT_LIST_CLAIM, SEED_CLAIM_COLLECTION};
