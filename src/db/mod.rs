//! Database layer
//!
//! Provides MongoDB storage for default-list items and custom lists.

pub mod mongo;
pub mod schemas;

pub use mongo::{MongoClient, MongoCollection};
pub use schemas::{Item, ItemDoc, ListDoc, Metadata, SeedClaim};
