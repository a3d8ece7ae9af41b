//! Item document schema
//!
//! A single to-do entry. The same `Item` shape is stored top-level in the
//! default list's collection and embedded inside custom list documents.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for the default list's items
pub const ITEM_COLLECTION: &str = "items";

/// A to-do entry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// Identity, generated when the item is created
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Free-text label
    pub name: String,
}

impl Item {
    /// Create an item with a fresh identity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
        }
    }
}

/// Top-level item document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ItemDoc {
    /// MongoDB document ID, same as the item identity
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Free-text label
    pub name: String,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,
}

impl From<Item> for ItemDoc {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            metadata: Metadata::new(),
        }
    }
}

impl From<ItemDoc> for Item {
    fn from(doc: ItemDoc) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
        }
    }
}

impl IntoIndexes for ItemDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        // _id is indexed by MongoDB itself
        Vec::new()
    }
}

impl MutMetadata for ItemDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Filter matching one item by identity
pub fn item_filter(id: ObjectId) -> Document {
    doc! { "_id": id }
}
