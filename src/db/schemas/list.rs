//! List document schema
//!
//! A named custom list owning its items. Lookup is by normalized name,
//! which carries a unique index so concurrent lazy creation cannot
//! produce duplicates.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::{Item, Metadata};

/// Collection name for custom lists
pub const LIST_COLLECTION: &str = "lists";

/// Custom list document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ListDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Normalized list name
    pub name: String,

    /// Embedded items, in insertion order
    #[serde(default)]
    pub items: Vec<Item>,
}

impl ListDoc {
    /// Create a new list document
    pub fn new(name: String, items: Vec<Item>) -> Self {
        Self {
            mongo_id: None,
            metadata: Metadata::new(),
            name,
            items,
        }
    }
}

impl IntoIndexes for ListDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "name": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("name_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ListDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Filter matching one list by normalized name
pub fn list_filter(name: &str) -> Document {
    doc! { "name": name }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_index_is_unique() {
        let indices = ListDoc::into_indices();
        assert_eq!(indices.len(), 1);
        let (keys, opts) = &indices[0];
        assert_eq!(keys, &doc! { "name": 1 });
        assert_eq!(opts.as_ref().and_then(|o| o.unique), Some(true));
    }

    #[test]
    fn test_new_list_skips_missing_id() {
        let list = ListDoc::new("Groceries".into(), vec![Item::new("eggs")]);
        let doc = bson::to_document(&list).unwrap();
        assert!(doc.get("_id").is_none());
        assert_eq!(doc.get_array("items").unwrap().len(), 1);
    }
}
