//! Common metadata for all documents
//!
//! Tracks creation and update timestamps.

use bson::{doc, DateTime, Document};
use serde::{Deserialize, Serialize};

/// Common metadata for all documents
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    /// When the document was last updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,

    /// When the document was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

impl Metadata {
    /// Create new metadata with current timestamp
    pub fn new() -> Self {
        let now = DateTime::now();
        Self {
            updated_at: Some(now),
            created_at: Some(now),
        }
    }

    /// Mark the document as updated now
    pub fn touch(&mut self) {
        self.updated_at = Some(DateTime::now());
    }

    /// BSON form used by upserts that build the document server-side
    pub fn to_document(&self) -> Document {
        let mut d = doc! {};
        if let Some(created) = self.created_at {
            d.insert("created_at", created);
        }
        if let Some(updated) = self.updated_at {
            d.insert("updated_at", updated);
        }
        d
    }
}
