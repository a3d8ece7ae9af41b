//! Seed claim schema
//!
//! A short-lived lock document. Whoever inserts the claim for a target may
//! seed it; everyone else sees a duplicate key and backs off. Claims expire
//! through a TTL index so a crashed seeder cannot block seeding forever.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for seed claims
pub const SEED_CLAIM_COLLECTION: &str = "seed_claims";

/// Claim id guarding the default list
pub const DEFAULT_LIST_CLAIM: &str = "default_list";

/// Seconds after which an abandoned claim is removed
const CLAIM_TTL_SECS: u64 = 60;

/// Seed claim document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SeedClaim {
    /// Claimed target; `_id` keeps it unique
    #[serde(rename = "_id")]
    pub target: String,

    #[serde(default)]
    pub metadata: Metadata,
}

impl SeedClaim {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            metadata: Metadata::new(),
        }
    }
}

impl IntoIndexes for SeedClaim {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "metadata.created_at": 1 },
            Some(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(CLAIM_TTL_SECS))
                    .name("created_at_ttl".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for SeedClaim {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Filter matching one claim
pub fn claim_filter(target: &str) -> Document {
    doc! { "_id": target }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_expires() {
        let indices = SeedClaim::into_indices();
        let (keys, opts) = &indices[0];
        assert_eq!(keys, &doc! { "metadata.created_at": 1 });
        assert_eq!(
            opts.as_ref().and_then(|o| o.expire_after),
            Some(Duration::from_secs(CLAIM_TTL_SECS))
        );
    }

    #[test]
    fn test_claim_target_is_the_id() {
        let doc = bson::to_document(&SeedClaim::new(DEFAULT_LIST_CLAIM)).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), DEFAULT_LIST_CLAIM);
    }
}
