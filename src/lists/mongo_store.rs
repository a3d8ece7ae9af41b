//! MongoDB-backed `TodoStore`

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime};
use tracing::{debug, warn};

use crate::db::schemas::{
    claim_filter, item_filter, list_filter, DEFAULT_LIST_CLAIM, ITEM_COLLECTION, LIST_COLLECTION,
    SEED_CLAIM_COLLECTION,
};
use crate::db::{Item, ItemDoc, ListDoc, Metadata, MongoClient, MongoCollection, SeedClaim};
use crate::lists::store::{PullResult, TodoStore};
use crate::types::{Result, TodoError};

/// Store over the `items` and `lists` collections
pub struct MongoTodoStore {
    items: MongoCollection<ItemDoc>,
    lists: MongoCollection<ListDoc>,
    claims: MongoCollection<SeedClaim>,
}

impl MongoTodoStore {
    /// Open the collections and apply their indexes
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        let items = mongo.collection::<ItemDoc>(ITEM_COLLECTION).await?;
        let lists = mongo.collection::<ListDoc>(LIST_COLLECTION).await?;
        let claims = mongo.collection::<SeedClaim>(SEED_CLAIM_COLLECTION).await?;
        Ok(Self {
            items,
            lists,
            claims,
        })
    }

    /// Insert `items` if the default list is empty. Caller holds the claim.
    async fn seed_if_empty(&self, items: Vec<Item>) -> Result<usize> {
        if self.items.count(doc! {}).await? > 0 {
            return Ok(0);
        }
        let docs = items.into_iter().map(ItemDoc::from).collect();
        self.items.insert_many(docs).await
    }
}

fn to_bson_items(items: &[Item]) -> Result<bson::Bson> {
    bson::to_bson(items).map_err(|e| TodoError::Internal(format!("Failed to encode items: {}", e)))
}

#[async_trait]
impl TodoStore for MongoTodoStore {
    fn backend(&self) -> &'static str {
        "mongo"
    }

    async fn default_items(&self) -> Result<Vec<Item>> {
        let docs = self.items.find_many(doc! {}).await?;
        Ok(docs.into_iter().map(Item::from).collect())
    }

    async fn insert_default_item(&self, item: Item) -> Result<()> {
        self.items.insert_one(ItemDoc::from(item)).await
    }

    async fn seed_default_items(&self, items: Vec<Item>) -> Result<usize> {
        if self.items.count(doc! {}).await? > 0 {
            return Ok(0);
        }

        if !self
            .claims
            .insert_unique(SeedClaim::new(DEFAULT_LIST_CLAIM))
            .await?
        {
            debug!("Default list is being seeded elsewhere");
            return Ok(0);
        }

        // Emptiness is re-checked under the claim; a seeder that finished
        // between our first count and the claim has already filled the list.
        let seeded = self.seed_if_empty(items).await;

        if let Err(e) = self.claims.delete_one(claim_filter(DEFAULT_LIST_CLAIM)).await {
            warn!("Failed to release seed claim, it will expire: {}", e);
        }

        seeded
    }

    async fn delete_default_item(&self, id: ObjectId) -> Result<bool> {
        let result = self.items.delete_one(item_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_list(&self, name: &str) -> Result<Option<ListDoc>> {
        self.lists.find_one(list_filter(name)).await
    }

    async fn find_or_create_list(&self, name: &str, seed: Vec<Item>) -> Result<(ListDoc, bool)> {
        let on_insert = doc! {
            "items": to_bson_items(&seed)?,
            "metadata": Metadata::new().to_document(),
        };

        match self.lists.find_or_insert(list_filter(name), on_insert).await? {
            Some(existing) => Ok((existing, false)),
            None => {
                debug!(list = %name, "Inserted list via upsert");
                Ok((ListDoc::new(name.to_string(), seed), true))
            }
        }
    }

    async fn push_list_item(&self, name: &str, item: Item) -> Result<bool> {
        let encoded = bson::to_bson(&item)
            .map_err(|e| TodoError::Internal(format!("Failed to encode item: {}", e)))?;

        let result = self
            .lists
            .update_one(
                list_filter(name),
                doc! {
                    "$push": { "items": encoded },
                    "$set": { "metadata.updated_at": DateTime::now() },
                },
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn pull_list_item(&self, name: &str, id: ObjectId) -> Result<PullResult> {
        let result = self
            .lists
            .update_one(list_filter(name), doc! { "$pull": { "items": { "_id": id } } })
            .await?;

        if result.matched_count == 0 {
            return Ok(PullResult::ListMissing);
        }
        Ok(PullResult::Pulled(result.modified_count))
    }
}
