//! MongoDB client and collection wrapper

use bson::{doc, oid::ObjectId, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument, UpdateModifications},
    results::{DeleteResult, UpdateResult},
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::db::schemas::Metadata;
use crate::types::TodoError;

/// MongoDB duplicate key error code
const DUPLICATE_KEY: i32 = 11000;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Trait for schemas with mutable metadata
pub trait MutMetadata {
    fn mut_metadata(&mut self) -> &mut Metadata;
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a new MongoDB client
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, TodoError> {
        info!("Connecting to MongoDB at {}", uri);

        // Use serverSelectionTimeoutMS to avoid hanging on unreachable MongoDB
        let timeout_uri = format!(
            "{}{}serverSelectionTimeoutMS=3000&connectTimeoutMS=3000",
            uri,
            query_separator(uri)
        );

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| TodoError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| TodoError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, TodoError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes + MutMetadata,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes + MutMetadata,
{
    /// Create a new collection and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, TodoError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    /// Apply schema-defined indexes
    async fn apply_indexes(&self) -> Result<(), TodoError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| TodoError::Database(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Insert a document, setting metadata timestamps
    pub async fn insert_one(&self, mut item: T) -> Result<(), TodoError> {
        stamp(item.mut_metadata());

        self.inner
            .insert_one(item)
            .await
            .map_err(|e| TodoError::Database(format!("Insert failed: {}", e)))?;

        Ok(())
    }

    /// Insert a document unless one with the same unique key exists.
    ///
    /// Returns `false` when a unique index rejected the insert.
    pub async fn insert_unique(&self, mut item: T) -> Result<bool, TodoError> {
        stamp(item.mut_metadata());

        match self.inner.insert_one(item).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(TodoError::Database(format!("Insert failed: {}", e))),
        }
    }

    /// Insert several documents in order, setting metadata timestamps
    pub async fn insert_many(&self, mut items: Vec<T>) -> Result<usize, TodoError> {
        if items.is_empty() {
            return Ok(0);
        }

        for item in items.iter_mut() {
            stamp(item.mut_metadata());
        }

        let result = self
            .inner
            .insert_many(items)
            .await
            .map_err(|e| TodoError::Database(format!("Insert many failed: {}", e)))?;

        Ok(result.inserted_ids.len())
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, TodoError> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| TodoError::Database(format!("Find failed: {}", e)))
    }

    /// Count documents matching a filter
    pub async fn count(&self, filter: Document) -> Result<u64, TodoError> {
        self.inner
            .count_documents(filter)
            .await
            .map_err(|e| TodoError::Database(format!("Count failed: {}", e)))
    }

    /// Find many documents by filter, ordered by `_id` (creation order)
    pub async fn find_many(&self, filter: Document) -> Result<Vec<T>, TodoError> {
        let cursor = self
            .inner
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| TodoError::Database(format!("Find failed: {}", e)))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| TodoError::Database(format!("Error reading documents: {}", e)))
    }

    /// Update one document
    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult, TodoError> {
        self.inner
            .update_one(filter, update.into())
            .await
            .map_err(|e| TodoError::Database(format!("Update failed: {}", e)))
    }

    /// Delete one document
    pub async fn delete_one(&self, filter: Document) -> Result<DeleteResult, TodoError> {
        self.inner
            .delete_one(filter)
            .await
            .map_err(|e| TodoError::Database(format!("Delete failed: {}", e)))
    }

    /// Atomically insert `on_insert` unless a document matches `filter`.
    ///
    /// Returns the document that existed before the call, or `None` when this
    /// call inserted it. A unique index on the filtered fields turns a racing
    /// upsert into a duplicate key error; that case re-reads the winner.
    pub async fn find_or_insert(
        &self,
        filter: Document,
        on_insert: Document,
    ) -> Result<Option<T>, TodoError> {
        let result = self
            .inner
            .find_one_and_update(filter.clone(), doc! { "$setOnInsert": on_insert })
            .upsert(true)
            .return_document(ReturnDocument::Before)
            .await;

        match result {
            Ok(existing) => Ok(existing),
            Err(e) if is_duplicate_key(&e) => match self.find_one(filter).await? {
                Some(winner) => Ok(Some(winner)),
                None => Err(TodoError::Database(format!(
                    "Upsert lost a race but no document matched: {}",
                    e
                ))),
            },
            Err(e) => Err(TodoError::Database(format!("Upsert failed: {}", e))),
        }
    }
}

/// Separator needed to append options to a connection string
fn query_separator(uri: &str) -> &'static str {
    if uri.contains('?') {
        return "&";
    }
    let rest = uri.split_once("://").map(|(_, r)| r).unwrap_or(uri);
    if rest.contains('/') {
        "?"
    } else {
        "/?"
    }
}

fn stamp(metadata: &mut Metadata) {
    let now = DateTime::now();
    metadata.created_at = Some(now);
    metadata.updated_at = Some(now);
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Command(c) => c.code == DUPLICATE_KEY,
        ErrorKind::Write(WriteFailure::WriteError(w)) => w.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Parse a hex object id
pub fn parse_object_id(raw: &str) -> Result<ObjectId, TodoError> {
    Ok(ObjectId::parse_str(raw.trim())?)
}

#[cfg(test)]
mod tests {
    // Collection tests would require a running MongoDB instance.
    // Store semantics are covered against the in-memory store.
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&format!(" {} ", id.to_hex())).unwrap(), id);
        assert!(parse_object_id("not-an-id").is_err());
    }

    fn command_error(code: i32) -> mongodb::error::Error {
        let err: mongodb::error::CommandError = bson::from_document(doc! {
            "code": code,
            "codeName": "DuplicateKey",
            "errmsg": "E11000 duplicate key error",
        })
        .unwrap();
        ErrorKind::Command(err).into()
    }

    fn write_error(code: i32) -> mongodb::error::Error {
        let err: mongodb::error::WriteError = bson::from_document(doc! {
            "code": code,
            "codeName": "DuplicateKey",
            "errmsg": "E11000 duplicate key error",
        })
        .unwrap();
        ErrorKind::Write(WriteFailure::WriteError(err)).into()
    }

    #[test]
    fn test_duplicate_key_detection() {
        assert!(is_duplicate_key(&command_error(DUPLICATE_KEY)));
        assert!(is_duplicate_key(&write_error(DUPLICATE_KEY)));

        assert!(!is_duplicate_key(&command_error(112)));
        assert!(!is_duplicate_key(&write_error(121)));
    }

    #[test]
    fn test_query_separator() {
        assert_eq!(query_separator("mongodb://127.0.0.1:27017"), "/?");
        assert_eq!(query_separator("mongodb://127.0.0.1:27017/"), "?");
        assert_eq!(query_separator("mongodb://h/db?tls=true"), "&");
    }
}
