//! Uniform view over the two list shapes
//!
//! The default list is a flat item collection and custom lists embed their
//! items; both are driven through [`NamedList`] so callers never branch on
//! the list name.

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::debug;

use crate::db::Item;
use crate::lists::name::list_path;
use crate::lists::store::{PullResult, TodoStore};
use crate::types::Result;

/// Outcome of a mutation against a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The change was applied (or was already in effect)
    Applied,
    /// The target list does not exist
    NotFound,
}

/// A list that items can be read from, added to and removed from
#[async_trait]
pub trait NamedList: Send + Sync {
    /// Display title
    fn title(&self) -> &str;

    /// Canonical URL path
    fn path(&self) -> String;

    /// Current items, or `None` if the list does not exist
    async fn items(&self) -> Result<Option<Vec<Item>>>;

    /// Append an item
    async fn add(&self, item: Item) -> Result<MutationOutcome>;

    /// Remove the item with the given id. Removing an absent item succeeds.
    async fn remove(&self, id: ObjectId) -> Result<MutationOutcome>;
}

/// The built-in list, stored as the top-level item collection
pub struct DefaultList<'a> {
    store: &'a dyn TodoStore,
    title: &'a str,
}

impl<'a> DefaultList<'a> {
    pub fn new(store: &'a dyn TodoStore, title: &'a str) -> Self {
        Self { store, title }
    }
}

#[async_trait]
impl<'a> NamedList for DefaultList<'a> {
    fn title(&self) -> &str {
        self.title
    }

    fn path(&self) -> String {
        "/".to_string()
    }

    async fn items(&self) -> Result<Option<Vec<Item>>> {
        Ok(Some(self.store.default_items().await?))
    }

    async fn add(&self, item: Item) -> Result<MutationOutcome> {
        self.store.insert_default_item(item).await?;
        Ok(MutationOutcome::Applied)
    }

    async fn remove(&self, id: ObjectId) -> Result<MutationOutcome> {
        if !self.store.delete_default_item(id).await? {
            debug!(item = %id, "Default list item already absent");
        }
        Ok(MutationOutcome::Applied)
    }
}

/// A user-created list stored as a document with embedded items
pub struct CustomList<'a> {
    store: &'a dyn TodoStore,
    name: String,
}

impl<'a> CustomList<'a> {
    /// `name` must already be normalized
    pub fn new(store: &'a dyn TodoStore, name: String) -> Self {
        Self { store, name }
    }
}

#[async_trait]
impl<'a> NamedList for CustomList<'a> {
    fn title(&self) -> &str {
        &self.name
    }

    fn path(&self) -> String {
        list_path(&self.name)
    }

    async fn items(&self) -> Result<Option<Vec<Item>>> {
        Ok(self.store.find_list(&self.name).await?.map(|l| l.items))
    }

    async fn add(&self, item: Item) -> Result<MutationOutcome> {
        if self.store.push_list_item(&self.name, item).await? {
            Ok(MutationOutcome::Applied)
        } else {
            Ok(MutationOutcome::NotFound)
        }
    }

    async fn remove(&self, id: ObjectId) -> Result<MutationOutcome> {
        match self.store.pull_list_item(&self.name, id).await? {
            PullResult::ListMissing => Ok(MutationOutcome::NotFound),
            PullResult::Pulled(0) => {
                debug!(list = %self.name, item = %id, "List item already absent");
                Ok(MutationOutcome::Applied)
            }
            PullResult::Pulled(_) => Ok(MutationOutcome::Applied),
        }
    }
}
