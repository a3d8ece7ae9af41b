//! Storage boundary for lists and items
//!
//! `TodoStore` is the set of primitive operations the resolver and mutation
//! logic need. The default list lives as a flat item collection; custom lists
//! are documents with embedded items. Two backends implement it:
//!
//! - [`MongoTodoStore`](super::MongoTodoStore) for production
//! - [`MemoryTodoStore`] for dev mode and tests

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::db::{Item, ListDoc};
use crate::types::Result;

/// Result of removing an item from a custom list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullResult {
    /// No list with that name
    ListMissing,
    /// List found; number of embedded items removed
    Pulled(u64),
}

/// Trait for list/item persistence - allows swapping implementations
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// All items of the default list, in creation order
    async fn default_items(&self) -> Result<Vec<Item>>;

    /// Add one item to the default list
    async fn insert_default_item(&self, item: Item) -> Result<()>;

    /// Atomically insert `items` into the default list if it is empty.
    ///
    /// Returns how many items this call inserted; `0` when the list already
    /// had items or another caller is seeding it.
    async fn seed_default_items(&self, items: Vec<Item>) -> Result<usize>;

    /// Remove a default-list item by id. Returns whether anything was removed.
    async fn delete_default_item(&self, id: ObjectId) -> Result<bool>;

    /// Exact-match lookup of a custom list
    async fn find_list(&self, name: &str) -> Result<Option<ListDoc>>;

    /// Atomically return the list named `name`, creating it with `seed` if absent.
    ///
    /// The boolean is `true` when this call created the list.
    async fn find_or_create_list(&self, name: &str, seed: Vec<Item>) -> Result<(ListDoc, bool)>;

    /// Append an item to a custom list. Returns `false` if the list does not exist.
    async fn push_list_item(&self, name: &str, item: Item) -> Result<bool>;

    /// Remove every embedded item with the given id from a custom list
    async fn pull_list_item(&self, name: &str, id: ObjectId) -> Result<PullResult>;
}

#[derive(Default)]
struct MemoryState {
    items: Vec<Item>,
    lists: Vec<ListDoc>,
}

/// Process-local store. Every operation runs under one lock, so
/// find-or-create and seeding are atomic.
#[derive(Default)]
pub struct MemoryTodoStore {
    state: RwLock<MemoryState>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of custom lists stored under `name`
    pub async fn list_count(&self, name: &str) -> usize {
        self.state
            .read()
            .await
            .lists
            .iter()
            .filter(|l| l.name == name)
            .count()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn default_items(&self) -> Result<Vec<Item>> {
        Ok(self.state.read().await.items.clone())
    }

    async fn insert_default_item(&self, item: Item) -> Result<()> {
        self.state.write().await.items.push(item);
        Ok(())
    }

    async fn seed_default_items(&self, items: Vec<Item>) -> Result<usize> {
        let mut state = self.state.write().await;
        if !state.items.is_empty() {
            return Ok(0);
        }
        let count = items.len();
        state.items.extend(items);
        Ok(count)
    }

    async fn delete_default_item(&self, id: ObjectId) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|i| i.id != id);
        Ok(state.items.len() != before)
    }

    async fn find_list(&self, name: &str) -> Result<Option<ListDoc>> {
        let state = self.state.read().await;
        Ok(state.lists.iter().find(|l| l.name == name).cloned())
    }

    async fn find_or_create_list(&self, name: &str, seed: Vec<Item>) -> Result<(ListDoc, bool)> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.lists.iter().find(|l| l.name == name) {
            return Ok((existing.clone(), false));
        }

        let mut list = ListDoc::new(name.to_string(), seed);
        list.mongo_id = Some(ObjectId::new());
        state.lists.push(list.clone());
        Ok((list, true))
    }

    async fn push_list_item(&self, name: &str, item: Item) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.lists.iter_mut().find(|l| l.name == name) {
            Some(list) => {
                list.items.push(item);
                list.metadata.touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn pull_list_item(&self, name: &str, id: ObjectId) -> Result<PullResult> {
        let mut state = self.state.write().await;
        let Some(list) = state.lists.iter_mut().find(|l| l.name == name) else {
            return Ok(PullResult::ListMissing);
        };

        let before = list.items.len();
        list.items.retain(|i| i.id != id);
        let removed = (before - list.items.len()) as u64;
        if removed > 0 {
            list.metadata.touch();
        }
        Ok(PullResult::Pulled(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::default_items;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_default_items_keep_insertion_order() {
        let store = MemoryTodoStore::new();
        assert_eq!(store.seed_default_items(default_items()).await.unwrap(), 3);
        store.insert_default_item(Item::new("milk")).await.unwrap();

        let names: Vec<String> = store
            .default_items()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names.len(), 4);
        assert_eq!(names[3], "milk");
    }

    #[tokio::test]
    async fn test_delete_default_item_is_idempotent() {
        let store = MemoryTodoStore::new();
        let item = Item::new("milk");
        let id = item.id;
        store.insert_default_item(item).await.unwrap();

        assert!(store.delete_default_item(id).await.unwrap());
        assert!(!store.delete_default_item(id).await.unwrap());
        assert!(store.default_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_or_create_only_creates_once() {
        let store = MemoryTodoStore::new();

        let (first, created) = store
            .find_or_create_list("Groceries", default_items())
            .await
            .unwrap();
        assert!(created);

        let (second, created) = store
            .find_or_create_list("Groceries", default_items())
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(first.mongo_id, second.mongo_id);
        assert_eq!(first.items, second.items);
        assert_eq!(store.list_count("Groceries").await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_find_or_create_yields_one_list() {
        let store = Arc::new(MemoryTodoStore::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .find_or_create_list("Groceries", default_items())
                    .await
                    .unwrap()
                    .1
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.list_count("Groceries").await, 1);
    }

    #[tokio::test]
    async fn test_seed_only_fills_empty_default_list() {
        let store = MemoryTodoStore::new();
        store.insert_default_item(Item::new("milk")).await.unwrap();

        assert_eq!(store.seed_default_items(default_items()).await.unwrap(), 0);
        assert_eq!(store.default_items().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_seeding_inserts_once() {
        let store = Arc::new(MemoryTodoStore::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.seed_default_items(default_items()).await.unwrap()
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            inserted += handle.await.unwrap();
        }

        assert_eq!(inserted, 3);
        assert_eq!(store.default_items().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_push_and_pull_on_missing_list() {
        let store = MemoryTodoStore::new();
        assert!(!store.push_list_item("Nope", Item::new("x")).await.unwrap());
        assert_eq!(
            store.pull_list_item("Nope", ObjectId::new()).await.unwrap(),
            PullResult::ListMissing
        );
    }

    #[tokio::test]
    async fn test_pull_removes_matching_item() {
        let store = MemoryTodoStore::new();
        let (list, _) = store
            .find_or_create_list("Work", default_items())
            .await
            .unwrap();
        let target = list.items[1].id;

        assert_eq!(
            store.pull_list_item("Work", target).await.unwrap(),
            PullResult::Pulled(1)
        );
        assert_eq!(
            store.pull_list_item("Work", target).await.unwrap(),
            PullResult::Pulled(0)
        );

        let list = store.find_list("Work").await.unwrap().unwrap();
        assert_eq!(list.items.len(), 2);
        assert!(list.items.iter().all(|i| i.id != target));
    }
}
