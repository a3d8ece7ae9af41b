//! Item add/delete against a resolved list

use bson::oid::ObjectId;
use tracing::{debug, info};

use crate::db::Item;
use crate::lists::named::{MutationOutcome, NamedList};
use crate::lists::resolver::ListResolver;
use crate::types::{Result, TodoError};

/// Applies item mutations. Custom lists are never created here: a name
/// from a stale form must not bring a list into existence.
#[derive(Clone)]
pub struct MutationService {
    resolver: ListResolver,
}

impl MutationService {
    pub fn new(resolver: ListResolver) -> Self {
        Self { resolver }
    }

    /// Bind a posted list name to the list it targets
    pub fn list(&self, list_name: &str) -> Box<dyn NamedList + '_> {
        self.resolver.list(self.resolver.target(Some(list_name)))
    }

    /// Add an item named `name` to `list`
    pub async fn add_item(&self, list: &dyn NamedList, name: &str) -> Result<MutationOutcome> {
        if name.trim().is_empty() {
            return Err(TodoError::Validation("item name must not be empty".to_string()));
        }

        let outcome = list.add(Item::new(name)).await?;

        match outcome {
            MutationOutcome::Applied => info!(list = %list.title(), "Added item"),
            MutationOutcome::NotFound => debug!(list = %list.title(), "Add to missing list ignored"),
        }
        Ok(outcome)
    }

    /// Delete the item `id` from `list`
    pub async fn delete_item(&self, list: &dyn NamedList, id: ObjectId) -> Result<MutationOutcome> {
        let outcome = list.remove(id).await?;

        match outcome {
            MutationOutcome::Applied => info!(list = %list.title(), item = %id, "Deleted item"),
            MutationOutcome::NotFound => {
                debug!(list = %list.title(), "Delete from missing list ignored")
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::{MemoryTodoStore, Resolution, TodoStore};
    use std::sync::Arc;

    fn service() -> (Arc<MemoryTodoStore>, ListResolver, MutationService) {
        let store = Arc::new(MemoryTodoStore::new());
        let resolver = ListResolver::new(store.clone(), "Today");
        let service = MutationService::new(resolver.clone());
        (store, resolver, service)
    }

    async fn add(svc: &MutationService, name: &str, list_name: &str) -> Result<MutationOutcome> {
        svc.add_item(svc.list(list_name).as_ref(), name).await
    }

    async fn delete(svc: &MutationService, id: ObjectId, list_name: &str) -> Result<MutationOutcome> {
        svc.delete_item(svc.list(list_name).as_ref(), id).await
    }

    #[tokio::test]
    async fn test_add_to_default_list() {
        let (store, _, svc) = service();

        let outcome = add(&svc, "Buy milk", "Today").await.unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);

        let items = store.default_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Buy milk");
    }

    #[tokio::test]
    async fn test_add_rejects_blank_name() {
        let (store, _, svc) = service();

        let err = add(&svc, "   ", "Today").await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));
        assert!(store.default_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_missing_list_does_not_create_it() {
        let (store, _, svc) = service();

        let outcome = add(&svc, "eggs", "Groceries").await.unwrap();
        assert_eq!(outcome, MutationOutcome::NotFound);
        assert!(store.find_list("Groceries").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_to_existing_list() {
        let (store, resolver, svc) = service();
        assert!(matches!(
            resolver.resolve(Some("groceries")).await.unwrap(),
            Resolution::Redirect(_)
        ));

        let outcome = add(&svc, "eggs", "Groceries").await.unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);

        let list = store.find_list("Groceries").await.unwrap().unwrap();
        assert_eq!(list.items.len(), 4);
        assert_eq!(list.items.last().unwrap().name, "eggs");
    }

    #[test]
    fn test_bound_list_paths() {
        let (_, _, svc) = service();
        assert_eq!(svc.list("Today").path(), "/");
        assert_eq!(svc.list("today").path(), "/");
        assert_eq!(svc.list("weekend plans").path(), "/Weekend%20plans");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_on_default_list() {
        let (store, _, svc) = service();
        add(&svc, "a", "Today").await.unwrap();
        add(&svc, "b", "Today").await.unwrap();
        let id = store.default_items().await.unwrap()[0].id;

        assert_eq!(delete(&svc, id, "Today").await.unwrap(), MutationOutcome::Applied);
        assert_eq!(delete(&svc, id, "Today").await.unwrap(), MutationOutcome::Applied);

        let items = store.default_items().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "b");
    }

    #[tokio::test]
    async fn test_delete_from_missing_list_is_not_found() {
        let (_, _, svc) = service();
        assert_eq!(
            delete(&svc, ObjectId::new(), "Nowhere").await.unwrap(),
            MutationOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_delete_only_touches_owning_list() {
        let (store, resolver, svc) = service();
        resolver.resolve(Some("home")).await.unwrap();
        resolver.resolve(Some("work")).await.unwrap();
        let home = store.find_list("Home").await.unwrap().unwrap();
        let work = store.find_list("Work").await.unwrap().unwrap();

        // An id from another list is simply absent here
        assert_eq!(
            delete(&svc, work.items[0].id, "Home").await.unwrap(),
            MutationOutcome::Applied
        );
        assert_eq!(store.find_list("Home").await.unwrap().unwrap().items, home.items);

        delete(&svc, home.items[0].id, "Home").await.unwrap();
        assert_eq!(store.find_list("Home").await.unwrap().unwrap().items.len(), 2);
        assert_eq!(store.find_list("Work").await.unwrap().unwrap().items, work.items);
    }
}
