//! List resolution for the read path
//!
//! Maps a requested name to the default list or a custom list. Missing
//! lists are created with starter content and the caller is told to
//! redirect to the canonical path, so the first render always happens
//! after the write is durable.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::db::Item;
use crate::lists::name::{list_path, normalize_list_name};
use crate::lists::named::{CustomList, DefaultList, NamedList};
use crate::lists::seed::default_items;
use crate::lists::store::TodoStore;
use crate::types::Result;

/// Which list a name refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListTarget {
    /// The built-in default list
    Default,
    /// A custom list, by normalized name
    Custom(String),
}

/// What the caller should do after resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Render this list
    Render { title: String, items: Vec<Item> },
    /// Redirect to this path and fetch again
    Redirect(String),
}

/// Resolves list names against the store
#[derive(Clone)]
pub struct ListResolver {
    store: Arc<dyn TodoStore>,
    default_title: String,
}

impl ListResolver {
    /// `default_title` is normalized like any requested name, so the title
    /// echoed back by the add form always classifies as the default list.
    pub fn new(store: Arc<dyn TodoStore>, default_title: impl Into<String>) -> Self {
        Self {
            store,
            default_title: normalize_list_name(&default_title.into()),
        }
    }

    /// Underlying store
    pub fn store(&self) -> &dyn TodoStore {
        self.store.as_ref()
    }

    /// Classify a raw name. Absent, blank, or the reserved title all mean the default list.
    pub fn target(&self, raw: Option<&str>) -> ListTarget {
        let normalized = raw.map(normalize_list_name).unwrap_or_default();
        if normalized.is_empty() || normalized == self.default_title {
            ListTarget::Default
        } else {
            ListTarget::Custom(normalized)
        }
    }

    /// Bind a target to its list implementation
    pub fn list(&self, target: ListTarget) -> Box<dyn NamedList + '_> {
        match target {
            ListTarget::Default => Box::new(DefaultList::new(self.store(), &self.default_title)),
            ListTarget::Custom(name) => Box::new(CustomList::new(self.store(), name)),
        }
    }

    /// Resolve a list for display, seeding or creating it when needed.
    ///
    /// `raw` is the path token, `None` for the root path.
    pub async fn resolve(&self, raw: Option<&str>) -> Result<Resolution> {
        match self.target(raw) {
            ListTarget::Default if raw.is_some() => Ok(Resolution::Redirect("/".to_string())),
            ListTarget::Default => self.resolve_default().await,
            ListTarget::Custom(name) => self.resolve_custom(name).await,
        }
    }

    async fn resolve_default(&self) -> Result<Resolution> {
        let list = self.list(ListTarget::Default);
        let items = list.items().await?.unwrap_or_default();
        if !items.is_empty() {
            return Ok(Resolution::Render {
                title: list.title().to_string(),
                items,
            });
        }

        // A failed seed still redirects; the next read retries it.
        match self.store.seed_default_items(default_items()).await {
            Ok(0) => debug!("Default list already seeded"),
            Ok(count) => info!(count, "Seeded default list"),
            Err(e) => error!("Failed to seed default list: {}", e),
        }
        Ok(Resolution::Redirect(list.path()))
    }

    async fn resolve_custom(&self, name: String) -> Result<Resolution> {
        let (list, created) = self
            .store
            .find_or_create_list(&name, default_items())
            .await?;

        if created {
            info!(list = %name, "Created list");
            return Ok(Resolution::Redirect(list_path(&name)));
        }

        Ok(Resolution::Render {
            title: list.name,
            items: list.items,
        })
    }
}
