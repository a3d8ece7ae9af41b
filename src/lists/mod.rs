//! List and item logic
//!
//! - **Seeder**: starter items for new lists
//! - **Store**: persistence boundary with MongoDB and in-memory backends
//! - **Resolver**: maps requested names to lists, lazily creating them
//! - **Mutations**: add/delete items through the uniform [`NamedList`] view

pub mod mongo_store;
pub mod mutation;
pub mod name;
pub mod named;
pub mod resolver;
pub mod seed;
pub mod store;

pub use mongo_store::MongoTodoStore;
pub use mutation::MutationService;
pub use name::{list_path, normalize_list_name};
pub use named::{CustomList, DefaultList, MutationOutcome, NamedList};
pub use resolver::{ListResolver, ListTarget, Resolution};
pub use seed::{default_items, DEFAULT_ITEM_NAMES};
pub use store::{MemoryTodoStore, PullResult, TodoStore};
