//! Todolist - server-rendered to-do lists
//!
//! A built-in default list plus any number of named lists created on first
//! visit, persisted in MongoDB.
//!
//! ## Layout
//!
//! - **db**: MongoDB client, typed collections and document schemas
//! - **lists**: name resolution, lazy creation, seeding and item mutations
//! - **views**: HTML rendering of a list page
//! - **routes** / **server**: hyper HTTP surface

pub mod config;
pub mod db;
pub mod lists;
pub mod routes;
pub mod server;
pub mod types;
pub mod views;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{Result, TodoError};
