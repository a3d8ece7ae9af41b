//! List routes
//!
//! - `GET /` and `GET /{name}` - show a list, seeding or creating it first
//! - `POST /` - add an item (`newItem`, `list`)
//! - `POST /delete` - delete an item (`checkbox`, `listName`)
//!
//! Every successful mutation answers with a redirect to the owning list.
//! Missing custom lists redirect home. Store failures on writes answer 503.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::db::mongo::parse_object_id;
use crate::lists::{MutationOutcome, Resolution};
use crate::routes::{error_page, html_response, redirect_response};
use crate::server::AppState;
use crate::types::TodoError;
use crate::views::ListView;

/// Form posted by the add button
#[derive(Debug, Deserialize)]
pub struct AddItemForm {
    #[serde(rename = "newItem", default)]
    pub new_item: String,
    #[serde(default)]
    pub list: String,
}

/// Form posted by an item checkbox
#[derive(Debug, Deserialize)]
pub struct DeleteItemForm {
    #[serde(default)]
    pub checkbox: String,
    #[serde(rename = "listName", default)]
    pub list_name: String,
}

/// GET / and GET /{name}
///
/// `token` is the raw (still percent-encoded) path segment, `None` for `/`.
pub async fn handle_show_list(state: Arc<AppState>, token: Option<&str>) -> Response<Full<Bytes>> {
    let decoded = match token.map(urlencoding::decode).transpose() {
        Ok(d) => d,
        Err(e) => {
            debug!("Undecodable list name: {}", e);
            return error_page(StatusCode::BAD_REQUEST);
        }
    };

    match state.resolver.resolve(decoded.as_deref()).await {
        Ok(Resolution::Redirect(location)) => redirect_response(&location),
        Ok(Resolution::Render { title, items }) => {
            let html = state.renderer.render(&ListView {
                list_title: &title,
                items: &items,
            });
            html_response(StatusCode::OK, html)
        }
        Err(e) => {
            error!("Failed to load list: {}", e);
            error_page(e.status_code())
        }
    }
}

/// POST /
pub async fn handle_add_item(state: Arc<AppState>, body: Bytes) -> Response<Full<Bytes>> {
    let form: AddItemForm = match serde_urlencoded::from_bytes(&body) {
        Ok(f) => f,
        Err(e) => {
            debug!("Invalid add form: {}", e);
            return error_page(StatusCode::BAD_REQUEST);
        }
    };

    let list = state.mutations.list(&form.list);

    match state.mutations.add_item(list.as_ref(), &form.new_item).await {
        Ok(MutationOutcome::Applied) => redirect_response(&list.path()),
        Ok(MutationOutcome::NotFound) => redirect_response("/"),
        Err(TodoError::Validation(reason)) => {
            debug!("Add rejected: {}", reason);
            redirect_response(&list.path())
        }
        Err(e) => write_failure("add", e),
    }
}

/// POST /delete
pub async fn handle_delete_item(state: Arc<AppState>, body: Bytes) -> Response<Full<Bytes>> {
    let form: DeleteItemForm = match serde_urlencoded::from_bytes(&body) {
        Ok(f) => f,
        Err(e) => {
            debug!("Invalid delete form: {}", e);
            return error_page(StatusCode::BAD_REQUEST);
        }
    };

    let id = match parse_object_id(&form.checkbox) {
        Ok(id) => id,
        Err(e) => {
            debug!("{}", e);
            return error_page(e.status_code());
        }
    };

    let list = state.mutations.list(&form.list_name);

    match state.mutations.delete_item(list.as_ref(), id).await {
        Ok(MutationOutcome::Applied) => redirect_response(&list.path()),
        Ok(MutationOutcome::NotFound) => redirect_response("/"),
        Err(e) => write_failure("delete", e),
    }
}

fn write_failure(op: &str, e: TodoError) -> Response<Full<Bytes>> {
    if e.is_persistence() {
        error!("Failed to {} item: {}", op, e);
    } else {
        warn!("Failed to {} item: {}", op, e);
    }
    error_page(e.status_code())
}
