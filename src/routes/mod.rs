//! HTTP routes

pub mod health;
pub mod lists;

use bytes::Bytes;
use http_body_util::Full;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use tracing::error;

pub use health::health_check;
pub use lists::{handle_add_item, handle_delete_item, handle_show_list, AddItemForm, DeleteItemForm};

/// Finish a response builder, falling back to a bare 500 if it is invalid
pub(crate) fn finish(builder: Builder, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    builder.body(Full::new(body.into())).unwrap_or_else(|e| {
        error!("Failed to build response: {}", e);
        let mut response = Response::new(Full::new(Bytes::from_static(b"Internal Server Error")));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}

/// 302 redirect to `location`
pub fn redirect_response(location: &str) -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(StatusCode::FOUND)
            .header("Location", location)
            .header("Cache-Control", "no-store"),
        Bytes::new(),
    )
}

/// HTML page
pub fn html_response(status: StatusCode, html: String) -> Response<Full<Bytes>> {
    finish(
        Response::builder()
            .status(status)
            .header("Content-Type", "text/html; charset=utf-8")
            .header("Cache-Control", "no-store"),
        html,
    )
}

/// Plain error page carrying only the status reason
pub fn error_page(status: StatusCode) -> Response<Full<Bytes>> {
    let reason = status.canonical_reason().unwrap_or("Error");
    html_response(
        status,
        format!(
            "<!DOCTYPE html>\n<html><head><title>{0}</title></head><body><h1>{1} {0}</h1></body></html>\n",
            reason,
            status.as_u16()
        ),
    )
}

/// JSON body
pub fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => finish(
            Response::builder()
                .status(status)
                .header("Content-Type", "application/json")
                .header("Cache-Control", "no-store"),
            json,
        ),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            error_page(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_sets_location() {
        let response = redirect_response("/Groceries");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()["Location"], "/Groceries");
    }

    #[test]
    fn test_invalid_header_falls_back_to_500() {
        let response = redirect_response("/bad\nheader");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
