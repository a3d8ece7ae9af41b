//! Page rendering
//!
//! The list page is produced by a [`ListRenderer`]; [`HtmlRenderer`] is the
//! built-in one. Forms post back to `/` (add) and `/delete` (remove) with the
//! field names the routes expect.

use serde::Serialize;

use crate::db::Item;

/// Data handed to a renderer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView<'a> {
    pub list_title: &'a str,
    pub items: &'a [Item],
}

/// Trait for page rendering - allows swapping implementations
pub trait ListRenderer: Send + Sync {
    fn render(&self, view: &ListView<'_>) -> String;
}

/// Plain server-side HTML renderer
#[derive(Debug, Default, Clone)]
pub struct HtmlRenderer;

impl ListRenderer for HtmlRenderer {
    fn render(&self, view: &ListView<'_>) -> String {
        let title = escape_html(view.list_title);
        let mut html = String::with_capacity(1024 + view.items.len() * 256);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", title));
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<div class=\"box\" id=\"heading\"><h1>{}</h1></div>\n", title));
        html.push_str("<div class=\"box\">\n");

        for item in view.items {
            html.push_str("<form action=\"/delete\" method=\"post\">\n<div class=\"item\">\n");
            html.push_str(&format!(
                "<input type=\"checkbox\" name=\"checkbox\" value=\"{}\" onChange=\"this.form.submit()\">\n",
                item.id.to_hex()
            ));
            html.push_str(&format!("<p>{}</p>\n", escape_html(&item.name)));
            html.push_str("</div>\n");
            html.push_str(&format!(
                "<input type=\"hidden\" name=\"listName\" value=\"{}\">\n",
                title
            ));
            html.push_str("</form>\n");
        }

        html.push_str("<form class=\"item\" action=\"/\" method=\"post\">\n");
        html.push_str(
            "<input type=\"text\" name=\"newItem\" placeholder=\"New Item\" autocomplete=\"off\">\n",
        );
        html.push_str(&format!(
            "<button type=\"submit\" name=\"list\" value=\"{}\">+</button>\n",
            title
        ));
        html.push_str("</form>\n</div>\n</body>\n</html>\n");

        html
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_items_and_forms() {
        let items = vec![Item::new("Buy milk"), Item::new("Walk dog")];
        let html = HtmlRenderer.render(&ListView {
            list_title: "Today",
            items: &items,
        });

        assert!(html.contains("<h1>Today</h1>"));
        assert!(html.contains("<p>Buy milk</p>"));
        assert!(html.contains(&format!("value=\"{}\"", items[1].id.to_hex())));
        assert!(html.contains("name=\"listName\" value=\"Today\""));
        assert!(html.contains("name=\"list\" value=\"Today\""));
    }

    #[test]
    fn test_render_escapes_user_text() {
        let items = vec![Item::new("<script>alert('x')</script>")];
        let html = HtmlRenderer.render(&ListView {
            list_title: "A \"quoted\" list",
            items: &items,
        });

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("A &quot;quoted&quot; list"));
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let items = vec![Item::new("x")];
        let json = serde_json::to_value(ListView {
            list_title: "Today",
            items: &items,
        })
        .unwrap();
        assert_eq!(json["listTitle"], "Today");
        assert_eq!(json["items"][0]["name"], "x");
    }
}
