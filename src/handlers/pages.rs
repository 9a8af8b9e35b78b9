//! HTML pages
//!
//! `GET /` serves the request form and `GET /response` shows a generated
//! answer passed in the `response` query parameter.

use axum::{extract::Query, response::Html};
use serde::Deserialize;

const INDEX_HTML: &str = include_str!("../../templates/index.html");
const RESPONSE_HTML: &str = include_str!("../../templates/response.html");

/// Placeholder in `response.html` replaced by the escaped response text
const RESPONSE_PLACEHOLDER: &str = "{{ response }}";

/// Query string accepted by `GET /response`
#[derive(Debug, Default, Deserialize)]
pub struct ResponseQuery {
    pub response: Option<String>,
}

/// GET / handler
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /response handler
pub async fn response(Query(query): Query<ResponseQuery>) -> Html<String> {
    Html(render_response(query.response.as_deref().unwrap_or_default()))
}

/// Render the response page with `text` HTML-escaped into it
pub fn render_response(text: &str) -> String {
    RESPONSE_HTML.replacen(RESPONSE_PLACEHOLDER, &escape_html(text), 1)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_have_expected_hooks() {
        assert!(INDEX_HTML.contains("id=\"combinedForm\""));
        assert!(INDEX_HTML.contains("/static/scripts.js"));
        assert_eq!(RESPONSE_HTML.matches(RESPONSE_PLACEHOLDER).count(), 1);
    }

    #[test]
    fn test_render_response_escapes_markup() {
        let page = render_response("<script>alert('x')</script> & \"more\"");
        assert!(page.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &quot;more&quot;"));
        assert!(!page.contains("<script>alert"));
        assert!(!page.contains(RESPONSE_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_response_handler_without_query_renders_empty() {
        let Html(page) = response(Query(ResponseQuery::default())).await;
        assert!(!page.contains(RESPONSE_PLACEHOLDER));
    }
}
