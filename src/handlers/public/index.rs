// handlers/public/index.rs - GET / handler

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// GET / - Static dashboard shell
pub async fn index_get() -> Html<&'static str> {
    Html(INDEX_HTML)
}
