//! 浏览器表单客户端

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../public/index.html");

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
