use crate::app::view::{normalize_path, NavBar, Route};
use crate::transport::http::types::{ApiResponse, NotFoundView};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;

/// Catch-all for unknown routes. Known pages reached with a trailing slash are redirected to
/// their canonical path.
pub async fn not_found_handler(uri: Uri) -> Response {
    let path = uri.path();
    if Route::resolve(path) != Route::NotFound {
        let target = match uri.query() {
            Some(q) => format!("{}?{}", normalize_path(path), q),
            None => normalize_path(path).to_string(),
        };
        return Redirect::permanent(&target).into_response();
    }

    let view = NotFoundView {
        nav: NavBar::for_path(path),
        path: path.to_string(),
    };
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse {
            success: false,
            data: serde_json::to_value(&view).ok(),
            error: Some(format!("No page at {}", path)),
            code: Some("NOT_FOUND".to_string()),
        }),
    )
        .into_response()
}
