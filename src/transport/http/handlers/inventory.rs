//! Dashboard and remove-item views. Both fetch the full list, then filter locally.

use crate::app::pages::{DashboardPage, RemoveItemPage};
use crate::app::view::NavBar;
use crate::domain::part::filter::CategoryFilter;
use crate::transport::http::handlers::common::{error_response, non_empty, ok_response};
use crate::transport::http::types::{
    ApiResponse, AppState, DashboardQuery, DashboardView, RemoveItemQuery, RemoveItemView,
};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Inventory with summary tiles", body = ApiResponse),
        (status = 400, description = "Unknown category", body = ApiResponse),
        (status = 502, description = "Remote query failed", body = ApiResponse)
    )
)]
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let filter = match non_empty(&query.filter).map(str::parse::<CategoryFilter>) {
        None => CategoryFilter::All,
        Some(Ok(f)) => f,
        Some(Err(e)) => return error_response(&e),
    };

    let mut page = DashboardPage::new(state.repository.clone());
    if let Err(e) = page.load().await {
        return error_response(&e);
    }
    page.set_filter(filter);

    let view = DashboardView {
        nav: NavBar::for_path("/dashboard"),
        summary: page.summary(),
        filter: page.filter().to_string(),
        parts: page.visible(),
    };
    ok_response(StatusCode::OK, &view)
}

#[utoipa::path(
    get,
    path = "/remove-item",
    params(RemoveItemQuery),
    responses(
        (status = 200, description = "Inventory narrowed by search term", body = ApiResponse),
        (status = 502, description = "Remote query failed", body = ApiResponse)
    )
)]
pub async fn remove_item_handler(
    State(state): State<AppState>,
    Query(query): Query<RemoveItemQuery>,
) -> impl IntoResponse {
    let mut page = RemoveItemPage::new(state.repository.clone());
    if let Err(e) = page.load().await {
        return error_response(&e);
    }
    page.set_search_term(query.q.unwrap_or_default());

    let parts = page.visible();
    let view = RemoveItemView {
        nav: NavBar::for_path("/remove-item"),
        search_term: page.search_term().to_string(),
        total: parts.len(),
        parts,
    };
    ok_response(StatusCode::OK, &view)
}
