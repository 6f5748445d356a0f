use crate::app::pages::SearchPage;
use crate::app::view::NavBar;
use crate::transport::http::handlers::common::{error_response, ok_response};
use crate::transport::http::types::{ApiResponse, AppState, SearchQuery, SearchView};
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search form and grouped results", body = ApiResponse),
        (status = 400, description = "Year is not a number", body = ApiResponse),
        (status = 502, description = "Remote query failed", body = ApiResponse)
    )
)]
pub async fn search_handler(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let mut page = SearchPage::new(state.repository.clone());
    page.brand = query.brand.clone().unwrap_or_default();
    page.model = query.model.clone().unwrap_or_default();
    page.year = query.year.clone().unwrap_or_default();

    if query.is_submitted() {
        if let Err(e) = page.submit().await {
            return error_response(&e);
        }
    }

    let view = SearchView {
        nav: NavBar::for_path(uri.path()),
        total: page.results().len(),
        groups: page.groups(),
        searched: page.searched(),
        brand: page.brand,
        model: page.model,
        year: page.year,
    };
    ok_response(StatusCode::OK, &view)
}
