use crate::app::view::NavBar;
use crate::app::view::NavLink;
use crate::domain::part::filter::{CategoryGroup, CategorySummary};
use crate::domain::part::{Part, PartInput, PartType};
use crate::transport::http::handlers::{add_item, health, inventory, not_found, parts, search};
use crate::transport::http::types::{
    AddItemView, ApiResponse, AppState, DashboardView, DeleteView, NotFoundView, PartTypeOption,
    PartUpload, RemoveItemView, SearchView,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use axum::Router;
use utoipa::OpenApi;

/// Room for the largest accepted image plus the text fields; larger bodies are refused by axum.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        search::search_handler,
        add_item::add_item_form_handler,
        add_item::add_item_handler,
        inventory::dashboard_handler,
        inventory::remove_item_handler,
        parts::list_parts_handler,
        parts::update_part_handler,
        parts::delete_part_handler
    ),
    components(schemas(
        ApiResponse,
        Part,
        PartInput,
        PartType,
        CategorySummary,
        CategoryGroup,
        NavBar,
        NavLink,
        SearchView,
        AddItemView,
        PartTypeOption,
        DashboardView,
        RemoveItemView,
        DeleteView,
        NotFoundView,
        PartUpload
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/", get(search::search_handler))
        .route("/search", get(search::search_handler))
        .route(
            "/add-item",
            get(add_item::add_item_form_handler).post(add_item::add_item_handler),
        )
        .route("/dashboard", get(inventory::dashboard_handler))
        .route("/remove-item", get(inventory::remove_item_handler))
        .route("/api/parts", get(parts::list_parts_handler))
        .route(
            "/parts/:id",
            put(parts::update_part_handler).delete(parts::delete_part_handler),
        )
        .fallback(not_found::not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
}
