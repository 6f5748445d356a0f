//! Record-level endpoints: raw listing, the edit dialog's submit, and confirmed deletes.

use crate::app::pages::{EditDialog, InventoryList};
use crate::domain::part::filter::PartFilter;
use crate::domain::part::PartType;
use crate::transport::http::handlers::common::{error_response, non_empty, ok_response, read_part_form};
use crate::transport::http::types::{
    ApiResponse, AppState, DeleteQuery, DeleteView, ListPartsQuery, PartUpload,
};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/api/parts",
    params(ListPartsQuery),
    responses(
        (status = 200, description = "Parts, newest first", body = ApiResponse),
        (status = 400, description = "Bad filter value", body = ApiResponse),
        (status = 502, description = "Remote query failed", body = ApiResponse)
    )
)]
pub async fn list_parts_handler(
    State(state): State<AppState>,
    Query(query): Query<ListPartsQuery>,
) -> impl IntoResponse {
    let mut filter = match PartFilter::from_search_form(
        non_empty(&query.brand).unwrap_or(""),
        non_empty(&query.model).unwrap_or(""),
        non_empty(&query.year).unwrap_or(""),
    ) {
        Ok(f) => f,
        Err(e) => return error_response(&e),
    };
    if let Some(raw) = non_empty(&query.part_type) {
        match raw.parse::<PartType>() {
            Ok(t) => filter.part_type = Some(t),
            Err(e) => return error_response(&e),
        }
    }

    let filter = if filter.is_empty() { None } else { Some(&filter) };
    match state.repository.list(filter).await {
        Ok(parts) => ok_response(StatusCode::OK, &parts),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/parts/{id}",
    params(("id" = String, Path, description = "Part id")),
    request_body(content = PartUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated part", body = ApiResponse),
        (status = 400, description = "Missing field or invalid image", body = ApiResponse),
        (status = 404, description = "No such part", body = ApiResponse),
        (status = 409, description = "Stock number already exists", body = ApiResponse),
        (status = 502, description = "Upload or update failed", body = ApiResponse)
    )
)]
pub async fn update_part_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> impl IntoResponse {
    let current = match state.repository.get(&id).await {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    let mut dialog = EditDialog::open(state.repository.clone(), current);

    // Fields missing from the request keep the stored values.
    let submitted = match read_part_form(multipart, dialog.form.clone()).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    dialog.form = submitted.form;
    if let Some(image) = submitted.image {
        if let Err(e) = dialog.select_image(image) {
            return error_response(&e);
        }
    }
    match dialog.submit().await {
        Ok(part) => ok_response(StatusCode::OK, &part),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    delete,
    path = "/parts/{id}",
    params(("id" = String, Path, description = "Part id"), DeleteQuery),
    responses(
        (status = 200, description = "Deleted, or cancelled when not confirmed", body = ApiResponse),
        (status = 502, description = "Remote delete failed", body = ApiResponse)
    )
)]
pub async fn delete_part_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> impl IntoResponse {
    let mut list = InventoryList::new(state.repository.clone());
    match list.delete(&id, query.is_confirmed()).await {
        Ok(outcome) => ok_response(
            StatusCode::OK,
            &DeleteView {
                id,
                outcome: outcome.as_str().to_string(),
            },
        ),
        Err(e) => error_response(&e),
    }
}
