use crate::app::pages::AddItemPage;
use crate::app::view::NavBar;
use crate::domain::part::image::MAX_IMAGE_BYTES;
use crate::domain::part::{PartForm, PartType, MAX_CAR_YEAR, MIN_CAR_YEAR};
use crate::transport::http::handlers::common::{error_response, ok_response, read_part_form};
use crate::transport::http::types::{AddItemView, ApiResponse, AppState, PartTypeOption, PartUpload};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/add-item",
    responses((status = 200, description = "Empty creation form", body = ApiResponse))
)]
pub async fn add_item_form_handler() -> impl IntoResponse {
    let view = AddItemView {
        nav: NavBar::for_path("/add-item"),
        part_types: PartType::ALL
            .iter()
            .map(|t| PartTypeOption {
                value: t.as_str().to_string(),
                label: t.label().to_string(),
            })
            .collect(),
        max_image_bytes: MAX_IMAGE_BYTES,
        min_year: MIN_CAR_YEAR,
        max_year: MAX_CAR_YEAR,
    };
    ok_response(StatusCode::OK, &view)
}

#[utoipa::path(
    post,
    path = "/add-item",
    request_body(content = PartUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Part created", body = ApiResponse),
        (status = 400, description = "Missing field or invalid image", body = ApiResponse),
        (status = 409, description = "Stock number already exists", body = ApiResponse),
        (status = 502, description = "Upload or insert failed", body = ApiResponse)
    )
)]
pub async fn add_item_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> impl IntoResponse {
    let submitted = match read_part_form(multipart, PartForm::default()).await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };

    let mut page = AddItemPage::new(state.repository.clone());
    page.form = submitted.form;
    if let Some(image) = submitted.image {
        if let Err(e) = page.select_image(image) {
            return error_response(&e);
        }
    }

    match page.submit().await {
        Ok(part) => ok_response(StatusCode::CREATED, &part),
        Err(e) => error_response(&e),
    }
}
