use crate::domain::error::{ErrorKind, PartError};
use crate::domain::part::{ImageFile, PartForm};
use crate::transport::http::types::ApiResponse;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub fn status_for(err: &PartError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Upload | ErrorKind::Query => StatusCode::BAD_GATEWAY,
    }
}

pub fn error_response(err: &PartError) -> Response {
    (
        status_for(err),
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(err.to_string()),
            code: Some(err.code().to_string()),
        }),
    )
        .into_response()
}

pub fn ok_response<T: Serialize>(status: StatusCode, data: &T) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => (
            status,
            Json(ApiResponse {
                success: true,
                data: Some(value),
                error: None,
                code: None,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse {
                success: false,
                data: None,
                error: Some(format!("Failed to encode response: {}", e)),
                code: None,
            }),
        )
            .into_response(),
    }
}

/// Form fields plus the optional image, as sent by the add/edit forms.
#[derive(Debug, Default)]
pub struct SubmittedPart {
    pub form: PartForm,
    pub image: Option<ImageFile>,
}

fn malformed(e: impl std::fmt::Display) -> PartError {
    PartError::validation(format!("Invalid multipart body: {}", e))
}

/// Reads a multipart part form on top of `seed`: fields the client did not send keep their
/// seeded value. An empty `image` field counts as "no new image".
pub async fn read_part_form(
    mut multipart: Multipart,
    seed: PartForm,
) -> Result<SubmittedPart, PartError> {
    let mut out = SubmittedPart {
        form: seed,
        image: None,
    };
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(malformed)?;
            if !bytes.is_empty() || !file_name.is_empty() {
                out.image = Some(ImageFile::new(file_name, content_type, bytes.to_vec()));
            }
            continue;
        }
        let value = field.text().await.map_err(malformed)?;
        match name.as_str() {
            "part_type" => out.form.part_type = value.parse()?,
            "car_brand" => out.form.car_brand = value,
            "car_model" => out.form.car_model = value,
            "car_year" => out.form.car_year = value,
            "stock_number" => out.form.stock_number = value,
            _ => {}
        }
    }
    Ok(out)
}

/// Empty query values mean "not set".
pub fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}
