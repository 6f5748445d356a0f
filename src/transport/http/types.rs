use crate::app::part_repository::PartRepository;
use crate::app::view::NavBar;
use crate::domain::part::filter::{CategoryGroup, CategorySummary};
use crate::domain::part::Part;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub repository: PartRepository,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable error code (`VALIDATION_ERROR`, `CONFLICT`, ...), present on failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Exact model year.
    #[serde(default)]
    pub year: Option<String>,
}

impl SearchQuery {
    /// Visiting the page without any parameter shows the empty form.
    pub fn is_submitted(&self) -> bool {
        self.brand.is_some() || self.model.is_some() || self.year.is_some()
    }
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// `all`, `dash_kit`, `wiring_harness` or `headlight`.
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RemoveItemQuery {
    /// Matched against brand, model and stock number.
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Must be `true` for the delete to happen; any other value cancels.
    #[serde(default)]
    pub confirm: Option<String>,
}

impl DeleteQuery {
    pub fn is_confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("true")
    }
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPartsQuery {
    #[serde(default)]
    pub part_type: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct SearchView {
    pub nav: NavBar,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub searched: bool,
    pub total: usize,
    pub groups: Vec<CategoryGroup>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct AddItemView {
    pub nav: NavBar,
    pub part_types: Vec<PartTypeOption>,
    pub max_image_bytes: usize,
    pub min_year: i32,
    pub max_year: i32,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PartTypeOption {
    pub value: String,
    pub label: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct DashboardView {
    pub nav: NavBar,
    pub summary: CategorySummary,
    pub filter: String,
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct RemoveItemView {
    pub nav: NavBar,
    pub search_term: String,
    pub total: usize,
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct DeleteView {
    pub id: String,
    /// `deleted` or `cancelled`.
    pub outcome: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct NotFoundView {
    pub nav: NavBar,
    pub path: String,
}

/// Multipart body of the add/edit forms (documentation only; parsed field by field).
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct PartUpload {
    /// `dash_kit`, `wiring_harness` or `headlight`.
    pub part_type: String,
    pub car_brand: String,
    pub car_model: String,
    pub car_year: String,
    pub stock_number: String,
    /// Required on create, optional on edit.
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}
