//! The `Part` record and the user-editable input that produces it.

use crate::domain::error::PartError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub mod filter;
pub mod image;

pub use filter::{CategoryFilter, CategoryGroup, CategorySummary, PartFilter};
pub use image::ImageFile;

pub const MIN_CAR_YEAR: i32 = 1900;
pub const MAX_CAR_YEAR: i32 = 2100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    DashKit,
    WiringHarness,
    Headlight,
}

impl PartType {
    /// Fixed display order used by grouped results.
    pub const ALL: [PartType; 3] = [PartType::DashKit, PartType::WiringHarness, PartType::Headlight];

    pub fn as_str(self) -> &'static str {
        match self {
            PartType::DashKit => "dash_kit",
            PartType::WiringHarness => "wiring_harness",
            PartType::Headlight => "headlight",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartType::DashKit => "Dash Kit",
            PartType::WiringHarness => "Wiring Harness",
            PartType::Headlight => "Headlight",
        }
    }

    pub fn group_label(self) -> &'static str {
        match self {
            PartType::DashKit => "Dash Kits",
            PartType::WiringHarness => "Wiring Harnesses",
            PartType::Headlight => "Headlights",
        }
    }
}

impl Default for PartType {
    fn default() -> Self {
        PartType::DashKit
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartType {
    type Err = PartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dash_kit" => Ok(PartType::DashKit),
            "wiring_harness" => Ok(PartType::WiringHarness),
            "headlight" => Ok(PartType::Headlight),
            other => Err(PartError::validation(format!("Unknown part type '{}'", other))),
        }
    }
}

/// A persisted inventory record. `id`, `created_at` and `updated_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Part {
    pub id: String,
    pub part_type: PartType,
    pub car_brand: String,
    pub car_model: String,
    pub car_year: i32,
    pub stock_number: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a user can set on create or edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PartInput {
    pub part_type: PartType,
    pub car_brand: String,
    pub car_model: String,
    pub car_year: i32,
    pub stock_number: String,
}

impl PartInput {
    pub fn validate(&self) -> Result<(), PartError> {
        if self.car_brand.trim().is_empty()
            || self.car_model.trim().is_empty()
            || self.stock_number.trim().is_empty()
        {
            return Err(PartError::validation("Please fill in all fields"));
        }
        if !(MIN_CAR_YEAR..=MAX_CAR_YEAR).contains(&self.car_year) {
            return Err(PartError::validation(format!(
                "Year must be between {} and {}",
                MIN_CAR_YEAR, MAX_CAR_YEAR
            )));
        }
        Ok(())
    }
}

impl From<&Part> for PartInput {
    fn from(part: &Part) -> Self {
        PartInput {
            part_type: part.part_type,
            car_brand: part.car_brand.clone(),
            car_model: part.car_model.clone(),
            car_year: part.car_year,
            stock_number: part.stock_number.clone(),
        }
    }
}

/// Body sent to the table on insert/update.
///
/// `image_url: None` leaves the stored column untouched on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartRow {
    #[serde(flatten)]
    pub input: PartInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Raw form state as typed by the user (year is still text).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartForm {
    #[serde(default)]
    pub part_type: PartType,
    #[serde(default)]
    pub car_brand: String,
    #[serde(default)]
    pub car_model: String,
    #[serde(default)]
    pub car_year: String,
    #[serde(default)]
    pub stock_number: String,
}

impl PartForm {
    pub fn from_part(part: &Part) -> Self {
        PartForm {
            part_type: part.part_type,
            car_brand: part.car_brand.clone(),
            car_model: part.car_model.clone(),
            car_year: part.car_year.to_string(),
            stock_number: part.stock_number.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.car_brand.is_empty()
            && !self.car_model.is_empty()
            && !self.car_year.is_empty()
            && !self.stock_number.is_empty()
    }

    pub fn to_input(&self) -> Result<PartInput, PartError> {
        if !self.is_complete() {
            return Err(PartError::validation("Please fill in all fields"));
        }
        let car_year = self
            .car_year
            .trim()
            .parse::<i32>()
            .map_err(|_| PartError::validation("Year must be a number"))?;
        let input = PartInput {
            part_type: self.part_type,
            car_brand: self.car_brand.clone(),
            car_model: self.car_model.clone(),
            car_year,
            stock_number: self.stock_number.clone(),
        };
        input.validate()?;
        Ok(input)
    }
}
