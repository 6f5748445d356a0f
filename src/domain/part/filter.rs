//! Remote filter description plus the client-side filters applied to an already-fetched list.

use super::{Part, PartType};
use crate::domain::error::PartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Predicates pushed down to the remote query layer.
///
/// Brand/model are case-insensitive substring matches, year and type are exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartFilter {
    pub part_type: Option<PartType>,
    pub brand_contains: Option<String>,
    pub model_contains: Option<String>,
    pub year: Option<i32>,
}

impl PartFilter {
    /// Builds a filter from raw search-form text. Empty fields add no predicate.
    pub fn from_search_form(brand: &str, model: &str, year: &str) -> Result<Self, PartError> {
        let year = if year.trim().is_empty() {
            None
        } else {
            Some(
                year.trim()
                    .parse::<i32>()
                    .map_err(|_| PartError::validation("Year must be a number"))?,
            )
        };
        Ok(PartFilter {
            part_type: None,
            brand_contains: non_empty(brand),
            model_contains: non_empty(model),
            year,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.part_type.is_none()
            && self.brand_contains.is_none()
            && self.model_contains.is_none()
            && self.year.is_none()
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Dashboard category selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(PartType),
}

impl CategoryFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(t) => t.as_str(),
        }
    }

    pub fn matches(self, part: &Part) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(t) => part.part_type == t,
        }
    }

    pub fn apply(self, parts: &[Part]) -> Vec<Part> {
        parts.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = PartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Case-insensitive substring match over brand, model and stock number.
pub fn matches_search_term(part: &Part, term: &str) -> bool {
    let term = term.to_lowercase();
    part.car_brand.to_lowercase().contains(&term)
        || part.car_model.to_lowercase().contains(&term)
        || part.stock_number.to_lowercase().contains(&term)
}

pub fn search_parts(parts: &[Part], term: &str) -> Vec<Part> {
    parts
        .iter()
        .filter(|p| matches_search_term(p, term))
        .cloned()
        .collect()
}

/// Summary tiles. Always computed over the full set, not the filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategorySummary {
    pub total: usize,
    pub dash_kits: usize,
    pub wiring_harnesses: usize,
    pub headlights: usize,
}

impl CategorySummary {
    pub fn of(parts: &[Part]) -> Self {
        let mut summary = CategorySummary {
            total: parts.len(),
            ..Default::default()
        };
        for part in parts {
            match part.part_type {
                PartType::DashKit => summary.dash_kits += 1,
                PartType::WiringHarness => summary.wiring_harnesses += 1,
                PartType::Headlight => summary.headlights += 1,
            }
        }
        summary
    }

    pub fn count(&self, filter: CategoryFilter) -> usize {
        match filter {
            CategoryFilter::All => self.total,
            CategoryFilter::Only(PartType::DashKit) => self.dash_kits,
            CategoryFilter::Only(PartType::WiringHarness) => self.wiring_harnesses,
            CategoryFilter::Only(PartType::Headlight) => self.headlights,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryGroup {
    pub part_type: PartType,
    pub label: String,
    pub count: usize,
    pub parts: Vec<Part>,
}

/// Groups in the fixed `PartType::ALL` order, skipping empty categories.
pub fn group_by_category(parts: &[Part]) -> Vec<CategoryGroup> {
    PartType::ALL
        .iter()
        .filter_map(|&part_type| {
            let members = CategoryFilter::Only(part_type).apply(parts);
            if members.is_empty() {
                return None;
            }
            Some(CategoryGroup {
                part_type,
                label: part_type.group_label().to_string(),
                count: members.len(),
                parts: members,
            })
        })
        .collect()
}
