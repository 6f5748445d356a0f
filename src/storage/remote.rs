//! Contract for the remote data service: a table of parts plus an object-storage bucket.
//!
//! Implementations live in `infra` (hosted REST, direct Postgres, in-memory).

use crate::domain::part::{Part, PartRow};
use async_trait::async_trait;
use thiserror::Error;

/// Postgres `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";
/// Postgres `not_null_violation`.
pub const NOT_NULL_VIOLATION: &str = "23502";

/// Failure reported by the remote service, with its machine-readable code when it sent one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    pub code: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartColumn {
    Id,
    PartType,
    CarBrand,
    CarModel,
    CarYear,
    StockNumber,
    CreatedAt,
}

impl PartColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            PartColumn::Id => "id",
            PartColumn::PartType => "part_type",
            PartColumn::CarBrand => "car_brand",
            PartColumn::CarModel => "car_model",
            PartColumn::CarYear => "car_year",
            PartColumn::StockNumber => "stock_number",
            PartColumn::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Text(String),
    Int(i32),
}

impl std::fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnValue::Text(s) => f.write_str(s),
            ColumnValue::Int(n) => write!(f, "{}", n),
        }
    }
}

/// The value a filter on `column` compares against.
pub fn column_value(part: &Part, column: PartColumn) -> ColumnValue {
    match column {
        PartColumn::Id => ColumnValue::Text(part.id.clone()),
        PartColumn::PartType => ColumnValue::Text(part.part_type.as_str().to_string()),
        PartColumn::CarBrand => ColumnValue::Text(part.car_brand.clone()),
        PartColumn::CarModel => ColumnValue::Text(part.car_model.clone()),
        PartColumn::CarYear => ColumnValue::Int(part.car_year),
        PartColumn::StockNumber => ColumnValue::Text(part.stock_number.clone()),
        PartColumn::CreatedAt => ColumnValue::Text(part.created_at.to_rfc3339()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq(PartColumn, ColumnValue),
    /// Case-insensitive substring match; the needle is the raw user text, matched literally.
    ILike(PartColumn, String),
}

impl Predicate {
    /// Evaluates the predicate locally against an already fetched row.
    pub fn matches(&self, part: &Part) -> bool {
        match self {
            Predicate::Eq(column, value) => &column_value(part, *column) == value,
            Predicate::ILike(column, needle) => column_value(part, *column)
                .to_string()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub column: PartColumn,
    pub ascending: bool,
}

/// A single-table select: conjunction of predicates plus an optional ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub predicates: Vec<Predicate>,
    pub order: Option<Ordering>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: PartColumn, value: ColumnValue) -> Self {
        self.predicates.push(Predicate::Eq(column, value));
        self
    }

    pub fn ilike(mut self, column: PartColumn, needle: impl Into<String>) -> Self {
        self.predicates.push(Predicate::ILike(column, needle.into()));
        self
    }

    pub fn order_by(mut self, column: PartColumn, ascending: bool) -> Self {
        self.order = Some(Ordering { column, ascending });
        self
    }
}

#[async_trait]
pub trait PartTable: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Part>, RemoteError>;

    /// Inserts one row and returns it as stored.
    async fn insert(&self, row: &PartRow) -> Result<Part, RemoteError>;

    /// Overwrites the row with `id`. `Ok(None)` when no row matched.
    async fn update(&self, id: &str, row: &PartRow) -> Result<Option<Part>, RemoteError>;

    /// Deleting an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;

    /// Cheap reachability check used by `/health` and `preflight`.
    async fn ping(&self) -> Result<(), RemoteError>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), RemoteError>;

    fn public_url(&self, path: &str) -> String;
}
