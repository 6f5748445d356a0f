//! Process-local remote data service.
//!
//! Mirrors the hosted service's observable behavior: server-assigned ids and timestamps,
//! a unique stock number reported with the Postgres code, case-insensitive `ilike`, and
//! idempotent deletes. Every trait call is counted so callers can assert that no remote
//! work happened.

use crate::domain::part::{Part, PartRow};
use crate::storage::remote::{
    column_value, ObjectStorage, PartColumn, PartTable, RemoteError, SelectQuery, NOT_NULL_VIOLATION,
    UNIQUE_VIOLATION,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct InMemoryBackend {
    /// Insertion order.
    rows: RwLock<Vec<Part>>,
    objects: RwLock<HashMap<String, StoredObject>>,
    public_base: String,
    calls: AtomicUsize,
    fail_uploads: AtomicBool,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new("memory://images")
    }
}

impl InMemoryBackend {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            objects: RwLock::new(HashMap::new()),
            public_base: public_base.into().trim_end_matches('/').to_string(),
            calls: AtomicUsize::new(0),
            fail_uploads: AtomicBool::new(false),
        }
    }

    /// Number of table/storage calls served so far (`public_url` excluded, it is local).
    pub fn remote_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn duplicate_stock(stock_number: &str) -> RemoteError {
    RemoteError::with_code(
        UNIQUE_VIOLATION,
        format!(
            "duplicate key value violates unique constraint \"car_parts_stock_number_key\" (stock_number)=({})",
            stock_number
        ),
    )
}

#[async_trait]
impl PartTable for InMemoryBackend {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Part>, RemoteError> {
        self.record_call();
        let rows = self.rows.read().await;
        let mut out: Vec<Part> = rows
            .iter()
            .filter(|p| query.predicates.iter().all(|pred| pred.matches(p)))
            .cloned()
            .collect();
        if let Some(order) = query.order {
            // Newest-inserted first among equal keys when descending.
            if !order.ascending {
                out.reverse();
            }
            out.sort_by(|a, b| {
                let ord = match order.column {
                    PartColumn::CreatedAt => a.created_at.cmp(&b.created_at),
                    PartColumn::CarYear => a.car_year.cmp(&b.car_year),
                    other => column_value(a, other).to_string().cmp(&column_value(b, other).to_string()),
                };
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        Ok(out)
    }

    async fn insert(&self, row: &PartRow) -> Result<Part, RemoteError> {
        self.record_call();
        let image_url = row.image_url.clone().ok_or_else(|| {
            RemoteError::with_code(
                NOT_NULL_VIOLATION,
                "null value in column \"image_url\" violates not-null constraint",
            )
        })?;
        let mut rows = self.rows.write().await;
        if rows.iter().any(|p| p.stock_number == row.input.stock_number) {
            return Err(duplicate_stock(&row.input.stock_number));
        }
        let now = Utc::now();
        let part = Part {
            id: Uuid::new_v4().to_string(),
            part_type: row.input.part_type,
            car_brand: row.input.car_brand.clone(),
            car_model: row.input.car_model.clone(),
            car_year: row.input.car_year,
            stock_number: row.input.stock_number.clone(),
            image_url,
            created_at: now,
            updated_at: now,
        };
        rows.push(part.clone());
        Ok(part)
    }

    async fn update(&self, id: &str, row: &PartRow) -> Result<Option<Part>, RemoteError> {
        self.record_call();
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|p| p.id != id && p.stock_number == row.input.stock_number)
        {
            return Err(duplicate_stock(&row.input.stock_number));
        }
        let Some(part) = rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        part.part_type = row.input.part_type;
        part.car_brand = row.input.car_brand.clone();
        part.car_model = row.input.car_model.clone();
        part.car_year = row.input.car_year;
        part.stock_number = row.input.stock_number.clone();
        if let Some(url) = &row.image_url {
            part.image_url = url.clone();
        }
        part.updated_at = Utc::now();
        Ok(Some(part.clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.record_call();
        self.rows.write().await.retain(|p| p.id != id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), RemoteError> {
        self.record_call();
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for InMemoryBackend {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), RemoteError> {
        self.record_call();
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(RemoteError::with_code("503", "storage unavailable"));
        }
        let mut objects = self.objects.write().await;
        if objects.contains_key(path) {
            return Err(RemoteError::with_code("409", "The resource already exists"));
        }
        objects.insert(
            path.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path)
    }
}
