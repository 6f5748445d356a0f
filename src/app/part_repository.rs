//! The part repository.
//!
//! A thin façade that turns UI intents (list, create, update, delete, upload) into calls against
//! the injected remote table and bucket. It holds no state of its own besides the two handles.

use crate::domain::error::PartError;
use crate::domain::part::{ImageFile, Part, PartFilter, PartInput, PartRow};
use crate::storage::remote::{ColumnValue, ObjectStorage, PartColumn, PartTable, SelectQuery};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Progress checkpoints reported while a create/update runs.
pub const PROGRESS_UPLOADING: u8 = 30;
pub const PROGRESS_SAVING: u8 = 60;
pub const PROGRESS_DONE: u8 = 100;

#[derive(Clone)]
pub struct PartRepository {
    table: Arc<dyn PartTable>,
    storage: Arc<dyn ObjectStorage>,
}

fn select_for(filter: Option<&PartFilter>) -> SelectQuery {
    let mut query = SelectQuery::new();
    if let Some(f) = filter {
        if let Some(t) = f.part_type {
            query = query.eq(PartColumn::PartType, ColumnValue::Text(t.as_str().to_string()));
        }
        if let Some(brand) = f.brand_contains.as_deref() {
            query = query.ilike(PartColumn::CarBrand, brand);
        }
        if let Some(model) = f.model_contains.as_deref() {
            query = query.ilike(PartColumn::CarModel, model);
        }
        if let Some(year) = f.year {
            query = query.eq(PartColumn::CarYear, ColumnValue::Int(year));
        }
    }
    query.order_by(PartColumn::CreatedAt, false)
}

impl PartRepository {
    pub fn new(table: Arc<dyn PartTable>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { table, storage }
    }

    /// Newest first. Fetches the whole (filtered) table; there is no pagination.
    pub async fn list(&self, filter: Option<&PartFilter>) -> Result<Vec<Part>, PartError> {
        let query = select_for(filter);
        let parts = self
            .table
            .select(&query)
            .await
            .map_err(|e| PartError::Query(e.to_string()))?;
        debug!(count = parts.len(), filtered = filter.is_some(), "listed parts");
        Ok(parts)
    }

    pub async fn get(&self, id: &str) -> Result<Part, PartError> {
        let query = SelectQuery::new().eq(PartColumn::Id, ColumnValue::Text(id.to_string()));
        self.table
            .select(&query)
            .await
            .map_err(|e| PartError::Query(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| PartError::NotFound(id.to_string()))
    }

    /// Uploads to a freshly generated path and returns the public URL.
    pub async fn upload_image(&self, image: &ImageFile) -> Result<String, PartError> {
        image.validate()?;
        let path = image.generate_storage_path();
        self.storage
            .upload(&path, image.bytes.clone(), &image.content_type)
            .await
            .map_err(PartError::from_upload)?;
        debug!(path = %path, bytes = image.size(), "uploaded part image");
        Ok(self.storage.public_url(&path))
    }

    pub async fn create(&self, input: &PartInput, image: &ImageFile) -> Result<Part, PartError> {
        self.create_with_progress(input, image, &mut |_: u8| {}).await
    }

    /// Upload, then insert. A failed insert leaves the uploaded object in the bucket.
    pub async fn create_with_progress(
        &self,
        input: &PartInput,
        image: &ImageFile,
        progress: &mut (dyn FnMut(u8) + Send),
    ) -> Result<Part, PartError> {
        input.validate()?;
        image.validate()?;

        progress(PROGRESS_UPLOADING);
        let image_url = self.upload_image(image).await?;

        progress(PROGRESS_SAVING);
        let row = PartRow {
            input: input.clone(),
            image_url: Some(image_url.clone()),
        };
        match self.table.insert(&row).await {
            Ok(part) => {
                progress(PROGRESS_DONE);
                info!(id = %part.id, stock_number = %part.stock_number, "part created");
                Ok(part)
            }
            Err(e) => {
                warn!(image_url = %image_url, error = %e, "insert failed after upload; image left orphaned");
                Err(PartError::from_table(e, &input.stock_number))
            }
        }
    }

    pub async fn update(
        &self,
        id: &str,
        input: &PartInput,
        image: Option<&ImageFile>,
    ) -> Result<Part, PartError> {
        self.update_with_progress(id, input, image, &mut |_: u8| {}).await
    }

    /// Without an image the stored `image_url` is kept as is.
    pub async fn update_with_progress(
        &self,
        id: &str,
        input: &PartInput,
        image: Option<&ImageFile>,
        progress: &mut (dyn FnMut(u8) + Send),
    ) -> Result<Part, PartError> {
        input.validate()?;
        if let Some(image) = image {
            image.validate()?;
        }

        let image_url = match image {
            Some(image) => {
                progress(PROGRESS_UPLOADING);
                Some(self.upload_image(image).await?)
            }
            None => None,
        };

        progress(PROGRESS_SAVING);
        let row = PartRow {
            input: input.clone(),
            image_url,
        };
        let updated = self
            .table
            .update(id, &row)
            .await
            .map_err(|e| PartError::from_table(e, &input.stock_number))?
            .ok_or_else(|| PartError::NotFound(id.to_string()))?;
        progress(PROGRESS_DONE);
        info!(id = %updated.id, new_image = image.is_some(), "part updated");
        Ok(updated)
    }

    /// Unconditional; no existence check.
    pub async fn delete(&self, id: &str) -> Result<(), PartError> {
        self.table
            .delete(id)
            .await
            .map_err(|e| PartError::Query(e.to_string()))?;
        info!(id = %id, "part deleted");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), PartError> {
        self.table
            .ping()
            .await
            .map_err(|e| PartError::Query(e.to_string()))
    }
}
