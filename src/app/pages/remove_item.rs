use super::{DeleteOutcome, InventoryList};
use crate::app::part_repository::PartRepository;
use crate::domain::error::PartError;
use crate::domain::part::filter::search_parts;
use crate::domain::part::Part;

/// Full inventory narrowed by a free-text search over brand, model and stock number.
pub struct RemoveItemPage {
    pub list: InventoryList,
    search_term: String,
}

impl RemoveItemPage {
    pub fn new(repository: PartRepository) -> Self {
        Self {
            list: InventoryList::new(repository),
            search_term: String::new(),
        }
    }

    pub async fn load(&mut self) -> Result<(), PartError> {
        self.list.load().await
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn visible(&self) -> Vec<Part> {
        search_parts(self.list.parts(), &self.search_term)
    }

    pub async fn delete(&mut self, id: &str, confirmed: bool) -> Result<DeleteOutcome, PartError> {
        self.list.delete(id, confirmed).await
    }

    pub fn apply_update(&mut self, part: Part) {
        self.list.apply_update(part);
    }
}
