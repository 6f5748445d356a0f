use super::{DeleteOutcome, InventoryList};
use crate::app::part_repository::PartRepository;
use crate::domain::error::PartError;
use crate::domain::part::filter::{CategoryFilter, CategorySummary};
use crate::domain::part::Part;

/// Full inventory with summary tiles and a category filter.
pub struct DashboardPage {
    pub list: InventoryList,
    filter: CategoryFilter,
}

impl DashboardPage {
    pub fn new(repository: PartRepository) -> Self {
        Self {
            list: InventoryList::new(repository),
            filter: CategoryFilter::All,
        }
    }

    pub async fn load(&mut self) -> Result<(), PartError> {
        self.list.load().await
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<Part> {
        self.filter.apply(self.list.parts())
    }

    /// Counts over everything fetched, independent of the active filter.
    pub fn summary(&self) -> CategorySummary {
        CategorySummary::of(self.list.parts())
    }

    pub async fn delete(&mut self, id: &str, confirmed: bool) -> Result<DeleteOutcome, PartError> {
        self.list.delete(id, confirmed).await
    }

    pub fn apply_update(&mut self, part: Part) {
        self.list.apply_update(part);
    }
}
