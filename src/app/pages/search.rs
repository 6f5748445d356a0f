use super::ActionState;
use crate::app::part_repository::PartRepository;
use crate::app::view::{ImageOverlay, OverlayEvent};
use crate::domain::error::PartError;
use crate::domain::part::filter::{group_by_category, CategoryGroup, PartFilter};
use crate::domain::part::Part;

/// Search form whose filtering runs in the remote query layer.
pub struct SearchPage {
    repository: PartRepository,
    pub brand: String,
    pub model: String,
    pub year: String,
    results: Vec<Part>,
    searched: bool,
    pub state: ActionState,
    pub overlay: ImageOverlay,
}

impl SearchPage {
    pub fn new(repository: PartRepository) -> Self {
        Self {
            repository,
            brand: String::new(),
            model: String::new(),
            year: String::new(),
            results: Vec::new(),
            searched: false,
            state: ActionState::Idle,
            overlay: ImageOverlay::default(),
        }
    }

    pub fn filter(&self) -> Result<PartFilter, PartError> {
        PartFilter::from_search_form(&self.brand, &self.model, &self.year)
    }

    /// Runs the search. Previous results stay in place if the query fails.
    pub async fn submit(&mut self) -> Result<&[Part], PartError> {
        self.searched = true;
        let filter = match self.filter() {
            Ok(f) => f,
            Err(e) => {
                self.state = ActionState::Error(e.clone());
                return Err(e);
            }
        };
        self.state = ActionState::Loading;
        let result = self.repository.list(Some(&filter)).await;
        self.state.finish("search", &result);
        self.results = result?;
        Ok(&self.results)
    }

    pub fn searched(&self) -> bool {
        self.searched
    }

    pub fn results(&self) -> &[Part] {
        &self.results
    }

    pub fn groups(&self) -> Vec<CategoryGroup> {
        group_by_category(&self.results)
    }

    pub fn expand_image(&mut self, image_url: &str) {
        self.overlay.open(image_url);
    }

    pub fn overlay_event(&mut self, event: OverlayEvent) -> bool {
        self.overlay.handle(event)
    }
}
