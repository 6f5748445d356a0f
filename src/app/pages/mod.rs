//! Page controllers.
//!
//! Every page owns its own form/list state and talks to the repository directly. Nothing is
//! shared between pages: each one fetches the full list when it is mounted.

use crate::app::part_repository::PartRepository;
use crate::app::view::{ImageOverlay, OverlayEvent};
use crate::domain::error::PartError;
use crate::domain::part::Part;
use tracing::error;

pub mod add_item;
pub mod dashboard;
pub mod edit_dialog;
pub mod remove_item;
pub mod search;

pub use add_item::AddItemPage;
pub use dashboard::DashboardPage;
pub use edit_dialog::EditDialog;
pub use remove_item::RemoveItemPage;
pub use search::SearchPage;

/// Per-action status (fetch, submit, delete).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(PartError),
}

impl ActionState {
    /// Records the outcome of a finished action, tracing failures at the page boundary.
    pub fn finish<T>(&mut self, action: &'static str, result: &Result<T, PartError>) {
        *self = match result {
            Ok(_) => ActionState::Success,
            Err(e) => {
                error!(action = action, code = e.code(), error = %e, "page action failed");
                ActionState::Error(e.clone())
            }
        };
    }
}

/// A change to apply to an already-rendered list once the remote call has succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum PartDelta {
    Added(Part),
    Replaced(Part),
    Removed(String),
}

/// The page-local copy of the part list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartListCache {
    parts: Vec<Part>,
}

impl PartListCache {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn replace_all(&mut self, parts: Vec<Part>) {
        self.parts = parts;
    }

    /// `Added` goes to the front (newest first). `Replaced` keeps the row's position and is a
    /// no-op for unknown ids.
    pub fn apply(&mut self, delta: PartDelta) {
        match delta {
            PartDelta::Added(part) => self.parts.insert(0, part),
            PartDelta::Replaced(part) => {
                if let Some(slot) = self.parts.iter_mut().find(|p| p.id == part.id) {
                    *slot = part;
                }
            }
            PartDelta::Removed(id) => self.parts.retain(|p| p.id != id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user did not confirm; nothing was sent.
    Cancelled,
}

impl DeleteOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "deleted",
            DeleteOutcome::Cancelled => "cancelled",
        }
    }
}

/// List state shared by the dashboard and remove-item pages.
pub struct InventoryList {
    repository: PartRepository,
    cache: PartListCache,
    pub fetch_state: ActionState,
    pub delete_state: ActionState,
    pub overlay: ImageOverlay,
}

impl InventoryList {
    pub fn new(repository: PartRepository) -> Self {
        Self {
            repository,
            cache: PartListCache::default(),
            fetch_state: ActionState::Idle,
            delete_state: ActionState::Idle,
            overlay: ImageOverlay::default(),
        }
    }

    pub fn repository(&self) -> &PartRepository {
        &self.repository
    }

    pub fn parts(&self) -> &[Part] {
        self.cache.parts()
    }

    /// Fetches the full list. On failure the previous list is kept.
    pub async fn load(&mut self) -> Result<(), PartError> {
        self.fetch_state = ActionState::Loading;
        let result = self.repository.list(None).await;
        self.fetch_state.finish("fetch", &result);
        self.cache.replace_all(result?);
        Ok(())
    }

    pub async fn delete(&mut self, id: &str, confirmed: bool) -> Result<DeleteOutcome, PartError> {
        if !confirmed {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.delete_state = ActionState::Loading;
        let result = self.repository.delete(id).await;
        self.delete_state.finish("delete", &result);
        result?;
        self.cache.apply(PartDelta::Removed(id.to_string()));
        Ok(DeleteOutcome::Deleted)
    }

    /// Called with the part an edit dialog reported back.
    pub fn apply_update(&mut self, part: Part) {
        self.cache.apply(PartDelta::Replaced(part));
    }

    pub fn expand_image(&mut self, image_url: &str) {
        self.overlay.open(image_url);
    }

    pub fn overlay_event(&mut self, event: OverlayEvent) -> bool {
        self.overlay.handle(event)
    }
}
