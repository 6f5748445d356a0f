use super::ActionState;
use crate::app::part_repository::PartRepository;
use crate::domain::error::PartError;
use crate::domain::part::{ImageFile, Part, PartForm};

/// Edit form seeded from an existing part. Submitting without a new image keeps the old one.
pub struct EditDialog {
    repository: PartRepository,
    original: Part,
    pub form: PartForm,
    image: Option<ImageFile>,
    progress: u8,
    pub state: ActionState,
}

impl EditDialog {
    pub fn open(repository: PartRepository, part: Part) -> Self {
        Self {
            repository,
            form: PartForm::from_part(&part),
            original: part,
            image: None,
            progress: 0,
            state: ActionState::Idle,
        }
    }

    pub fn has_new_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn select_image(&mut self, file: ImageFile) -> Result<(), PartError> {
        file.validate()?;
        self.image = Some(file);
        Ok(())
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Persists the edit and returns the stored part for the caller to merge into its list.
    pub async fn submit(&mut self) -> Result<Part, PartError> {
        let input = match self.form.to_input() {
            Ok(input) => input,
            Err(e) => {
                self.state = ActionState::Error(e.clone());
                return Err(e);
            }
        };

        self.state = ActionState::Loading;
        let progress = &mut self.progress;
        let result = self
            .repository
            .update_with_progress(
                &self.original.id,
                &input,
                self.image.as_ref(),
                &mut |p: u8| *progress = p,
            )
            .await;
        self.progress = 0;
        self.state.finish("update", &result);
        let updated = result?;
        self.original = updated.clone();
        self.image = None;
        Ok(updated)
    }

    /// Discards every change; nothing is sent.
    pub fn cancel(self) -> Part {
        self.original
    }
}
