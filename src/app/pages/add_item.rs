use super::ActionState;
use crate::app::part_repository::PartRepository;
use crate::domain::error::PartError;
use crate::domain::part::{ImageFile, Part, PartForm};

/// Creation form. A selected image is required before submitting.
pub struct AddItemPage {
    repository: PartRepository,
    pub form: PartForm,
    image: Option<ImageFile>,
    progress: u8,
    pub state: ActionState,
}

impl AddItemPage {
    pub fn new(repository: PartRepository) -> Self {
        Self {
            repository,
            form: PartForm::default(),
            image: None,
            progress: 0,
            state: ActionState::Idle,
        }
    }

    /// Rejected files never replace the current selection.
    pub fn select_image(&mut self, file: ImageFile) -> Result<(), PartError> {
        file.validate()?;
        self.image = Some(file);
        Ok(())
    }

    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// On success the form is cleared; on failure every field is left as typed.
    pub async fn submit(&mut self) -> Result<Part, PartError> {
        let checked = match (self.form.is_complete(), self.image.as_ref()) {
            (true, Some(image)) => self.form.to_input().map(|input| (input, image)),
            _ => Err(PartError::validation(
                "Please fill in all fields and upload an image",
            )),
        };
        let (input, image) = match checked {
            Ok(v) => v,
            Err(e) => {
                self.state = ActionState::Error(e.clone());
                return Err(e);
            }
        };

        self.state = ActionState::Loading;
        self.progress = 0;
        let progress = &mut self.progress;
        let result = self
            .repository
            .create_with_progress(&input, image, &mut |p: u8| *progress = p)
            .await;
        self.state.finish("create", &result);

        match result {
            Ok(part) => {
                self.form = PartForm::default();
                self.image = None;
                self.progress = 0;
                Ok(part)
            }
            Err(e) => {
                self.progress = 0;
                Err(e)
            }
        }
    }
}
