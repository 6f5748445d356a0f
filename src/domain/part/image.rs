//! Image selection rules and storage path generation.

use crate::domain::error::PartError;
use chrono::Utc;
use rand::Rng;

/// 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Prefix under which all part images live in the bucket.
pub const IMAGE_FOLDER: &str = "car-parts";

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A file the user picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Size first, then MIME type.
    pub fn validate(&self) -> Result<(), PartError> {
        if self.size() > MAX_IMAGE_BYTES {
            return Err(PartError::validation("Image size must be less than 5MB"));
        }
        if !self.content_type.starts_with("image/") {
            return Err(PartError::validation("Please select a valid image file"));
        }
        Ok(())
    }

    /// Text after the last `.`; the whole name when there is none.
    pub fn extension(&self) -> &str {
        self.file_name.rsplit('.').next().unwrap_or("")
    }

    /// A fresh `car-parts/{millis}-{suffix}.{ext}` path.
    pub fn generate_storage_path(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..6)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        storage_path(Utc::now().timestamp_millis(), &suffix, self.extension())
    }
}

pub fn storage_path(unix_millis: i64, suffix: &str, extension: &str) -> String {
    format!("{}/{}-{}.{}", IMAGE_FOLDER, unix_millis, suffix, extension)
}
