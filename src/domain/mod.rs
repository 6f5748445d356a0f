//! Inventory domain: the part record, its validation rules and list filters.

pub mod error;
pub mod part;

pub use error::{ErrorKind, PartError};
pub use part::{Part, PartForm, PartInput, PartRow, PartType};
