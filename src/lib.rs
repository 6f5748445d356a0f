pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::part_repository::PartRepository;
pub use domain::error::{ErrorKind, PartError};
pub use domain::part::{ImageFile, Part, PartFilter, PartInput, PartType};
pub use infra::memory::InMemoryBackend;
