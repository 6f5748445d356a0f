pub mod router;
pub mod types;
pub mod handlers {
    pub mod add_item;
    pub mod common;
    pub mod health;
    pub mod inventory;
    pub mod not_found;
    pub mod parts;
    pub mod search;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
