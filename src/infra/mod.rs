pub mod backend;
pub mod config;
pub mod memory;
pub mod postgres;
pub mod supabase;
