//! Centralized configuration (environment variables + defaults).

use anyhow::Context;
use std::str::FromStr;

pub const DEFAULT_PARTS_TABLE: &str = "car_parts";
pub const DEFAULT_IMAGE_BUCKET: &str = "images";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Which remote data service the repository talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted REST table + storage bucket.
    Supabase,
    /// Direct Postgres table, images still go to the hosted bucket.
    Postgres,
    /// Process-local store, for development and tests.
    Memory,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supabase" => Ok(BackendKind::Supabase),
            "postgres" => Ok(BackendKind::Postgres),
            "memory" => Ok(BackendKind::Memory),
            other => Err(anyhow::anyhow!(
                "BACKEND must be one of supabase, postgres, memory (got '{}')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub table: String,
    pub bucket: String,
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{} must be set", name))
}

fn or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Backend selection (defaults to `supabase`).
pub fn backend_kind() -> anyhow::Result<BackendKind> {
    or_default("BACKEND", "supabase").parse()
}

/// Hosted service URL and anon key (both required).
pub fn supabase_config() -> anyhow::Result<SupabaseConfig> {
    Ok(SupabaseConfig {
        url: required("SUPABASE_URL")?.trim_end_matches('/').to_string(),
        anon_key: required("SUPABASE_ANON_KEY")?,
        table: parts_table(),
        bucket: image_bucket(),
    })
}

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> anyhow::Result<String> {
    required("DATABASE_URL")
}

pub fn parts_table() -> String {
    or_default("PARTS_TABLE", DEFAULT_PARTS_TABLE)
}

pub fn image_bucket() -> String {
    or_default("IMAGE_BUCKET", DEFAULT_IMAGE_BUCKET)
}

pub fn bind_addr() -> String {
    or_default("BIND_ADDR", DEFAULT_BIND_ADDR)
}
