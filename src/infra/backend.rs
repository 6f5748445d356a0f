//! Builds the repository from configuration. The only place that picks concrete clients.

use crate::app::part_repository::PartRepository;
use crate::infra::config::{self, BackendKind};
use crate::infra::memory::InMemoryBackend;
use crate::infra::postgres::PgPartTable;
use crate::infra::supabase::SupabaseClient;
use std::sync::Arc;

pub async fn connect_repository(kind: BackendKind) -> anyhow::Result<PartRepository> {
    match kind {
        BackendKind::Supabase => {
            let client = Arc::new(SupabaseClient::new(&config::supabase_config()?)?);
            Ok(PartRepository::new(client.clone(), client))
        }
        BackendKind::Postgres => {
            let table = PgPartTable::connect(&config::database_url()?, &config::parts_table()).await?;
            let storage = SupabaseClient::new(&config::supabase_config()?)?;
            Ok(PartRepository::new(Arc::new(table), Arc::new(storage)))
        }
        BackendKind::Memory => {
            let backend = Arc::new(InMemoryBackend::default());
            Ok(PartRepository::new(backend.clone(), backend))
        }
    }
}
