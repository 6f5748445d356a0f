use autoparts_inventory::infra::backend::connect_repository;
use autoparts_inventory::infra::config::{self, BackendKind};
use tracing::{info, warn};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--list]\n\
         \n\
         Reads env vars:\n\
           BACKEND (supabase | postgres | memory, default supabase)\n\
           SUPABASE_URL, SUPABASE_ANON_KEY (supabase, postgres)\n\
           DATABASE_URL (postgres)\n\
           PARTS_TABLE (default car_parts), IMAGE_BUCKET (default images)\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let show_counts = args.iter().any(|a| a == "--list");

    // Force-read config (nice error messages if missing)
    let backend = config::backend_kind()?;
    info!(?backend, table = %config::parts_table(), bucket = %config::image_bucket(), "preflight");
    match backend {
        BackendKind::Supabase => {
            let sb = config::supabase_config()?;
            info!(url = %sb.url, "hosted service configured");
        }
        BackendKind::Postgres => {
            let _ = config::database_url()?;
            let sb = config::supabase_config()?;
            info!(storage_url = %sb.url, "direct database with hosted storage");
        }
        BackendKind::Memory => {
            warn!("memory backend: nothing persists past process exit");
        }
    }

    let repository = connect_repository(backend).await?;
    repository
        .ping()
        .await
        .map_err(|e| anyhow::anyhow!("Remote store not reachable: {}", e))?;
    info!("remote store reachable");

    if show_counts {
        let parts = repository
            .list(None)
            .await
            .map_err(|e| anyhow::anyhow!("Listing parts failed: {}", e))?;
        let summary = autoparts_inventory::domain::part::CategorySummary::of(&parts);
        info!(
            total = summary.total,
            dash_kits = summary.dash_kits,
            wiring_harnesses = summary.wiring_harnesses,
            headlights = summary.headlights,
            "inventory"
        );
    }

    info!("preflight OK");
    Ok(())
}
