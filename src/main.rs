use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use asklio_client::api::HttpApi;
use asklio_client::commands::dashboard;
use asklio_client::models::Settings;
use asklio_client::services::state::AppState;
use asklio_client::store::Store;
use asklio_client::utils::format_decimal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings {
        api_base: std::env::var("ASKLIO_API_BASE")
            .unwrap_or_else(|_| Settings::default().api_base),
    };
    info!(api_base = %settings.api_base, "starting asklio client");

    let api = Arc::new(HttpApi::new(settings.api_base.clone()));
    let store = Arc::new(Store::new());
    let state = AppState::new(api, store, settings);

    state.load_commodity_groups().await?;
    state.refresh_requests().await?;

    let snapshot = state.store.snapshot();
    println!("Procurement requests: {}", snapshot.requests.len());
    if let Some(latest) = snapshot.requests.first() {
        println!(
            "Latest: #{} {} | {} | EUR {} | {}",
            latest.id,
            latest.title,
            latest.vendor_name,
            format_decimal(latest.total_cost),
            latest.current_status
        );
    }

    let stats = dashboard::get_dashboard_stats(&state);
    println!(
        "Open: {}  In Progress: {}  Closed: {}  Total spend: EUR {}",
        stats.open_count,
        stats.in_progress_count,
        stats.closed_count,
        format_decimal(stats.total_cost)
    );
    for group in stats.spend_by_group.iter().take(5) {
        println!(
            "  {} {} EUR {}",
            group.group_id,
            group.group_name,
            format_decimal(group.total)
        );
    }

    state.shutdown();
    Ok(())
}
