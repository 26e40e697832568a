use std::env;
use std::sync::Arc;

use chrono::Utc;
use dotenvy::dotenv;
use tracing::{error, info};

// Internal Crates
use alerting::boundary::AlertSchedule;
use alerting::grouping::group_by_end_time;
use alerting::ports::{CatalogPort, DeliveryPort};
use alerting::AlertEngine;
use delivery::DiscordNotifier;
use preorder_core::ChannelSubscription;

mod catalog;
mod config;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    info!("🚀 Preorder alert bot starting [Composition Root]...");

    // Unified configuration layer, validated before anything touches the
    // network (Fail Fast).
    let config = match config::BotConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ CRITICAL: Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let token = match config::load_token(&config.token_file) {
        Ok(token) => token,
        Err(e) => {
            error!("❌ {e}");
            std::process::exit(1);
        }
    };

    let subscriptions = match config::load_subscriptions(&config.channels_file) {
        Ok(subs) => subs,
        Err(e) => {
            error!("❌ {e}");
            std::process::exit(1);
        }
    };

    let schedule = match config.schedule() {
        Ok(schedule) => schedule,
        Err(e) => {
            error!("❌ {e}");
            std::process::exit(1);
        }
    };

    info!(
        "✅ Config Loaded & Validated: catalog={}, subscriptions={}, page_size={}",
        config.catalog_url,
        subscriptions.len(),
        config.page_size
    );

    if let Err(e) = run(&config, token, &subscriptions, schedule).await {
        error!("❌ Run failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(
    config: &config::BotConfig,
    token: String,
    subscriptions: &[ChannelSubscription],
    schedule: AlertSchedule,
) -> anyhow::Result<()> {
    info!("Fetching pre-order items...");
    let catalog = catalog::StoreCatalog::new(&config.catalog_url);
    let items = catalog.fetch_items(true).await?;

    let notifier: Arc<dyn DeliveryPort> = Arc::new(DiscordNotifier::new(token));
    let identity = notifier.ready().await?;
    info!("🔑 Logged in as {identity}");

    // One snapshot for the whole pass, so every channel alerts on the same
    // view of time even if dispatch spans several seconds.
    let now = Utc::now();
    let groups = group_by_end_time(&items);
    info!(
        items = items.len(),
        groups = groups.len(),
        "deadline groups built"
    );

    let engine = AlertEngine::new(notifier, schedule, config.page_size);
    let report = engine.dispatch(subscriptions, &groups, now).await;

    info!(
        "👋 Done: {} message(s) sent, {} channel(s) skipped, {} delivery error(s)",
        report.messages_sent, report.channels_skipped, report.delivery_errors
    );
    Ok(())
}
