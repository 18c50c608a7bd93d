mod api;
mod middleware;
mod render;
mod search;
#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Duration;

use leadgen_scraper::{Locale, OutscraperClient, PollPolicy, SearchProvider};
use leadgen_store::LeadStore;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    search::{SearchOrchestrator, SearchSettings},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = leadgen_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = OutscraperClient::with_base_url(
        &config.outscraper_api_key,
        config.request_timeout_secs,
        &config.provider_base_url,
    )?
    .with_retry_policy(config.max_retries, config.retry_backoff_base_ms);
    let provider: Arc<dyn SearchProvider> = Arc::new(client);

    let store = Arc::new(LeadStore::new(config.leads_path.clone()));
    let settings = SearchSettings {
        locale: Locale {
            language: config.language.clone(),
            region: config.region.clone(),
        },
        poll: PollPolicy {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_attempts: config.poll_max_attempts,
        },
        flags: config.flag_mode,
    };
    let orchestrator = Arc::new(SearchOrchestrator::new(
        provider,
        Arc::clone(&store),
        settings,
    ));

    let app = build_app(AppState {
        store,
        orchestrator,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        env = %config.env,
        addr = %config.bind_addr,
        leads_path = %config.leads_path.display(),
        "leadgen server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
