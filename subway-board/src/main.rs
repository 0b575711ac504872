use std::sync::Arc;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use subway_board::config::AppConfig;
use subway_board::kakao::{ArrivalSource, KakaoClient, KakaoConfig};
use subway_board::refresh::{RefreshManager, RefreshOutcome};
use subway_board::sensor::StationSensor;
use subway_board::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,subway_board=debug")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");
    info!(
        station = %config.station_id,
        name = %config.station_name,
        poll_secs = config.poll_interval.as_secs(),
        "loaded configuration"
    );

    // Create Kakao client
    let mut kakao_config = KakaoConfig::new().with_timeout(config.fetch_timeout.as_secs());
    if let Some(base_url) = &config.base_url {
        kakao_config = kakao_config.with_base_url(base_url);
    }
    let client = KakaoClient::new(kakao_config).expect("Failed to create Kakao client");

    let manager = Arc::new(
        RefreshManager::new(config.station_id.clone(), client).with_config(config.refresh_config()),
    );

    // Setup is not complete until the first refresh succeeds
    tokio::select! {
        _ = wait_until_ready(&manager, &config) => {}
        _ = shutdown_signal() => {
            info!("shutdown requested before first data");
            return;
        }
    }

    // Background refresh on a fixed period
    let poller = tokio::spawn({
        let manager = Arc::clone(&manager);
        let period = config.poll_interval;
        async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                // Failures are logged and recorded by the manager
                if let Ok(RefreshOutcome::Throttled(_)) = manager.refresh().await {
                    debug!("scheduled refresh skipped by throttle");
                }
            }
        }
    });

    let sensor = StationSensor::new(&config.station_name, manager.station().clone(), manager.store())
        .with_ranks(config.ranks);
    let app = create_router(AppState::new(manager.store(), sensor));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!(addr = %config.bind_addr, "serving /health, /api/snapshot, /api/sensor, /api/arrivals/{{direction}}/{{rank}}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    poller.abort();
    info!("stopped");
}

/// Refresh until the store holds data, pausing between failed attempts.
async fn wait_until_ready<S: ArrivalSource>(manager: &RefreshManager<S>, config: &AppConfig) {
    loop {
        // Errors are already recorded by the manager; readiness is what matters here.
        let _ = manager.refresh().await;
        if manager.store().is_ready().await {
            info!("initial data loaded");
            return;
        }
        warn!(
            retry_secs = config.setup_retry.as_secs(),
            "station not ready; retrying"
        );
        tokio::time::sleep(config.setup_retry).await;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
