use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use configuration::Settings;
use database::FleetStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod reports;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FleetStore>,
}

/// Builds the API router around an already-opened store.
pub fn router(store: Arc<dyn FleetStore>) -> Router {
    let app_state = Arc::new(AppState { store });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route("/users/:username", get(handlers::get_user))
        .route("/vessels", get(handlers::list_vessels).post(handlers::create_vessel))
        .route("/vessels/:id", get(handlers::get_vessel))
        .route("/voyages", get(handlers::list_voyages).post(handlers::create_voyage))
        .route("/voyages/:id", get(handlers::get_voyage))
        .route("/crew-members", get(handlers::list_crew_members).post(handlers::create_crew_member))
        .route("/crew-members/:id", get(handlers::get_crew_member))
        .route("/banks", get(handlers::list_banks).post(handlers::create_bank))
        .route("/banks/:id", get(handlers::get_bank))
        .route("/visits", get(handlers::list_visits).post(handlers::create_visit))
        .route("/visits/:id", get(handlers::get_visit))
        .route("/catches", get(handlers::list_catches).post(handlers::create_catch))
        .route("/catches/:id", get(handlers::get_catch))
        .route("/reports/top-vessels", get(reports::top_vessels))
        .route("/reports/avg-catch-per-bank", get(reports::avg_catch_per_bank))
        .route("/reports/above-average/:bank_id", get(reports::above_average))
        .route("/reports/species-bank", get(reports::species_by_bank))
        .with_state(app_state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // Records are small; 1MB is plenty.
}

/// Opens the configured store and serves the API until Ctrl-C.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let store = database::open_store(&settings.database).await?;
    serve(settings.api.bind_addr, store).await
}

pub async fn serve(addr: SocketAddr, store: Arc<dyn FleetStore>) -> anyhow::Result<()> {
    let app = router(store);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
    }
}
