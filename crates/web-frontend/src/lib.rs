//! # Fleetbook Web Front End
//!
//! Server-rendered pages over the fleet API. The front end holds no records of
//! its own: every page is one or two `ApiClient` calls turned into HTML.
//!
//! Access control works in two steps. The [`session::Session`] extractor
//! decrypts the session cookie (or redirects to `/login`), and each handler
//! then asks the session for the capability its page needs.

use api_client::{ApiClient, HttpApiClient};
use axum::{
    extract::{FromRef, Path, Query},
    response::Html,
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::{cookie::Key, WithRejection};
use configuration::Settings;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod auth;
pub mod error;
pub mod forms;
pub mod password;
pub mod render;
pub mod session;
pub mod user;

use error::FrontError;

type Page = Result<Html<String>, FrontError>;
type FormBody<T> = WithRejection<Form<T>, FrontError>;
type QueryParams<T> = WithRejection<Query<T>, FrontError>;
type PathParam<T> = WithRejection<Path<T>, FrontError>;

/// Shared by all handlers: the API client and the session cookie key.
#[derive(Clone)]
pub struct FrontState {
    pub api: Arc<dyn ApiClient>,
    pub key: Key,
}

impl FromRef<FrontState> for Key {
    fn from_ref(state: &FrontState) -> Self {
        state.key.clone()
    }
}

pub fn router(api: Arc<dyn ApiClient>, key: Key) -> Router {
    let state = FrontState { api, key };

    let user_routes = Router::new()
        .route("/vessels", get(user::vessels))
        .route("/vessels/add", post(user::add_vessel))
        .route("/voyages", get(user::voyages))
        .route("/voyages/add", post(user::add_voyage))
        .route("/crew", get(user::crew))
        .route("/crew/add", post(user::add_crew_member))
        .route("/visits", get(user::visits))
        .route("/visits/add", post(user::add_visit))
        .route("/catches", get(user::catches))
        .route("/catches/add", post(user::add_catch));

    let admin_routes = Router::new()
        .route("/vessels", get(admin::vessels))
        .route("/banks", get(admin::banks))
        .route("/banks/add", post(admin::add_bank))
        .route("/reports", get(admin::reports))
        .route(
            "/reports/top_vessels_period",
            get(admin::top_vessels_period_page).post(admin::top_vessels_period),
        )
        .route("/reports/bank_avg", get(admin::bank_avg_page).post(admin::bank_avg))
        .route("/reports/above_avg/:bank_id", get(admin::above_avg))
        .route("/reports/species_bank", get(admin::species_bank_page).post(admin::species_bank));

    Router::new()
        .route("/", get(auth::index))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .nest("/user", user_routes)
        .nest("/admin", admin_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Connects to the API, prepares the cookie key and serves pages until Ctrl-C.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let api = HttpApiClient::from_settings(&settings.web)?;
    let key = session::session_key(settings.web.session_key.as_deref())?;
    let app = router(Arc::new(api), key);

    let addr = settings.web.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(api_url = %settings.web.api_url, "Web front end listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
            }
        })
        .await?;

    tracing::info!("Web front end stopped.");
    Ok(())
}
