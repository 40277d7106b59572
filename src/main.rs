//! IPT Request Manager Backend
//!
//! A REST backend for the internal request-management demo: accounts, an
//! admin-managed directory of departments and employees, and a supply-request
//! approval workflow, persisted as a single JSON snapshot in SQLite.

mod api;
mod auth;
mod config;
mod db;
mod directory;
mod errors;
mod models;
mod store;
mod workflow;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::AuthService;
use config::Config;
use directory::Directory;
use store::Store;
use workflow::Workflow;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub auth: Arc<AuthService>,
    pub directory: Arc<Directory>,
    pub workflow: Arc<Workflow>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the services over a loaded store.
    pub fn new(store: Arc<Store>, config: Config) -> Self {
        let auth = Arc::new(AuthService::new(store.clone()));
        let directory = Arc::new(Directory::new(store.clone(), auth.clone()));
        let workflow = Arc::new(Workflow::new(store.clone(), auth.clone()));
        Self {
            store,
            auth,
            directory,
            workflow,
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting IPT Request Manager Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database and load (or seed) the snapshot
    let pool = db::init_database(&config.db_path).await?;
    let store = Arc::new(Store::load(db::KvStore::new(pool)).await?);

    // Create application state
    let state = AppState::new(store, config.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Auth & session
        .route("/auth/register", post(api::register))
        .route("/auth/verify", post(api::verify_email))
        .route("/auth/login", post(api::login))
        .route("/auth/logout", post(api::logout))
        .route("/auth/session", get(api::session))
        .route("/navigation/{route}", get(api::navigation))
        // Profile (self-service)
        .route("/profile", get(api::get_profile))
        .route("/profile", put(api::update_profile))
        .route("/profile/password", put(api::change_password))
        // Accounts (admin)
        .route("/accounts", get(api::list_accounts))
        .route("/accounts", post(api::create_account))
        .route("/accounts/{email}", put(api::update_account))
        .route("/accounts/{email}", delete(api::delete_account))
        .route("/accounts/{email}/password", put(api::reset_password))
        // Departments (admin)
        .route("/departments", get(api::list_departments))
        .route("/departments", post(api::create_department))
        .route("/departments/{id}", put(api::update_department))
        .route("/departments/{id}", delete(api::delete_department))
        // Employees (admin)
        .route("/employees", get(api::list_employees))
        .route("/employees/candidates", get(api::candidate_accounts))
        .route("/employees", post(api::create_employee))
        .route("/employees/{employeeId}", put(api::update_employee))
        .route("/employees/{employeeId}", delete(api::delete_employee))
        // Requests
        .route("/requests", get(api::list_my_requests))
        .route("/requests", post(api::submit_request))
        .route("/requests/all", get(api::list_all_requests))
        .route("/requests/{id}/cancel", post(api::cancel_request))
        .route("/requests/{id}/approve", post(api::approve_request))
        .route("/requests/{id}/reject", post(api::reject_request));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
