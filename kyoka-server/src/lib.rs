//! kyoka - patient registry and treatment-authorization server
//!
//! HTTP boundary over the kyoka services.

pub mod config;
pub mod error;
pub mod handlers;

use axum::{
    http::Method,
    routing::{get, patch, post},
    Router,
};
use kyoka_core::{
    AuthorizationRepository, AuthorizationService, PatientRepository, PatientService,
};
use kyoka_store::{RedbStore, SqliteStore, StoreError};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use config::{ServerConfig, StorageBackend};

/// Application state
pub struct AppState {
    pub patients: PatientService,
    pub authorizations: AuthorizationService,
    pub config: ServerConfig,
}

impl AppState {
    /// Open the configured store and wire it into the services.
    ///
    /// The store stays open for as long as the state (or a clone of a
    /// service) is alive.
    pub fn open(config: ServerConfig) -> Result<Self, StoreError> {
        let path = config.database_path();

        let (patients, authorizations) = match config.storage.backend {
            StorageBackend::Sqlite => shared(SqliteStore::open(&path)?),
            StorageBackend::Redb => shared(RedbStore::open(&path)?),
        };

        tracing::info!(
            backend = config.storage.backend.as_str(),
            path = %path.display(),
            "Store opened"
        );

        Ok(Self {
            patients: PatientService::new(patients.clone()),
            authorizations: AuthorizationService::new(patients, authorizations),
            config,
        })
    }
}

/// Hand one store to both repository seams
fn shared<S>(store: S) -> (Arc<dyn PatientRepository>, Arc<dyn AuthorizationRepository>)
where
    S: PatientRepository + AuthorizationRepository + 'static,
{
    let store = Arc::new(store);
    (store.clone(), store)
}

/// Build the application router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Patients
        .route("/api/patients", get(handlers::patients::list))
        .route("/api/patients/{id}", get(handlers::patients::read))
        .route("/api/patientdetails", post(handlers::patients::create))
        // Authorization requests
        .route("/api/authorization", post(handlers::authorizations::create))
        .route("/api/authorizations", get(handlers::authorizations::list))
        .route(
            "/api/authorizations/{id}/approve",
            patch(handlers::authorizations::approve),
        )
        .route(
            "/api/authorizations/{id}/reject",
            patch(handlers::authorizations::reject),
        )
        // Middleware
        .layer(RequestBodyLimitLayer::new(state.config.server.body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
