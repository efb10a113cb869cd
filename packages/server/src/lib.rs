#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the HSO dashboard.
//!
//! Exposes the dashboard views as a JSON API: incident analytics, the
//! landing summary, department queues, announcements, programs, and the
//! persisted dashboard settings. Data comes from the hosted backend, or
//! from an in-memory backend when `HSO_DEMO=1`.

pub mod demo;
mod handlers;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, middleware, web};
use chrono::{Datelike, Local};
use hso_dashboard::settings::{SettingsError, SettingsStore};
use hso_database::{AccountRepository, BulletinRepository, DbError, IncidentRepository, RestBackend};
use hso_server_models::ApiErrorBody;

/// Default location of the persisted settings file.
pub const DEFAULT_SETTINGS_PATH: &str = "data/settings.toml";

/// Shared application state.
pub struct AppState {
    /// Incident reads and updates.
    pub incidents: Arc<dyn IncidentRepository>,
    /// Announcements and programs.
    pub bulletins: Arc<dyn BulletinRepository>,
    /// Account statistics.
    pub accounts: Arc<dyn AccountRepository>,
    /// Persisted dashboard settings.
    pub settings: Mutex<SettingsStore>,
}

impl AppState {
    /// Builds state backed by a single backend implementing every
    /// repository.
    pub fn new<B>(backend: Arc<B>, settings: SettingsStore) -> Self
    where
        B: IncidentRepository + BulletinRepository + AccountRepository + 'static,
    {
        Self {
            incidents: backend.clone(),
            bulletins: backend.clone(),
            accounts: backend,
            settings: Mutex::new(settings),
        }
    }

    /// Locks the settings store, ignoring poisoning.
    pub fn settings(&self) -> MutexGuard<'_, SettingsStore> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Errors returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Backend call failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Settings could not be saved.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Request parameters were invalid.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Description of what was wrong.
        message: String,
    },

    /// A view's data could not be fetched.
    #[error("Backend unavailable: {message}")]
    Unavailable {
        /// Why the fetch failed.
        message: String,
    },

    /// Path named an office that does not exist.
    #[error("Unknown office: {office}")]
    UnknownOffice {
        /// The office as given.
        office: String,
    },
}

impl ApiError {
    /// Shorthand for [`ApiError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Db(DbError::NotFound { .. }) | Self::UnknownOffice { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::Db(DbError::Validation { .. }) | Self::BadRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Db(DbError::Config { .. }) | Self::Settings(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Db(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        }
        HttpResponse::build(status).json(ApiErrorBody {
            error: self.to_string(),
        })
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/analytics/monthly", web::get().to(handlers::monthly_analytics))
            .route("/dashboard/summary", web::get().to(handlers::dashboard_summary))
            .route("/incidents", web::get().to(handlers::incidents))
            .route("/incidents/{id}", web::patch().to(handlers::update_incident))
            .route("/incidents/{id}/assign", web::post().to(handlers::assign_incident))
            .route("/queue/{office}", web::get().to(handlers::queue))
            .route(
                "/queue/{office}/{id}/forward",
                web::post().to(handlers::forward_incident),
            )
            .route("/announcements", web::get().to(handlers::announcements))
            .route("/announcements", web::post().to(handlers::create_announcement))
            .route("/programs", web::get().to(handlers::programs))
            .route("/settings", web::get().to(handlers::get_settings))
            .route("/settings", web::put().to(handlers::put_settings)),
    );
}

/// Builds the shared state from the environment.
///
/// `HSO_DEMO=1` selects the in-memory backend; otherwise the hosted
/// backend is configured from `HSO_BACKEND_*`. Settings are loaded from
/// `HSO_SETTINGS_PATH`.
///
/// # Errors
///
/// Returns [`ApiError`] if the backend configuration is incomplete or the
/// settings file cannot be read.
pub fn state_from_env() -> Result<AppState, ApiError> {
    let settings_path = std::env::var("HSO_SETTINGS_PATH")
        .map_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH), PathBuf::from);
    log::info!("Loading settings from {}...", settings_path.display());
    let settings = SettingsStore::load(settings_path)?;

    let demo = std::env::var("HSO_DEMO").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    if demo {
        log::info!("Demo mode: serving sample data from the in-memory backend");
        let backend = demo::demo_backend(Local::now().year());
        Ok(AppState::new(Arc::new(backend), settings))
    } else {
        log::info!("Connecting to hosted backend...");
        Ok(AppState::new(Arc::new(RestBackend::from_env()?), settings))
    }
}

/// Starts the HSO dashboard API server.
///
/// Initializes logging, builds the shared state from the environment, and
/// serves the API on `BIND_ADDR:PORT` (default `127.0.0.1:8080`). The
/// caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the state cannot be built, or the
/// HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let state = web::Data::new(state_from_env().map_err(|e| {
        log::error!("Failed to start: {e}");
        std::io::Error::other(e.to_string())
    })?);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
