//! # Configurator Server
//!
//! HTTP/JSON backend of the browser bellows configurator.
//!
//! ## Module Organization
//! ```text
//! configurator_server/
//! ├── lib.rs          ◄─── You are here (router, startup, shutdown)
//! ├── config.rs       ◄─── Layered ServerConfig
//! ├── error.rs        ◄─── ApiError returned by every handler
//! ├── auth.rs         ◄─── JWT admin sessions + AdminSession extractor
//! ├── storage.rs      ◄─── Image bucket on disk
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── catalog.rs  ◄─── Catalog snapshot
//! │   └── sessions.rs ◄─── Per-tab configurator sessions, busy flag
//! └── commands/       ◄─── Handlers, one file per area
//! ```
//!
//! ## Routes
//! ```text
//! GET    /api/health
//! GET    /api/bootstrap
//! GET    /api/catalog
//! POST   /api/sessions
//! GET    /api/sessions/{id}              DELETE /api/sessions/{id}
//! POST   /api/sessions/{id}/events
//! POST   /api/sessions/{id}/quote
//! POST   /api/sessions/{id}/document
//! POST   /api/auth/sign-in    GET /api/auth/session    POST /api/auth/sign-out
//! GET    /api/admin/parts     POST /api/admin/parts
//! PUT    /api/admin/parts/{part_number}  DELETE /api/admin/parts/{part_number}
//! POST   /api/admin/import
//! POST   /api/admin/images
//! GET    /api/admin/diagnostics
//! GET    /images/{*key}
//! ```

pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use bellows_core::CatalogOptions;
use bellows_db::{Database, DbConfig};

use crate::commands::{admin, auth as auth_commands, catalog, configurator, health, images};
use crate::config::ServerConfig;
use crate::state::AppState;

/// Upper bound for a product image upload.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Builds the full router over a prepared state.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .route("/bootstrap", get(catalog::bootstrap))
        .route("/catalog", get(catalog::list_catalog))
        // Configurator sessions
        .route("/sessions", post(configurator::create_session))
        .route(
            "/sessions/{id}",
            get(configurator::get_session).delete(configurator::close_session),
        )
        .route("/sessions/{id}/events", post(configurator::apply_event))
        .route("/sessions/{id}/quote", post(configurator::submit_quote))
        .route("/sessions/{id}/document", post(configurator::export_document))
        // Admin authentication
        .route("/auth/sign-in", post(auth_commands::sign_in))
        .route("/auth/session", get(auth_commands::get_session))
        .route("/auth/sign-out", post(auth_commands::sign_out))
        // Catalog maintenance
        .route("/admin/parts", get(admin::list_parts).post(admin::create_part))
        .route(
            "/admin/parts/{part_number}",
            put(admin::update_part).delete(admin::delete_part),
        )
        .route("/admin/import", post(admin::import_catalog))
        .route(
            "/admin/images",
            post(admin::upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .route("/admin/diagnostics", get(admin::diagnostics));

    Router::new()
        .nest("/api", api)
        .route("/images/{*key}", get(images::get_image))
        .with_state(state)
}

/// Runs the server until SIGINT/SIGTERM.
///
/// ## Startup Sequence
/// ```text
/// 1. Logging         EnvFilter, RUST_LOG overrides the default
/// 2. Configuration   defaults → configurator.toml → BELLOWS_*
/// 3. Database        SQLite (WAL), pending migrations applied
/// 4. State           notifier, renderer, image bucket, sessions, JWT
/// 5. Catalog         initial snapshot (empty is allowed)
/// 6. Serve           axum with graceful shutdown
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Bellows configurator server");

    let config = ServerConfig::load()?;
    info!(
        address = %config.listen_address(),
        database = %config.database_path.display(),
        quote_endpoint = %config.quote_endpoint,
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(config.database_path.clone())).await?;
    info!("Database connected and migrations applied");

    let listen_address = config.listen_address();
    let state = AppState::new(config, db.clone(), CatalogOptions::default())?;

    let parts = state.catalog.refresh(&state.db).await;
    if parts == 0 {
        warn!("Catalog is empty; seed the database or import from the admin dashboard");
    }

    let listener = TcpListener::bind(&listen_address).await?;
    info!(address = %listen_address, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bellows=trace` - Show trace for bellows crates only
/// - Default: `info,bellows=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bellows=debug,configurator_server=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

// =============================================================================
// End-to-End Tests
// =============================================================================
