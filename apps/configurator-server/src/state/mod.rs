//! # State Module
//!
//! Shared state handed to every handler.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  AppState (Clone, every field cheap to clone)                          │
//! │  ├── config     Arc<ServerConfig>      read-only after startup         │
//! │  ├── db         Database               pool is internally thread-safe  │
//! │  ├── catalog    Arc<CatalogState>      RwLock<Arc<Vec<Part>>>          │
//! │  ├── sessions   Arc<SessionStore>      Mutex<HashMap<Uuid, Session>>   │
//! │  ├── jwt        Arc<JwtManager>        revocation list behind a Mutex  │
//! │  ├── notifier   QuoteNotifier          reqwest client                  │
//! │  ├── renderer   DocumentRenderer       reqwest client + logo URL       │
//! │  └── images     ImageStore             directory + public URL prefix   │
//! │                                                                         │
//! │  Extractors pull only what they need via FromRef                       │
//! │  (e.g. AdminSession needs Arc<JwtManager>).                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod sessions;

pub use catalog::CatalogState;
pub use sessions::{ConfiguratorSession, SessionStore, SubmissionGuard};

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;

use bellows_core::CatalogOptions;
use bellows_db::Database;
use bellows_quote::{AssetLoader, DocumentRenderer, NotifierConfig, QuoteNotifier, QuoteResult};

use crate::auth::JwtManager;
use crate::config::ServerConfig;
use crate::storage::ImageStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub db: Database,
    pub options: Arc<CatalogOptions>,
    pub catalog: Arc<CatalogState>,
    pub sessions: Arc<SessionStore>,
    pub jwt: Arc<JwtManager>,
    pub notifier: QuoteNotifier,
    pub renderer: DocumentRenderer,
    pub images: ImageStore,
}

impl AppState {
    /// Wires the collaborators together. The catalog starts empty; call
    /// [`CatalogState::refresh`] before serving.
    pub fn new(config: ServerConfig, db: Database, options: CatalogOptions) -> QuoteResult<Self> {
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let notifier = QuoteNotifier::new(
            NotifierConfig::new(config.quote_endpoint.clone(), config.quote_recipient.clone())
                .lead_source(config.lead_source.clone())
                .timeout(timeout),
        )?;
        let renderer = DocumentRenderer::new(
            AssetLoader::new(timeout)?.local_root(config.image_dir.clone()),
            config.logo_url.clone(),
        );
        let images = ImageStore::new(
            config.image_dir.clone(),
            config.public_image_base_url.clone(),
        );
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.session_lifetime_secs);

        Ok(AppState {
            sessions: Arc::new(SessionStore::new(options.clone())),
            options: Arc::new(options),
            catalog: Arc::new(CatalogState::new()),
            jwt: Arc::new(jwt),
            config: Arc::new(config),
            db,
            notifier,
            renderer,
            images,
        })
    }
}

impl FromRef<AppState> for Arc<JwtManager> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.jwt)
    }
}
