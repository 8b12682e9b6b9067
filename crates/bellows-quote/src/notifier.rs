//! # Quote Notifier
//!
//! Posts a [`QuotePayload`] to the mail relay endpoint.
//!
//! ## Outcome Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  contact name/e-mail blank   → Err(Validation), no request is made     │
//! │  request sent, any status    → delivered                               │
//! │  transport failure           → not delivered, warning for the user;    │
//! │                                still a success so the export proceeds  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::QuoteResult;
use bellows_core::{ConfigurationDisplay, QuotePayload, DEFAULT_LEAD_SOURCE};

/// Shown to the user when the relay is unreachable.
pub const TRANSPORT_WARNING: &str =
    "Communication error: Could not sync with our mail server, but we will still generate your PDF.";

/// Where quote notifications go and how they are labelled.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub endpoint: Url,
    pub recipient: String,
    pub lead_source: String,
    pub timeout: Duration,
}

impl NotifierConfig {
    pub fn new(endpoint: Url, recipient: impl Into<String>) -> Self {
        NotifierConfig {
            endpoint,
            recipient: recipient.into(),
            lead_source: DEFAULT_LEAD_SOURCE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn lead_source(mut self, lead_source: impl Into<String>) -> Self {
        self.lead_source = lead_source.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Result of a submission that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    /// Always true once validation passed.
    pub success: bool,
    /// Whether the relay actually received the request.
    pub delivered: bool,
    pub warning: Option<String>,
}

/// HTTP client for the quote mail relay.
#[derive(Debug, Clone)]
pub struct QuoteNotifier {
    client: reqwest::Client,
    config: NotifierConfig,
}

impl QuoteNotifier {
    pub fn new(config: NotifierConfig) -> QuoteResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(QuoteNotifier { client, config })
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Builds the payload without sending it.
    pub fn payload(
        &self,
        display: &ConfigurationDisplay,
        now: DateTime<Utc>,
    ) -> QuoteResult<QuotePayload> {
        let payload = QuotePayload::build(
            display,
            &self.config.recipient,
            &self.config.lead_source,
            now,
        )?;
        Ok(payload)
    }

    /// Validates, then posts the quote.
    ///
    /// ## Returns
    /// * `Ok(outcome)` - validation passed; see [`SubmissionOutcome::delivered`]
    /// * `Err(QuoteError::Validation)` - rejected locally, nothing sent
    pub async fn submit(
        &self,
        display: &ConfigurationDisplay,
        now: DateTime<Utc>,
    ) -> QuoteResult<SubmissionOutcome> {
        let payload = self.payload(display, now)?;

        debug!(
            endpoint = %self.config.endpoint,
            part_number = %payload.part_number,
            "Posting quote notification"
        );

        match self.post(&payload).await {
            Ok(status) => {
                if status.is_success() {
                    info!(part_number = %payload.part_number, "Quote notification delivered");
                } else {
                    // The relay answered; its verdict is not ours to surface.
                    warn!(status = %status, "Quote relay answered with a non-success status");
                }
                Ok(SubmissionOutcome {
                    success: true,
                    delivered: true,
                    warning: None,
                })
            }
            Err(e) => {
                warn!(error = %e, "Quote notification failed, continuing without it");
                Ok(SubmissionOutcome {
                    success: true,
                    delivered: false,
                    warning: Some(TRANSPORT_WARNING.to_string()),
                })
            }
        }
    }

    async fn post(&self, payload: &QuotePayload) -> QuoteResult<reqwest::StatusCode> {
        let response = self
            .client
            .post(self.config.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        Ok(response.status())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use axum::{extract::State, http::HeaderMap as AxumHeaders, routing::post, Json, Router};
    use bellows_core::{CatalogOptions, Configuration, ContactDetails};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    async fn capture(
        State(store): State<Captured>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> &'static str {
        let accept = headers
            .get("accept")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        store.lock().unwrap().push((accept, body));
        "{}"
    }

    async fn spawn_relay() -> (Url, Captured) {
        let store: Captured = Arc::default();
        let app = Router::new()
            .route("/", post(capture))
            .with_state(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (Url::parse(&format!("http://{addr}/")).unwrap(), store)
    }

    fn display(name: &str, email: &str) -> ConfigurationDisplay {
        let mut config = Configuration::new(&CatalogOptions::default());
        config.selected_part = Some("104-020-0001".to_string());
        config.contact = ContactDetails {
            name: name.to_string(),
            email: email.to_string(),
            ..ContactDetails::default()
        };
        ConfigurationDisplay::from_configuration(&config)
    }

    #[tokio::test]
    async fn test_submit_posts_fixed_payload() {
        let (endpoint, store) = spawn_relay().await;
        let notifier =
            QuoteNotifier::new(NotifierConfig::new(endpoint, "sales@example.com")).unwrap();

        let outcome = notifier
            .submit(&display("Ada", "ada@example.com"), Utc::now())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SubmissionOutcome {
                success: true,
                delivered: true,
                warning: None
            }
        );

        let captured = store.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let (accept, body) = &captured[0];
        assert_eq!(accept.as_deref(), Some("application/json"));
        assert_eq!(
            body["_subject"],
            "New Configurator Inquiry: 104-020-0001 from Ada"
        );
        assert_eq!(body["recipient"], "sales@example.com");
        assert_eq!(body["Lead_Source"], DEFAULT_LEAD_SOURCE);
        assert_eq!(body["Axial_Movement"], "None");
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_without_request() {
        let (endpoint, store) = spawn_relay().await;
        let notifier =
            QuoteNotifier::new(NotifierConfig::new(endpoint, "sales@example.com")).unwrap();

        let err = notifier
            .submit(&display("  ", "ada@example.com"), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Validation(_)));
        assert!(store.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_still_succeeds_with_warning() {
        let endpoint = Url::parse("http://127.0.0.1:9/").unwrap();
        let notifier = QuoteNotifier::new(
            NotifierConfig::new(endpoint, "sales@example.com").timeout(Duration::from_secs(2)),
        )
        .unwrap();

        let outcome = notifier
            .submit(&display("Ada", "ada@example.com"), Utc::now())
            .await
            .unwrap();
        assert!(outcome.success);
        assert!(!outcome.delivered);
        assert_eq!(outcome.warning.as_deref(), Some(TRANSPORT_WARNING));
    }
}
