//! Admin session tokens.
//!
//! Signing in issues a signed JWT; the bearer token *is* the session.
//! Signing out records the token id as revoked until the token expires.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use bellows_db::AdminUser;

use crate::error::{ApiError, ApiResult};

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin id)
    pub sub: String,

    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID, the handle used for revocation
    pub jti: String,
}

/// Issues, validates and revokes admin session tokens.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
    /// jti -> exp of every signed-out token that has not yet expired.
    revoked: Mutex<HashMap<String, i64>>,
}

impl JwtManager {
    pub fn new(secret: impl Into<String>, lifetime_secs: i64) -> Self {
        JwtManager {
            secret: secret.into(),
            lifetime_secs,
            revoked: Mutex::new(HashMap::new()),
        }
    }

    /// Generates a session token for a verified admin.
    pub fn issue(&self, admin: &AdminUser) -> ApiResult<(String, Claims)> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: admin.id.clone(),
            email: admin.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::internal(format!("Failed to generate token: {}", e)))?;

        Ok((token, claims))
    }

    /// Decodes a token and rejects it if it was signed out.
    pub fn validate(&self, token: &str) -> ApiResult<Claims> {
        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;
        if self.is_revoked(&claims.jti) {
            return Err(ApiError::unauthorized("Session has been signed out"));
        }

        Ok(claims)
    }

    /// Revokes a session. Expired entries are pruned on the way.
    pub fn revoke(&self, claims: &Claims) {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.lock().unwrap_or_else(|e| e.into_inner());
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti.clone(), claims.exp);
        debug!(admin = %claims.email, revoked = revoked.len(), "Admin session revoked");
    }

    fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(jti)
    }
}

/// Extracts the bearer token from the `Authorization` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Claims of a validated admin session, a handler argument for admin routes.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Claims);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Arc<JwtManager>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jwt = Arc::<JwtManager>::from_ref(state);
        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Admin sign-in required"))?;

        Ok(AdminSession(jwt.validate(token)?))
    }
}
