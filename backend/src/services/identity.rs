//! Identity Verification
//!
//! Bearer tokens are checked by an external identity provider. Handlers never
//! look inside a token: they receive an [`AuthenticatedUser`] whose `user_id`
//! is the subject the provider vouched for.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::AppState;
use crate::error::AppError;

/// Errors that can occur while verifying a token
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider rejected the token (expired, revoked, malformed)
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The provider could not be reached or answered unexpectedly
    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Identity provider not configured: {0}")]
    NotConfigured(String),
}

/// Verifies a bearer token and returns the subject it belongs to
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, IdentityError>;
}

// ============================================================================
// Remote verifier
// ============================================================================

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

/// Verifier backed by the Identity Toolkit `accounts:lookup` endpoint.
///
/// The provider answers 200 with the account for a live ID token and 400 for
/// anything it does not accept.
#[derive(Debug, Clone)]
pub struct RemoteIdentityVerifier {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RemoteIdentityVerifier {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn lookup_url(&self) -> String {
        format!("{}/v1/accounts:lookup", self.base_url)
    }
}

#[async_trait]
impl IdentityVerifier for RemoteIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<String, IdentityError> {
        let response = self
            .client
            .post(self.lookup_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&serde_json::json!({ "idToken": token }))
            .send()
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body: LookupResponse = response
                    .json()
                    .await
                    .map_err(|e| IdentityError::Provider(e.to_string()))?;
                subject_from_lookup(body)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Err(IdentityError::InvalidToken),
            status => Err(IdentityError::Provider(format!(
                "unexpected status {status} from identity provider"
            ))),
        }
    }
}

fn subject_from_lookup(body: LookupResponse) -> Result<String, IdentityError> {
    body.users
        .into_iter()
        .next()
        .map(|u| u.local_id)
        .filter(|id| !id.is_empty())
        .ok_or(IdentityError::InvalidToken)
}

// ============================================================================
// Static verifier
// ============================================================================

/// Fixed token to subject table (useful for testing and local runs)
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityVerifier {
    tokens: HashMap<String, String>,
}

impl StaticIdentityVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, subject: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), subject.into());
        self
    }

    /// Parse `token=subject` pairs separated by commas.
    ///
    /// Each pair splits at its last `=`, so tokens may carry base64 padding.
    pub fn from_pairs(pairs: &str) -> Result<Self, IdentityError> {
        pairs
            .split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .try_fold(Self::new(), |verifier, pair| match pair.rsplit_once('=') {
                Some((token, subject)) if !token.trim().is_empty() && !subject.trim().is_empty() => {
                    Ok(verifier.with_token(token.trim(), subject.trim()))
                }
                _ => Err(IdentityError::NotConfigured(format!(
                    "invalid token entry: {pair}"
                ))),
            })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<String, IdentityError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(IdentityError::InvalidToken)
    }
}

// ============================================================================
// Request extractor
// ============================================================================

/// Verified caller of an authenticated route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Extract Bearer token from Authorization header
///
/// Expected format: "Bearer <token>", scheme matched case-insensitively.
fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
    let auth_header = req.headers().get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    let (scheme, token) = auth_str.split_at_checked(7)?;
    if !scheme.eq_ignore_ascii_case("Bearer ") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Map verification errors to application errors
fn map_identity_error(e: IdentityError) -> AppError {
    match e {
        IdentityError::InvalidToken => AppError::Unauthorized(e.to_string()),
        IdentityError::Provider(msg) | IdentityError::NotConfigured(msg) => {
            AppError::Internal(format!("Identity verification failed: {msg}"))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
                tracing::error!("AppState not configured in app data");
                AppError::Internal("Authentication service not configured".to_string())
            })?;

            let token = extract_bearer_token(&req).ok_or_else(|| {
                tracing::debug!("Missing or invalid Authorization header");
                AppError::Unauthorized("No or invalid token format".to_string())
            })?;

            let user_id = state.verifier.verify(&token).await.map_err(|e| {
                match &e {
                    IdentityError::InvalidToken => tracing::debug!("Token rejected by provider"),
                    _ => tracing::warn!("Identity verification error: {}", e),
                }
                map_identity_error(e)
            })?;

            Ok(AuthenticatedUser { user_id })
        })
    }
}
