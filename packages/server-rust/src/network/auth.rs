//! Bearer-token authentication and scope policies for the resource routes.
//!
//! Reads (`GET`) fall under the `ReadOnly` policy, every other method under
//! `ReadWrite`. A policy is satisfied by any one of its configured scopes;
//! an empty scope list accepts any valid token.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::AuthConfig;

/// Authentication and authorization failures at the edge.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token lacks a scope required by the {0} policy")]
    InsufficientScope(ScopePolicy),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        match self {
            Self::MissingToken | Self::InvalidToken(_) => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                body,
            )
                .into_response(),
            Self::InsufficientScope(_) => (StatusCode::FORBIDDEN, body).into_response(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePolicy {
    ReadOnly,
    ReadWrite,
}

impl ScopePolicy {
    #[must_use]
    pub fn for_method(method: &Method) -> Self {
        if *method == Method::GET || *method == Method::HEAD {
            Self::ReadOnly
        } else {
            Self::ReadWrite
        }
    }
}

impl std::fmt::Display for ScopePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadOnly => f.write_str("ReadOnly"),
            Self::ReadWrite => f.write_str("ReadWrite"),
        }
    }
}

/// Claims the gatekeeper reads. `exp` is validated by `jsonwebtoken` itself.
#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    /// Space-separated scopes (Azure AD style).
    #[serde(default)]
    scp: Option<String>,
    /// Space-separated scopes (OAuth 2.0 style).
    #[serde(default)]
    scope: Option<String>,
}

impl Claims {
    fn scopes(&self) -> HashSet<&str> {
        self.scp
            .iter()
            .chain(self.scope.iter())
            .flat_map(|s| s.split_whitespace())
            .collect()
    }
}

/// Verifies tokens and applies scope policies.
pub struct Authenticator {
    config: AuthConfig,
    key: DecodingKey,
    validation: Validation,
}

impl Authenticator {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let key = DecodingKey::from_secret(config.secret.as_deref().unwrap_or_default().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            config,
            key,
            validation,
        }
    }

    /// Checks the `Authorization` header value against `policy`.
    ///
    /// # Errors
    ///
    /// Returns `MissingToken` or `InvalidToken` when the caller is not
    /// authenticated, `InsufficientScope` when the policy is not met.
    pub fn authorize(
        &self,
        authorization: Option<&str>,
        policy: ScopePolicy,
    ) -> Result<(), AuthError> {
        if self.config.allow_anonymous {
            return Ok(());
        }

        let token = authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = decode::<Claims>(token, &self.key, &self.validation)?.claims;

        let required = match policy {
            ScopePolicy::ReadOnly => &self.config.read_scopes,
            ScopePolicy::ReadWrite => &self.config.write_scopes,
        };
        let granted = claims.scopes();
        if !required.is_empty() && !required.iter().any(|scope| granted.contains(scope.as_str())) {
            debug!(subject = ?claims.sub, %policy, "insufficient scope");
            return Err(AuthError::InsufficientScope(policy));
        }

        Ok(())
    }
}

/// Axum middleware enforcing [`Authenticator::authorize`] on every request.
pub async fn require_scopes(
    State(auth): State<Arc<Authenticator>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let policy = ScopePolicy::for_method(request.method());
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    auth.authorize(authorization, policy)?;
    Ok(next.run(request).await)
}
