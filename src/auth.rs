// ABOUTME: Authentication and session management with HS256 JWT tokens
// ABOUTME: Issues session tokens at login and resolves them from bearer headers or cookies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Session authentication
//!
//! [`AuthManager`] issues short-lived HS256 session tokens carrying the
//! user id and email, and resolves incoming requests from either an
//! `Authorization: Bearer` header or the `auth_token` cookie. Role
//! resolution happens separately against the coach allow-list - the token
//! itself carries no role claim, so allow-list changes apply immediately.

use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    security::cookies::{get_cookie_value, AUTH_COOKIE},
};

/// Session lifetime in hours
pub const SESSION_HOURS: i64 = 24;

/// JWT claims for a session token
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// User id
    sub: String,
    /// User email
    email: String,
    /// Issued-at (unix seconds)
    iat: i64,
    /// Expiry (unix seconds)
    exp: i64,
}

/// Authenticated principal resolved from a request
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User id from the token subject
    pub user_id: Uuid,
    /// Email the token was issued for
    pub email: String,
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthManager {
    /// Create a manager from the configured HMAC secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a session token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if token signing fails.
    pub fn generate_token(&self, user_id: Uuid, email: &str) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            iat: now,
            exp: now + SESSION_HOURS * 3600,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate session token: {e}")))
    }

    /// Validate a raw token and return the principal it identifies
    ///
    /// # Errors
    ///
    /// Returns an authentication error if the token is expired, malformed,
    /// or carries an unparseable subject.
    pub fn validate_token(&self, token: &str) -> AppResult<AuthUser> {
        let data = decode::<SessionClaims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| AppError::auth_invalid(format!("Invalid session token: {e}")))?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::auth_invalid("Invalid subject in session token"))?;

        Ok(AuthUser {
            user_id,
            email: data.claims.email,
        })
    }

    /// Resolve the authenticated principal from request headers
    ///
    /// Accepts `Authorization: Bearer <token>` or the `auth_token` cookie,
    /// in that order.
    ///
    /// # Errors
    ///
    /// Returns 401 when no credential is present or the credential is
    /// invalid.
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<AuthUser> {
        let token = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(ToOwned::to_owned)
            .or_else(|| get_cookie_value(headers, AUTH_COOKIE))
            .ok_or_else(|| AppError::auth_required("Missing authorization header or cookie"))?;

        self.validate_token(&token)
    }
}
