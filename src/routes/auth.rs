// ABOUTME: User authentication route handlers for registration, login, and sessions
// ABOUTME: Issues session tokens as httpOnly cookies and JSON bearer tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Authentication routes
//!
//! Registration and login for email/password accounts. Sessions are HS256
//! tokens delivered both in the JSON response and as an httpOnly cookie;
//! `GET /api/auth/me` restores a session from either.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task;
use tracing::{debug, info};

use crate::{
    auth::SESSION_HOURS,
    errors::{AppError, AppResult},
    models::User,
    resources::ServerResources,
    security::cookies::{clear_auth_cookie, set_auth_cookie},
};

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

// ============================================================================
// Request/Response Types
// ============================================================================

/// User registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Email address, unique per account
    pub email: String,
    /// Password (will be hashed)
    pub password: String,
    /// Optional display name
    #[serde(default)]
    pub display_name: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// User info for session responses
#[derive(Debug, Serialize)]
pub struct UserInfo {
    /// User id
    pub user_id: String,
    /// Email address
    pub email: String,
    /// Display name if set
    pub display_name: Option<String>,
    /// Whether the email resolves to the coach role
    pub is_coach: bool,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token, also set as an httpOnly cookie
    pub token: String,
    /// Expiry timestamp (RFC 3339)
    pub expires_at: String,
    /// User information
    pub user: UserInfo,
}

// ============================================================================
// Auth Routes
// ============================================================================

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/logout", post(Self::handle_logout))
            .route("/api/auth/me", get(Self::handle_me))
            .with_state(resources)
    }

    /// Handle user registration
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> AppResult<impl IntoResponse> {
        info!("User registration attempt");

        if !is_valid_email(&request.email) {
            return Err(AppError::invalid_input("Invalid email format"));
        }
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::invalid_input(
                "Password must be at least 8 characters",
            ));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        let user = User::new(
            request.email.trim().to_lowercase(),
            password_hash,
            request.display_name,
        );
        let user_id = resources.database.create_user(&user).await?;

        info!(user_id = %user_id, "User registered");
        Ok(Json(json!({
            "success": true,
            "user_id": user_id.to_string(),
        })))
    }

    /// Handle user login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> AppResult<impl IntoResponse> {
        debug!("User login attempt");

        let user = resources
            .database
            .get_user_by_email(&request.email.trim().to_lowercase())
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        // Verify password off the async executor
        let password = request.password.clone();
        let password_hash = user.password_hash.clone();
        let is_valid = task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?
            .map_err(|_| AppError::auth_invalid("Invalid email or password"))?;

        if !is_valid {
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        resources.database.update_last_active(user.id).await?;

        let token = resources.auth.generate_token(user.id, &user.email)?;
        let expires_at = chrono::Utc::now() + chrono::Duration::hours(SESSION_HOURS);

        let mut headers = HeaderMap::new();
        set_auth_cookie(
            &mut headers,
            &token,
            SESSION_HOURS * 3600,
            resources.config.uses_https(),
        );

        info!(user_id = %user.id, "User logged in");

        let response = LoginResponse {
            token,
            expires_at: expires_at.to_rfc3339(),
            user: Self::user_info(&resources, &user),
        };
        Ok((headers, Json(response)))
    }

    /// Handle logout by clearing the session cookie
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<impl IntoResponse> {
        let mut headers = HeaderMap::new();
        clear_auth_cookie(&mut headers, resources.config.uses_https());
        Ok((headers, Json(json!({ "success": true }))))
    }

    /// Handle session restore
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth.authenticate(&headers)?;
        let user = resources
            .database
            .get_user_by_id(auth.user_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Session user no longer exists"))?;

        Ok(Json(json!({ "user": Self::user_info(&resources, &user) })))
    }

    fn user_info(resources: &Arc<ServerResources>, user: &User) -> UserInfo {
        UserInfo {
            user_id: user.id.to_string(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            is_coach: resources.coaches.is_coach(Some(&user.email)),
        }
    }
}

/// Minimal email shape check: local part, one `@`, dotted domain
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.trim().splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email(" user@sub.example.org "));
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
    }
}
