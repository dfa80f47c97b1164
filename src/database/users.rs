// ABOUTME: User account database operations
// ABOUTME: Handles registration inserts, lookup by email or id, and activity stamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;

impl Database {
    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is already registered
    /// - Database operation fails
    pub async fn create_user(&self, user: &User) -> AppResult<Uuid> {
        let result = sqlx::query(
            r"
            INSERT INTO users (id, email, display_name, password_hash, created_at, last_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.last_active)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user.id),
            Err(sqlx::Error::Database(e)) if e.message().contains("UNIQUE") => Err(
                AppError::invalid_input("Email already in use by another user"),
            ),
            Err(e) => Err(AppError::database(format!("Failed to create user: {e}"))),
        }
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.get_user_by_field("email", email).await
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let user_id = user_id.to_string();
        self.get_user_by_field("id", &user_id).await
    }

    /// Update the last-active timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_last_active(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_active = $1 WHERE id = $2")
            .bind(chrono::Utc::now())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update last active: {e}")))?;
        Ok(())
    }

    async fn get_user_by_field(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        let query = format!(
            r"
            SELECT id, email, display_name, password_hash, created_at, last_active
            FROM users WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by {field}: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Convert a database row to a [`User`]
    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let id: String = row.get("id");

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse user id: {e}")))?,
            email: row.get("email"),
            display_name: row.get("display_name"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
            last_active: row.get("last_active"),
        })
    }
}
