// ABOUTME: Bookable slot database operations
// ABOUTME: Handles coach slot publication and open-slot listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Slot;

impl Database {
    /// Publish bookable slots, skipping times that already exist
    ///
    /// Returns the number of slots actually inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create_slots(&self, starts: &[DateTime<Utc>]) -> AppResult<u64> {
        let mut inserted = 0;
        for starts_at in starts {
            let result = sqlx::query(
                r"
                INSERT INTO slots (id, starts_at, taken)
                VALUES ($1, $2, 0)
                ON CONFLICT(starts_at) DO NOTHING
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(starts_at)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create slot: {e}")))?;

            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    /// List untaken slots starting after the given time, soonest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_open_slots(&self, after: DateTime<Utc>) -> AppResult<Vec<Slot>> {
        let rows = sqlx::query(
            r"
            SELECT id, starts_at, taken FROM slots
            WHERE taken = 0 AND starts_at > $1
            ORDER BY starts_at ASC
            ",
        )
        .bind(after)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list open slots: {e}")))?;

        rows.iter().map(Self::row_to_slot).collect()
    }

    /// Get a slot by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_slot(&self, id: Uuid) -> AppResult<Option<Slot>> {
        let row = sqlx::query("SELECT id, starts_at, taken FROM slots WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get slot: {e}")))?;

        row.map(|r| Self::row_to_slot(&r)).transpose()
    }

    /// Convert a database row to a [`Slot`]
    pub(super) fn row_to_slot(row: &SqliteRow) -> AppResult<Slot> {
        let id: String = row.get("id");

        Ok(Slot {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse slot id: {e}")))?,
            starts_at: row.get("starts_at"),
            taken: row.get("taken"),
        })
    }
}
