// ABOUTME: Mission submission database operations
// ABOUTME: Append-only storage of per-user guided mission answers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{MissionKind, MissionSubmission};

impl Database {
    /// Append a mission submission
    ///
    /// Submissions are never updated or deleted; every call inserts a new
    /// row.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create_submission(
        &self,
        user_id: Uuid,
        mission: MissionKind,
        answers: &serde_json::Value,
    ) -> AppResult<MissionSubmission> {
        let record = MissionSubmission {
            id: Uuid::new_v4(),
            user_id,
            mission,
            answers: answers.clone(),
            created_at: Utc::now(),
        };

        let answers_json = serde_json::to_string(&record.answers)
            .map_err(|e| AppError::internal(format!("Failed to serialize answers: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO mission_submissions (id, user_id, mission, answers, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(record.mission.as_str())
        .bind(answers_json)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store submission: {e}")))?;

        Ok(record)
    }

    /// List a user's submissions for one mission, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_submissions(
        &self,
        user_id: Uuid,
        mission: MissionKind,
    ) -> AppResult<Vec<MissionSubmission>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, mission, answers, created_at
            FROM mission_submissions
            WHERE user_id = $1 AND mission = $2
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(mission.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list submissions: {e}")))?;

        rows.iter().map(Self::row_to_submission).collect()
    }

    fn row_to_submission(row: &SqliteRow) -> AppResult<MissionSubmission> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let mission: String = row.get("mission");
        let answers_raw: String = row.get("answers");

        Ok(MissionSubmission {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse submission id: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::internal(format!("Failed to parse user id: {e}")))?,
            mission: MissionKind::parse(&mission)
                .ok_or_else(|| AppError::internal(format!("Unknown mission kind: {mission}")))?,
            answers: serde_json::from_str(&answers_raw)
                .map_err(|e| AppError::internal(format!("Failed to parse answers: {e}")))?,
            created_at: row.get("created_at"),
        })
    }
}
