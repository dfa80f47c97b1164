// ABOUTME: Assessment result database operations
// ABOUTME: Stores generated personality reports and serves owner-scoped lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::AssessmentResult;

impl Database {
    /// Store a generated report
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create_assessment_result(
        &self,
        user_id: Uuid,
        summary: &str,
        report: &serde_json::Value,
        model: &str,
    ) -> AppResult<AssessmentResult> {
        let record = AssessmentResult {
            id: Uuid::new_v4(),
            user_id,
            summary: summary.to_owned(),
            report: report.clone(),
            model: model.to_owned(),
            created_at: Utc::now(),
        };

        let report_json = serde_json::to_string(&record.report)
            .map_err(|e| AppError::internal(format!("Failed to serialize report: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO assessment_results (id, user_id, summary, report, model, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(&record.summary)
        .bind(report_json)
        .bind(&record.model)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store assessment result: {e}")))?;

        Ok(record)
    }

    /// Get an assessment result by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_assessment_result(&self, id: Uuid) -> AppResult<Option<AssessmentResult>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, summary, report, model, created_at
            FROM assessment_results WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get assessment result: {e}")))?;

        row.map(|r| Self::row_to_assessment(&r)).transpose()
    }

    fn row_to_assessment(row: &SqliteRow) -> AppResult<AssessmentResult> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let report_raw: String = row.get("report");

        Ok(AssessmentResult {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse result id: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::internal(format!("Failed to parse user id: {e}")))?,
            summary: row.get("summary"),
            report: serde_json::from_str(&report_raw)
                .map_err(|e| AppError::internal(format!("Failed to parse stored report: {e}")))?,
            model: row.get("model"),
            created_at: row.get("created_at"),
        })
    }
}
