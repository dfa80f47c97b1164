// ABOUTME: Purchase database operations with duplicate-intent suppression
// ABOUTME: Handles payment-intent creation, coach decisions, and status queues
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{ProgramKind, Purchase, PurchaseStatus};

/// Result of a payment-intent request
#[derive(Debug, Clone)]
pub struct PurchaseIntentOutcome {
    /// The live purchase for the assessment result
    pub purchase: Purchase,
    /// Whether this call inserted a new row
    pub created: bool,
}

/// Build an external order identifier: UTC time prefix plus random suffix
fn generate_order_code() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{}{}", Utc::now().format("%Y%m%d%H%M%S"), suffix)
}

impl Database {
    /// Create a payment intent, suppressing duplicates per assessment result
    ///
    /// The partial unique index on `assessment_result_id` makes this safe
    /// under concurrent calls: whichever insert loses the race falls back
    /// to returning the already-live purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create_purchase_intent(
        &self,
        user_id: Uuid,
        assessment_result_id: Uuid,
        program: ProgramKind,
        amount: i64,
        method: &str,
        depositor_name: &str,
    ) -> AppResult<PurchaseIntentOutcome> {
        if let Some(existing) = self
            .find_live_purchase_by_result(assessment_result_id)
            .await?
        {
            return Ok(PurchaseIntentOutcome {
                purchase: existing,
                created: false,
            });
        }

        let record = Purchase {
            id: Uuid::new_v4(),
            user_id,
            assessment_result_id,
            program,
            amount,
            method: method.to_owned(),
            depositor_name: depositor_name.to_owned(),
            order_code: generate_order_code(),
            status: PurchaseStatus::Pending,
            created_at: Utc::now(),
            confirmed_at: None,
            confirmed_by: None,
            program_starts_on: None,
        };

        let result = sqlx::query(
            r"
            INSERT INTO purchases (
                id, user_id, assessment_result_id, program, amount, method,
                depositor_name, order_code, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(record.id.to_string())
        .bind(record.user_id.to_string())
        .bind(record.assessment_result_id.to_string())
        .bind(record.program.as_str())
        .bind(record.amount)
        .bind(&record.method)
        .bind(&record.depositor_name)
        .bind(&record.order_code)
        .bind(record.status.as_str())
        .bind(record.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(PurchaseIntentOutcome {
                purchase: record,
                created: true,
            }),
            // Lost the race to a concurrent intent for the same result
            Err(sqlx::Error::Database(e))
                if e.message().contains("assessment_result_id") =>
            {
                let existing = self
                    .find_live_purchase_by_result(assessment_result_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::database("Purchase conflict with no live row")
                    })?;
                Ok(PurchaseIntentOutcome {
                    purchase: existing,
                    created: false,
                })
            }
            Err(e) => Err(AppError::database(format!("Failed to create purchase: {e}"))),
        }
    }

    /// Get a purchase by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_purchase(&self, id: Uuid) -> AppResult<Option<Purchase>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, assessment_result_id, program, amount, method,
                   depositor_name, order_code, status, created_at,
                   confirmed_at, confirmed_by, program_starts_on
            FROM purchases WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get purchase: {e}")))?;

        row.map(|r| Self::row_to_purchase(&r)).transpose()
    }

    /// Find the pending or confirmed purchase for an assessment result
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn find_live_purchase_by_result(
        &self,
        assessment_result_id: Uuid,
    ) -> AppResult<Option<Purchase>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, assessment_result_id, program, amount, method,
                   depositor_name, order_code, status, created_at,
                   confirmed_at, confirmed_by, program_starts_on
            FROM purchases
            WHERE assessment_result_id = $1 AND status IN ('pending', 'confirmed')
            ",
        )
        .bind(assessment_result_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find live purchase: {e}")))?;

        row.map(|r| Self::row_to_purchase(&r)).transpose()
    }

    /// List purchases in a given status, oldest first (coach review queue)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_purchases_by_status(
        &self,
        status: PurchaseStatus,
    ) -> AppResult<Vec<Purchase>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, assessment_result_id, program, amount, method,
                   depositor_name, order_code, status, created_at,
                   confirmed_at, confirmed_by, program_starts_on
            FROM purchases WHERE status = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list purchases: {e}")))?;

        rows.iter().map(Self::row_to_purchase).collect()
    }

    /// Confirm a pending purchase and stamp the program start date
    ///
    /// # Errors
    ///
    /// Returns not-found if the purchase does not exist, invalid-input if
    /// it is not pending, or a database error.
    pub async fn confirm_purchase(&self, id: Uuid, coach_email: &str) -> AppResult<Purchase> {
        let now = Utc::now();

        let result = sqlx::query(
            r"
            UPDATE purchases
            SET status = 'confirmed', confirmed_at = $1, confirmed_by = $2,
                program_starts_on = $3
            WHERE id = $4 AND status = 'pending'
            ",
        )
        .bind(now)
        .bind(coach_email)
        .bind(now.date_naive())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to confirm purchase: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(self.purchase_transition_error(id).await);
        }

        self.get_purchase(id).await?.ok_or_else(|| {
            AppError::database("Purchase disappeared after confirmation")
        })
    }

    /// Reject a pending purchase
    ///
    /// # Errors
    ///
    /// Returns not-found if the purchase does not exist, invalid-input if
    /// it is not pending, or a database error.
    pub async fn reject_purchase(&self, id: Uuid, coach_email: &str) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE purchases
            SET status = 'rejected', confirmed_at = $1, confirmed_by = $2
            WHERE id = $3 AND status = 'pending'
            ",
        )
        .bind(Utc::now())
        .bind(coach_email)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to reject purchase: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(self.purchase_transition_error(id).await);
        }
        Ok(())
    }

    /// Build the right error for a failed pending-only transition
    async fn purchase_transition_error(&self, id: Uuid) -> AppError {
        match self.get_purchase(id).await {
            Ok(Some(_)) => AppError::invalid_input("Purchase is not pending"),
            Ok(None) => AppError::not_found(format!("Purchase {id}")),
            Err(e) => e,
        }
    }

    /// Convert a database row to a [`Purchase`]
    pub(super) fn row_to_purchase(row: &SqliteRow) -> AppResult<Purchase> {
        let id: String = row.get("id");
        let user_id: String = row.get("user_id");
        let assessment_result_id: String = row.get("assessment_result_id");
        let program: String = row.get("program");
        let status: String = row.get("status");

        Ok(Purchase {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse purchase id: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::internal(format!("Failed to parse user id: {e}")))?,
            assessment_result_id: Uuid::parse_str(&assessment_result_id)
                .map_err(|e| AppError::internal(format!("Failed to parse result id: {e}")))?,
            program: ProgramKind::parse(&program)
                .ok_or_else(|| AppError::internal(format!("Unknown program kind: {program}")))?,
            amount: row.get("amount"),
            method: row.get("method"),
            depositor_name: row.get("depositor_name"),
            order_code: row.get("order_code"),
            status: PurchaseStatus::from_str_lossy(&status),
            created_at: row.get("created_at"),
            confirmed_at: row.get("confirmed_at"),
            confirmed_by: row.get("confirmed_by"),
            program_starts_on: row.get("program_starts_on"),
        })
    }
}
