// ABOUTME: Core database management with idempotent schema migration for SQLite
// ABOUTME: Owns the connection pool; per-domain operations live in the sibling modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Database layer
//!
//! [`Database`] wraps a `SqlitePool` and runs idempotent schema setup at
//! connect time. Domain operations are split per record type across the
//! submodules, all as `impl Database` blocks. Two invariants live in the
//! schema itself rather than in handler code:
//! - at most one live (pending or confirmed) purchase per assessment
//!   result, via a partial unique index;
//! - at most one live booking per purchase, likewise.

/// Assessment result storage
pub mod assessments;
/// Booking storage and the booking decision transaction
pub mod bookings;
/// Purchase storage and duplicate-intent suppression
pub mod purchases;
/// Bookable slot storage
pub mod slots;
/// Mission submission storage
pub mod submissions;
/// User account storage
pub mod users;

pub use purchases::PurchaseIntentOutcome;

use sqlx::SqlitePool;
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Schema statements executed at startup; all idempotent
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT UNIQUE NOT NULL,
        display_name TEXT,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        last_active TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS assessment_results (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        summary TEXT NOT NULL,
        report TEXT NOT NULL,
        model TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS purchases (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id),
        assessment_result_id TEXT NOT NULL REFERENCES assessment_results(id),
        program TEXT NOT NULL,
        amount INTEGER NOT NULL,
        method TEXT NOT NULL,
        depositor_name TEXT NOT NULL,
        order_code TEXT NOT NULL UNIQUE,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT NOT NULL,
        confirmed_at TEXT,
        confirmed_by TEXT,
        program_starts_on TEXT
    )
    ",
    // One live monetary intent per assessment result; rejected purchases
    // do not block a retry.
    r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_purchases_live_result
    ON purchases(assessment_result_id)
    WHERE status IN ('pending', 'confirmed')
    ",
    r"
    CREATE TABLE IF NOT EXISTS bookings (
        id TEXT PRIMARY KEY,
        purchase_id TEXT NOT NULL REFERENCES purchases(id),
        proposed_slots TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        confirmed_slot TEXT,
        meeting_link TEXT,
        confirmed_by TEXT,
        confirmed_at TEXT
    )
    ",
    r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_live_purchase
    ON bookings(purchase_id)
    WHERE status IN ('pending', 'confirmed')
    ",
    r"
    CREATE TABLE IF NOT EXISTS slots (
        id TEXT PRIMARY KEY,
        starts_at TEXT NOT NULL UNIQUE,
        taken INTEGER NOT NULL DEFAULT 0
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS mission_submissions (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        mission TEXT NOT NULL,
        answers TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_submissions_user_mission
    ON mission_submissions(user_id, mission, created_at)
    ",
];

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run schema setup
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or any schema statement fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;

        info!("Database ready");
        Ok(db)
    }

    /// Run idempotent schema setup
    async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Schema setup failed: {e}")))?;
        }
        Ok(())
    }

    /// Access the underlying pool (test setup)
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
