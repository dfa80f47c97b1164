// ABOUTME: Booking database operations including the transactional confirmation
// ABOUTME: Booking, slot, and parent purchase move together or not at all
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::info;
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingStatus};

impl Database {
    /// Create a pending booking for a purchase
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The purchase already has a pending or confirmed booking
    /// - Database operation fails
    pub async fn create_booking(
        &self,
        purchase_id: Uuid,
        proposed_slots: &[String],
    ) -> AppResult<Booking> {
        let record = Booking {
            id: Uuid::new_v4(),
            purchase_id,
            proposed_slots: proposed_slots.to_vec(),
            status: BookingStatus::Pending,
            confirmed_slot: None,
            meeting_link: None,
            confirmed_by: None,
            confirmed_at: None,
        };

        let slots_json = serde_json::to_string(&record.proposed_slots)
            .map_err(|e| AppError::internal(format!("Failed to serialize slots: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO bookings (id, purchase_id, proposed_slots, status)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(record.id.to_string())
        .bind(record.purchase_id.to_string())
        .bind(slots_json)
        .bind(record.status.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(record),
            Err(sqlx::Error::Database(e)) if e.message().contains("purchase_id") => Err(
                AppError::invalid_input("Purchase already has a live booking"),
            ),
            Err(e) => Err(AppError::database(format!("Failed to create booking: {e}"))),
        }
    }

    /// Get a booking by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_booking(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let row = sqlx::query(
            r"
            SELECT id, purchase_id, proposed_slots, status, confirmed_slot,
                   meeting_link, confirmed_by, confirmed_at
            FROM bookings WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get booking: {e}")))?;

        row.map(|r| Self::row_to_booking(&r)).transpose()
    }

    /// List bookings in a given status, oldest first (coach review queue)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_bookings_by_status(&self, status: BookingStatus) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query(
            r"
            SELECT id, purchase_id, proposed_slots, status, confirmed_slot,
                   meeting_link, confirmed_by, confirmed_at
            FROM bookings WHERE status = $1
            ORDER BY rowid ASC
            ",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list bookings: {e}")))?;

        rows.iter().map(Self::row_to_booking).collect()
    }

    /// Confirm a pending booking onto a slot
    ///
    /// One transaction covers all three records: the booking gets its slot,
    /// link, and confirmation stamps; the slot is claimed with a guarded
    /// update so a taken slot aborts everything; the parent purchase is
    /// confirmed with its program start date. Any failure rolls the whole
    /// transition back.
    ///
    /// # Errors
    ///
    /// Returns not-found for a missing booking or slot, invalid-input for a
    /// non-pending booking, an already-taken slot, or an undecidable parent
    /// purchase, or a database error.
    pub async fn confirm_booking(
        &self,
        booking_id: Uuid,
        slot_id: Uuid,
        meeting_link: Option<&str>,
        coach_email: &str,
    ) -> AppResult<Booking> {
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        // Resolve the slot time and the parent purchase up front
        let slot_row = sqlx::query("SELECT starts_at FROM slots WHERE id = $1")
            .bind(slot_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to load slot: {e}")))?;
        let starts_at: chrono::DateTime<Utc> = slot_row
            .ok_or_else(|| AppError::not_found(format!("Slot {slot_id}")))?
            .get("starts_at");

        let booking_row = sqlx::query("SELECT purchase_id FROM bookings WHERE id = $1")
            .bind(booking_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to load booking: {e}")))?;
        let purchase_id: String = booking_row
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id}")))?
            .get("purchase_id");

        // (a) booking: pending -> confirmed
        let updated = sqlx::query(
            r"
            UPDATE bookings
            SET status = 'confirmed', confirmed_slot = $1, meeting_link = $2,
                confirmed_by = $3, confirmed_at = $4
            WHERE id = $5 AND status = 'pending'
            ",
        )
        .bind(starts_at)
        .bind(meeting_link)
        .bind(coach_email)
        .bind(now)
        .bind(booking_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to confirm booking: {e}")))?;

        if updated.rows_affected() == 0 {
            return Err(AppError::invalid_input("Booking is not pending"));
        }

        // (b) slot: claimed only if still free
        let claimed = sqlx::query("UPDATE slots SET taken = 1 WHERE id = $1 AND taken = 0")
            .bind(slot_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to claim slot: {e}")))?;

        if claimed.rows_affected() == 0 {
            return Err(AppError::invalid_input("Slot is already taken"));
        }

        // (c) parent purchase: pending -> confirmed with the program start
        // date. A purchase already confirmed through the manual deposit
        // flow keeps its original stamps.
        let purchase_updated = sqlx::query(
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
        .bind(&purchase_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to confirm purchase: {e}")))?;

        if purchase_updated.rows_affected() == 0 {
            let status_row = sqlx::query("SELECT status FROM purchases WHERE id = $1")
                .bind(&purchase_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to load purchase: {e}")))?;
            let status = status_row.map(|r| r.get::<String, _>("status"));

            match status.as_deref() {
                Some("confirmed") => {}
                Some(_) => {
                    return Err(AppError::invalid_input(
                        "Parent purchase can no longer be confirmed",
                    ))
                }
                None => return Err(AppError::not_found(format!("Purchase {purchase_id}"))),
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit confirmation: {e}")))?;

        info!(
            booking_id = %booking_id,
            slot_id = %slot_id,
            coach = %coach_email,
            "Booking confirmed"
        );

        self.get_booking(booking_id)
            .await?
            .ok_or_else(|| AppError::database("Booking disappeared after confirmation"))
    }

    /// Reject a pending booking
    ///
    /// Only the booking status changes; the slot pool and the parent
    /// purchase are untouched.
    ///
    /// # Errors
    ///
    /// Returns not-found if the booking does not exist, invalid-input if it
    /// is not pending, or a database error.
    pub async fn reject_booking(&self, booking_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE bookings SET status = 'rejected' WHERE id = $1 AND status = 'pending'",
        )
        .bind(booking_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to reject booking: {e}")))?;

        if result.rows_affected() == 0 {
            return match self.get_booking(booking_id).await {
                Ok(Some(_)) => Err(AppError::invalid_input("Booking is not pending")),
                Ok(None) => Err(AppError::not_found(format!("Booking {booking_id}"))),
                Err(e) => Err(e),
            };
        }

        info!(booking_id = %booking_id, "Booking rejected");
        Ok(())
    }

    /// Convert a database row to a [`Booking`]
    fn row_to_booking(row: &SqliteRow) -> AppResult<Booking> {
        let id: String = row.get("id");
        let purchase_id: String = row.get("purchase_id");
        let proposed_raw: String = row.get("proposed_slots");
        let status: String = row.get("status");

        Ok(Booking {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse booking id: {e}")))?,
            purchase_id: Uuid::parse_str(&purchase_id)
                .map_err(|e| AppError::internal(format!("Failed to parse purchase id: {e}")))?,
            proposed_slots: serde_json::from_str(&proposed_raw).map_err(|e| {
                AppError::internal(format!("Failed to parse proposed slots: {e}"))
            })?,
            status: BookingStatus::from_str_lossy(&status),
            confirmed_slot: row.get("confirmed_slot"),
            meeting_link: row.get("meeting_link"),
            confirmed_by: row.get("confirmed_by"),
            confirmed_at: row.get("confirmed_at"),
        })
    }
}
