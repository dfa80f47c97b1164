// ABOUTME: Common data models for platform records and their status machines
// ABOUTME: Defines users, assessment results, purchases, bookings, slots, and mission submissions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Domain models
//!
//! Records are stored with string-mapped enums and text ids; the converters
//! here are the single source of truth for that mapping. Status machines:
//! purchases and bookings both move `pending -> confirmed | rejected`
//! exactly once and are never deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Status enums
// ============================================================================

/// Lifecycle status of a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    /// Created at checkout, awaiting a coach decision
    Pending,
    /// Deposit reconciled and program activated
    Confirmed,
    /// Declined by a coach
    Rejected,
}

impl PurchaseStatus {
    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }

    /// Parse the storage representation, defaulting unknown values to pending
    #[must_use]
    pub fn from_str_lossy(raw: &str) -> Self {
        match raw {
            "confirmed" => Self::Confirmed,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }

    /// Parse the wire representation strictly
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Requested by the user, awaiting a coach decision
    Pending,
    /// Scheduled onto a slot by a coach
    Confirmed,
    /// Declined by a coach
    Rejected,
}

impl BookingStatus {
    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }

    /// Parse the storage representation, defaulting unknown values to pending
    #[must_use]
    pub fn from_str_lossy(raw: &str) -> Self {
        match raw {
            "confirmed" => Self::Confirmed,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }

    /// Parse the wire representation strictly
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Program a purchase pays for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramKind {
    /// One-off personality report unlock
    Report,
    /// Coaching program including a counseling session
    Coaching,
}

impl ProgramKind {
    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Coaching => "coaching",
        }
    }

    /// Parse the storage/wire representation
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "report" => Some(Self::Report),
            "coaching" => Some(Self::Coaching),
            _ => None,
        }
    }
}

/// Guided mission a submission belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    /// Core-belief identification mission
    CoreBelief,
    /// Cognitive-error identification mission
    CognitiveError,
}

impl MissionKind {
    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CoreBelief => "core_belief",
            Self::CognitiveError => "cognitive_error",
        }
    }

    /// Parse the storage/wire representation
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "core_belief" => Some(Self::CoreBelief),
            "cognitive_error" => Some(Self::CognitiveError),
            _ => None,
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// Registered platform user
#[derive(Debug, Clone)]
pub struct User {
    /// Unique id
    pub id: Uuid,
    /// Login email, unique
    pub email: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// bcrypt password hash
    pub password_hash: String,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Last authenticated activity
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Create a new user record with fresh id and timestamps
    #[must_use]
    pub fn new(email: String, password_hash: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            created_at: now,
            last_active: now,
        }
    }
}

/// Generated personality report a purchase can reference
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResult {
    /// Unique id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// One-line summary for listings
    pub summary: String,
    /// Full report body as JSON
    pub report: serde_json::Value,
    /// Completion model that produced the report
    pub model: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Monetary intent for a program
#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    /// Unique id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Assessment result this purchase pays to unlock
    pub assessment_result_id: Uuid,
    /// Program being purchased
    pub program: ProgramKind,
    /// Amount in minor currency units
    pub amount: i64,
    /// Payment method hint from checkout (e.g. "bank_transfer")
    pub method: String,
    /// User-supplied name used to reconcile the manual transfer
    pub depositor_name: String,
    /// External order identifier (time prefix + random suffix)
    pub order_code: String,
    /// Lifecycle status
    pub status: PurchaseStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Confirmation time, set once
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Email of the coach who decided the purchase
    pub confirmed_by: Option<String>,
    /// Program day-1 date, stamped at confirmation
    pub program_starts_on: Option<NaiveDate>,
}

/// Scheduling request for a counseling session, tied to a purchase
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    /// Unique id
    pub id: Uuid,
    /// Parent purchase
    pub purchase_id: Uuid,
    /// Proposed session times (RFC 3339), as submitted by the user
    pub proposed_slots: Vec<String>,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Chosen session time, set on confirmation
    pub confirmed_slot: Option<DateTime<Utc>>,
    /// External meeting link, set on confirmation
    pub meeting_link: Option<String>,
    /// Email of the coach who confirmed
    pub confirmed_by: Option<String>,
    /// Confirmation time
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Bookable session time published by a coach
#[derive(Debug, Clone, Serialize)]
pub struct Slot {
    /// Unique id
    pub id: Uuid,
    /// Session start time
    pub starts_at: DateTime<Utc>,
    /// Whether a confirmed booking holds this slot
    pub taken: bool,
}

/// Free-form answers for one guided mission, append-only
#[derive(Debug, Clone, Serialize)]
pub struct MissionSubmission {
    /// Unique id
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Mission the answers belong to
    pub mission: MissionKind,
    /// Answer blob as submitted
    pub answers: serde_json::Value,
    /// Submission time
    pub created_at: DateTime<Utc>,
}
