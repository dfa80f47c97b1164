// ABOUTME: Role resolution for the privileged coach role via static email allow-list
// ABOUTME: Pure predicate over configuration, populated once at process start
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Coach role resolution
//!
//! The coach role is the only privileged role on the platform. It is
//! resolved from a static allow-list of email addresses loaded from
//! configuration at startup; comparison is case-insensitive and an absent
//! email never resolves to coach. No mutation, no persistence.

use std::collections::HashSet;

/// Static allow-list of coach email addresses
#[derive(Debug, Clone, Default)]
pub struct CoachRegistry {
    emails: HashSet<String>,
}

impl CoachRegistry {
    /// Build the registry from configured addresses
    ///
    /// Addresses are normalized to lowercase; empty entries are dropped.
    #[must_use]
    pub fn new(emails: &[String]) -> Self {
        Self {
            emails: emails
                .iter()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Whether the given email belongs to the coach role
    ///
    /// Absent or empty input is never a coach.
    #[must_use]
    pub fn is_coach(&self, email: Option<&str>) -> bool {
        email
            .map(|e| e.trim().to_lowercase())
            .is_some_and(|e| !e.is_empty() && self.emails.contains(&e))
    }
}
