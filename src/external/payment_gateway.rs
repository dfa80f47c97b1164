// ABOUTME: Payment gateway seam, currently a stub behind merchant credentials
// ABOUTME: Every gateway operation reports service-unavailable until the vendor integration lands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Payment gateway stub
//!
//! The vendor integration is not wired in yet. Without merchant
//! credentials the gateway reports itself unconfigured and checkout falls
//! back to manual bank transfer; with credentials present the endpoints
//! still answer service-unavailable until the vendor SDK replaces this
//! stub behind the same seam.

use crate::config::environment::GatewayConfig;
use crate::errors::{AppError, AppResult};

/// Payment gateway client seam
#[derive(Clone, Default)]
pub struct PaymentGateway {
    configured: bool,
}

impl PaymentGateway {
    /// Create the gateway seam from optional merchant credentials
    #[must_use]
    pub fn new(config: Option<&GatewayConfig>) -> Self {
        Self {
            configured: config.is_some(),
        }
    }

    /// Whether merchant credentials are present
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.configured
    }

    /// Approve a gateway payment
    ///
    /// # Errors
    ///
    /// Always returns feature-disabled: either credentials are missing or
    /// the vendor integration is not yet enabled.
    pub fn approve(&self) -> AppResult<()> {
        Err(self.unavailable())
    }

    /// Cancel a gateway payment
    ///
    /// # Errors
    ///
    /// Always returns feature-disabled, as for [`Self::approve`].
    pub fn cancel(&self) -> AppResult<()> {
        Err(self.unavailable())
    }

    fn unavailable(&self) -> AppError {
        if self.configured {
            AppError::feature_disabled("Payment gateway integration is not yet enabled")
        } else {
            AppError::feature_disabled(
                "Payment gateway is not configured; use manual bank transfer",
            )
        }
    }
}
