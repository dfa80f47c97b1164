// ABOUTME: Production logging setup with env-filter controlled verbosity
// ABOUTME: Initializes the tracing subscriber exactly once from the binary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Structured logging initialization
//!
//! The binary calls [`init`] before anything else. Verbosity is controlled
//! through `RUST_LOG` (default `info` for this crate, `warn` elsewhere).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// Safe to call once per process; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,innerlens_server=info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
