// ABOUTME: Configuration module organization for the Innerlens server
// ABOUTME: Exposes the environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Configuration management
//!
//! All configuration comes from environment variables, read exactly once at
//! process start into [`environment::ServerConfig`] and passed down through
//! shared state. Nothing reads the environment at request time.

/// Environment-driven server configuration
pub mod environment;

pub use environment::{BankTransferDetails, ServerConfig};
