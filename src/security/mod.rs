// ABOUTME: Security utilities for HTTP session handling
// ABOUTME: Cookie helpers with hardened defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Security helpers

/// Secure cookie construction and extraction
pub mod cookies;
