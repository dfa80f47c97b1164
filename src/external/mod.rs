// ABOUTME: External service clients for OAuth, AI completion, and payments
// ABOUTME: All downstream calls are synchronous request/response with no retry layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! External API clients

/// OpenAI-compatible completion client for reports, chat, and vision
pub mod ai_client;
/// Google OAuth authorization and token-exchange client
pub mod google_oauth;
/// Payment gateway seam (stub until vendor credentials go live)
pub mod payment_gateway;

pub use ai_client::{AiClient, ChatMessage};
pub use google_oauth::{GoogleOAuthClient, TokenPair};
pub use payment_gateway::PaymentGateway;
