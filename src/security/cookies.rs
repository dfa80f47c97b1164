// ABOUTME: Secure HTTP cookie utilities for session management
// ABOUTME: Provides httpOnly, Secure, SameSite cookie helpers for the auth token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Innerlens

//! Secure cookie utilities
//!
//! Helpers for setting and clearing the `auth_token` session cookie with
//! proper security flags, and for reading cookie values from request
//! headers. The `Secure` flag follows the configured public base URL
//! rather than being re-derived from the environment per call.

use axum::http::{header, HeaderMap, HeaderValue};

/// Name of the session cookie
pub const AUTH_COOKIE: &str = "auth_token";

/// Set the httpOnly session cookie
///
/// `secure` should come from `ServerConfig::uses_https`.
pub fn set_auth_cookie(headers: &mut HeaderMap, token: &str, max_age_secs: i64, secure: bool) {
    let mut cookie =
        format!("{AUTH_COOKIE}={token}; Max-Age={max_age_secs}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }

    if let Ok(header_value) = HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, header_value);
    }
}

/// Clear the session cookie
pub fn clear_auth_cookie(headers: &mut HeaderMap, secure: bool) {
    let mut cookie = format!("{AUTH_COOKIE}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }

    if let Ok(header_value) = HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, header_value);
    }
}

/// Extract a cookie value from request headers
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next()?.trim();

            if name == cookie_name {
                Some(value.to_owned())
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_is_extracted_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=abc123; lang=en"),
        );
        assert_eq!(
            get_cookie_value(&headers, AUTH_COOKIE).as_deref(),
            Some("abc123")
        );
        assert_eq!(get_cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn secure_flag_is_appended_only_for_https() {
        let mut headers = HeaderMap::new();
        set_auth_cookie(&mut headers, "tok", 3600, false);
        let value = headers[header::SET_COOKIE].to_str().ok();
        assert!(value.is_some_and(|v| !v.contains("Secure")));

        let mut headers = HeaderMap::new();
        set_auth_cookie(&mut headers, "tok", 3600, true);
        let value = headers[header::SET_COOKIE].to_str().ok();
        assert!(value.is_some_and(|v| v.contains("Secure") && v.contains("HttpOnly")));
    }
}
