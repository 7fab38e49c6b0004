// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client for the identity adapters.
//!
//! Google's token endpoint and the Identity Toolkit both see the same
//! User-Agent, so requests from the gate can be told apart in provider logs.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Connect timeout applied to every adapter client. The request itself is
/// left unbounded here; the sign-in runtime owns the overall timeout policy.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client builder with the Gatehouse User-Agent and connect timeout applied.
///
/// ```ignore
/// let client = gatehouse_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.connect_timeout(CONNECT_TIMEOUT)
}

/// `gatehouse/{version}`
pub fn user_agent() -> String {
	format!("gatehouse/{}", env!("CARGO_PKG_VERSION"))
}
