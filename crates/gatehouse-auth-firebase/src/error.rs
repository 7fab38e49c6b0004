// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use gatehouse_signin_core::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum FirebaseError {
	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	/// The Identity Toolkit rejected the request, e.g. `INVALID_IDP_RESPONSE`.
	#[error("Identity Toolkit error {code}: {message}")]
	Api { code: u16, message: String },

	#[error("failed to parse response: {0}")]
	ParseError(String),
}

// The sign-in flow treats every exchange failure alike; the detail is kept
// for logs.
impl From<FirebaseError> for AuthError {
	fn from(err: FirebaseError) -> Self {
		AuthError::ExchangeFailed(err.to_string())
	}
}
