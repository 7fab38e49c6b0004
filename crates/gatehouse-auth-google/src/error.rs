// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use gatehouse_signin_core::ProviderError;

/// Google Sign-In status codes, as surfaced by the platform SDKs.
pub mod status {
	pub const SIGN_IN_REQUIRED: i32 = 4;
	pub const NETWORK_ERROR: i32 = 7;
	pub const DEVELOPER_ERROR: i32 = 10;
	pub const SIGN_IN_FAILED: i32 = 12500;
	pub const SIGN_IN_CANCELLED: i32 = 12501;
}

/// Errors that can occur when building the client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("invalid endpoint URL: {0}")]
	InvalidEndpoint(#[from] url::ParseError),
}

/// Errors that can occur while resolving a sign-in.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
	/// The HTTP request to Google failed (network error, timeout, etc.).
	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	#[error("failed to parse response: {0}")]
	ParseError(String),

	/// Google's token endpoint rejected the request.
	#[error("Google API error ({error}): {message}")]
	GoogleError { error: String, message: String },

	/// The ID token could not be decoded, or its claims do not belong to this
	/// client.
	#[error("invalid ID token: {0}")]
	InvalidIdToken(String),

	#[error("user cancelled the Google sign-in flow")]
	Cancelled,

	/// The callback carried an `error` other than a user cancel.
	#[error("Google sign-in returned error: {0}")]
	CallbackError(String),

	#[error("callback is missing the authorization code")]
	MissingCode,

	#[error("no sign-in is pending")]
	NoPendingRequest,

	#[error("callback state does not match the pending sign-in")]
	StateMismatch,

	#[error("ID token nonce does not match the pending sign-in")]
	NonceMismatch,

	#[error("ID token carries no email claim")]
	MissingEmail,
}

impl OAuthError {
	/// The Google Sign-In status code this failure corresponds to.
	pub fn status_code(&self) -> i32 {
		match self {
			OAuthError::HttpRequest(_) => status::NETWORK_ERROR,
			OAuthError::GoogleError { error, .. } if is_client_misconfiguration(error) => {
				status::DEVELOPER_ERROR
			}
			OAuthError::Cancelled => status::SIGN_IN_CANCELLED,
			OAuthError::NoPendingRequest | OAuthError::StateMismatch | OAuthError::NonceMismatch => {
				status::SIGN_IN_REQUIRED
			}
			_ => status::SIGN_IN_FAILED,
		}
	}
}

fn is_client_misconfiguration(error: &str) -> bool {
	matches!(
		error,
		"invalid_client" | "unauthorized_client" | "redirect_uri_mismatch"
	)
}

impl From<OAuthError> for ProviderError {
	fn from(err: OAuthError) -> Self {
		let code = err.status_code();
		match err {
			OAuthError::Cancelled => ProviderError::Cancelled,
			OAuthError::HttpRequest(e) => ProviderError::NetworkFailure(e.to_string()),
			OAuthError::NoPendingRequest | OAuthError::StateMismatch | OAuthError::NonceMismatch => {
				ProviderError::Unauthorized(code)
			}
			_ => ProviderError::Unknown(code),
		}
	}
}
