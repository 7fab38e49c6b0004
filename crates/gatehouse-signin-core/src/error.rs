// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Failure taxonomy for a sign-in attempt.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures reported by the identity provider adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum ProviderError {
	#[error("sign-in cancelled by user")]
	Cancelled,

	#[error("network failure: {0}")]
	NetworkFailure(String),

	#[error("unauthorized (status {0})")]
	Unauthorized(i32),

	#[error("provider error (status {0})")]
	Unknown(i32),
}

/// Failures reported by the federated auth backend.
///
/// The backend does not distinguish causes at this layer; the detail string
/// is for logs only.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum AuthError {
	#[error("credential exchange failed: {0}")]
	ExchangeFailed(String),
}

/// Why a sign-in attempt ended in `Failed`.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum SignInFailure {
	#[error(transparent)]
	Provider(ProviderError),

	/// The provider vouched for the account but the allow policy rejected it.
	#[error("{email} is not permitted (status {code})")]
	PolicyDenied { email: String, code: i32 },

	#[error(transparent)]
	Auth(AuthError),
}

impl SignInFailure {
	/// Status code of an authorization-specific failure, if this is one.
	pub fn unauthorized_code(&self) -> Option<i32> {
		match self {
			SignInFailure::PolicyDenied { code, .. } => Some(*code),
			SignInFailure::Provider(ProviderError::Unauthorized(code)) => Some(*code),
			_ => None,
		}
	}
}

impl From<ProviderError> for SignInFailure {
	fn from(err: ProviderError) -> Self {
		SignInFailure::Provider(err)
	}
}

impl From<AuthError> for SignInFailure {
	fn from(err: AuthError) -> Self {
		SignInFailure::Auth(err)
	}
}
