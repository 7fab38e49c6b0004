// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity Toolkit `accounts:signInWithIdp` wire types.

use gatehouse_common_secret::SecretString;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInWithIdpRequest<'a> {
	/// Form-encoded provider credential, `id_token=..&providerId=google.com`.
	pub post_body: String,
	pub request_uri: &'a str,
	pub return_idp_credential: bool,
	pub return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInWithIdpResponse {
	/// Firebase user id.
	pub local_id: String,
	pub email: Option<String>,
	pub provider_id: Option<String>,
	#[serde(default)]
	pub email_verified: bool,
	pub id_token: Option<SecretString>,
	pub refresh_token: Option<SecretString>,
	pub expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FirebaseErrorResponse {
	pub error: FirebaseErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FirebaseErrorBody {
	pub code: u16,
	pub message: String,
}
