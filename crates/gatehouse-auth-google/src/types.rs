// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types for Google's token endpoint and ID token.

use gatehouse_common_secret::SecretString;
use serde::{Deserialize, Serialize};

/// Response from Google's token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTokenResponse {
	#[serde(deserialize_with = "deserialize_secret_string")]
	pub access_token: SecretString,
	/// Signed JWT with the user's identity claims. Handed on to Firebase.
	#[serde(deserialize_with = "deserialize_secret_string")]
	pub id_token: SecretString,
	pub token_type: String,
	pub expires_in: u64,
	#[serde(default)]
	pub scope: String,
}

fn deserialize_secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let s = String::deserialize(deserializer)?;
	Ok(SecretString::new(s))
}

/// Claims from a decoded Google ID token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleIdTokenClaims {
	pub iss: String,
	pub sub: String,
	/// Must match the client id.
	pub aud: String,
	pub exp: u64,
	pub iat: u64,
	pub email: Option<String>,
	pub email_verified: Option<bool>,
	pub name: Option<String>,
	/// Hosted domain, present for Google Workspace accounts.
	pub hd: Option<String>,
	/// Echo of the nonce sent with the authorization request.
	pub nonce: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleErrorResponse {
	pub error: String,
	pub error_description: Option<String>,
}
