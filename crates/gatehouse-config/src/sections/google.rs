// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Google Sign-In (OAuth 2.0 / OIDC) section.

use gatehouse_common_secret::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_scopes() -> Vec<String> {
	vec![
		"openid".to_string(),
		"email".to_string(),
		"profile".to_string(),
	]
}

/// Configuration layer for Google Sign-In (all fields optional for layering).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleConfigLayer {
	pub client_id: Option<String>,
	#[serde(skip_serializing)]
	pub client_secret: Option<SecretString>,
	pub redirect_uri: Option<String>,
	pub scopes: Option<Vec<String>>,
}

impl GoogleConfigLayer {
	/// Merge with another layer, preferring values from `other`.
	pub fn merge(&mut self, other: GoogleConfigLayer) {
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.client_secret.is_some() {
			self.client_secret = other.client_secret;
		}
		if other.redirect_uri.is_some() {
			self.redirect_uri = other.redirect_uri;
		}
		if other.scopes.is_some() {
			self.scopes = other.scopes;
		}
	}

	/// Build the final config, returning `None` when no client id is set.
	pub fn build(self) -> Result<Option<GoogleConfig>, ConfigError> {
		let Some(client_id) = self.client_id.filter(|s| !s.is_empty()) else {
			return Ok(None);
		};

		let client_secret = self
			.client_secret
			.filter(|s| !s.is_empty())
			.ok_or_else(|| {
				ConfigError::Validation(
					"google.client_secret is required when google.client_id is set".to_string(),
				)
			})?;

		let redirect_uri = self.redirect_uri.filter(|s| !s.is_empty()).ok_or_else(|| {
			ConfigError::Validation(
				"google.redirect_uri is required when google.client_id is set".to_string(),
			)
		})?;

		let scopes = self.scopes.unwrap_or_else(default_scopes);
		if !scopes.iter().any(|s| s == "openid") || !scopes.iter().any(|s| s == "email") {
			return Err(ConfigError::invalid_value(
				"google.scopes",
				"must include 'openid' and 'email'",
			));
		}

		Ok(Some(GoogleConfig {
			client_id,
			client_secret,
			redirect_uri,
			scopes,
		}))
	}
}

/// Validated Google Sign-In configuration.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
	pub client_id: String,
	pub client_secret: SecretString,
	pub redirect_uri: String,
	pub scopes: Vec<String>,
}
