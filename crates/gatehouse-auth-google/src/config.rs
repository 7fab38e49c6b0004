// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use gatehouse_common_secret::SecretString;
use gatehouse_config::GoogleConfig;
use url::Url;

use crate::error::ConfigError;

pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Where the client sends users and codes. Overridable so tests can point
/// the token exchange at a local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
	pub authorize_url: Url,
	pub token_url: Url,
}

impl GoogleEndpoints {
	pub fn new(authorize_url: &str, token_url: &str) -> Result<Self, ConfigError> {
		Ok(Self {
			authorize_url: Url::parse(authorize_url)?,
			token_url: Url::parse(token_url)?,
		})
	}
}

impl Default for GoogleEndpoints {
	fn default() -> Self {
		Self {
			authorize_url: Url::parse(GOOGLE_AUTHORIZE_URL).expect("invalid authorize URL"),
			token_url: Url::parse(GOOGLE_TOKEN_URL).expect("invalid token URL"),
		}
	}
}

/// Configuration for [`GoogleSignInClient`](crate::GoogleSignInClient).
///
/// The `client_secret` is wrapped in [`SecretString`] so it never reaches logs.
#[derive(Debug, Clone)]
pub struct GoogleSignInConfig {
	pub client_id: String,
	pub client_secret: SecretString,
	/// Callback URL registered with Google.
	pub redirect_uri: String,
	/// Must include `openid` and `email`.
	pub scopes: Vec<String>,
	pub endpoints: GoogleEndpoints,
}

impl GoogleSignInConfig {
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: SecretString::new(client_secret.into()),
			redirect_uri: redirect_uri.into(),
			scopes: vec![
				"openid".to_string(),
				"email".to_string(),
				"profile".to_string(),
			],
			endpoints: GoogleEndpoints::default(),
		}
	}

	pub fn with_endpoints(mut self, endpoints: GoogleEndpoints) -> Self {
		self.endpoints = endpoints;
		self
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::InvalidConfig("client_id cannot be empty".to_string()));
		}
		if self.client_secret.is_empty() {
			return Err(ConfigError::InvalidConfig("client_secret cannot be empty".to_string()));
		}
		if self.redirect_uri.is_empty() {
			return Err(ConfigError::InvalidConfig("redirect_uri cannot be empty".to_string()));
		}
		if !self.scopes.iter().any(|s| s == "email") {
			return Err(ConfigError::InvalidConfig(
				"scopes must include 'email'".to_string(),
			));
		}
		Ok(())
	}

	/// Space-separated scopes for the authorization URL.
	pub fn scopes_string(&self) -> String {
		self.scopes.join(" ")
	}
}

impl From<&GoogleConfig> for GoogleSignInConfig {
	fn from(config: &GoogleConfig) -> Self {
		Self {
			client_id: config.client_id.clone(),
			client_secret: config.client_secret.clone(),
			redirect_uri: config.redirect_uri.clone(),
			scopes: config.scopes.clone(),
			endpoints: GoogleEndpoints::default(),
		}
	}
}
