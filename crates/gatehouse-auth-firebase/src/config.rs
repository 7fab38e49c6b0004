// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use gatehouse_common_secret::SecretString;
use gatehouse_config::FirebaseConfig;

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

#[derive(Debug, Clone)]
pub struct FirebaseAuthConfig {
	/// Web API key of the Firebase project.
	pub api_key: SecretString,
	/// Continue URI reported with each exchange.
	pub request_uri: String,
	/// Identity Toolkit base URL, without a trailing slash.
	pub endpoint: String,
}

impl FirebaseAuthConfig {
	pub fn new(api_key: impl Into<String>) -> Self {
		Self {
			api_key: SecretString::new(api_key.into()),
			request_uri: "http://localhost".to_string(),
			endpoint: IDENTITY_TOOLKIT_URL.to_string(),
		}
	}

	pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = endpoint.into().trim_end_matches('/').to_string();
		self
	}

	pub(crate) fn sign_in_with_idp_url(&self) -> String {
		format!("{}/v1/accounts:signInWithIdp", self.endpoint)
	}
}

impl From<&FirebaseConfig> for FirebaseAuthConfig {
	fn from(config: &FirebaseConfig) -> Self {
		Self {
			api_key: config.api_key.clone(),
			request_uri: config.request_uri.clone(),
			endpoint: IDENTITY_TOOLKIT_URL.to_string(),
		}
	}
}
