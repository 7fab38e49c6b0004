// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Firebase Authentication section.

use gatehouse_common_secret::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_request_uri() -> String {
	"http://localhost".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirebaseConfigLayer {
	#[serde(skip_serializing)]
	pub api_key: Option<SecretString>,
	/// Continue URI reported to the Identity Toolkit with each exchange.
	pub request_uri: Option<String>,
}

impl FirebaseConfigLayer {
	pub fn merge(&mut self, other: FirebaseConfigLayer) {
		if other.api_key.is_some() {
			self.api_key = other.api_key;
		}
		if other.request_uri.is_some() {
			self.request_uri = other.request_uri;
		}
	}

	/// Build the final config, returning `None` when no API key is set.
	pub fn build(self) -> Result<Option<FirebaseConfig>, ConfigError> {
		let Some(api_key) = self.api_key.filter(|k| !k.is_empty()) else {
			return Ok(None);
		};

		let request_uri = self.request_uri.unwrap_or_else(default_request_uri);
		if !(request_uri.starts_with("http://") || request_uri.starts_with("https://")) {
			return Err(ConfigError::invalid_value(
				"firebase.request_uri",
				format!("'{request_uri}' must be an http(s) URL"),
			));
		}

		Ok(Some(FirebaseConfig {
			api_key,
			request_uri,
		}))
	}
}

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
	pub api_key: SecretString,
	pub request_uri: String,
}
