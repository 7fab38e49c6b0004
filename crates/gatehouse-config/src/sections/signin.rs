// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-in runtime section: progress text and suspension timeouts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_progress_message() -> String {
	"Signing in...".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SignInConfigLayer {
	pub progress_message: Option<String>,
	/// Upper bound on the interactive Google step. Unset means wait forever.
	pub provider_timeout_secs: Option<u64>,
	/// Upper bound on the Firebase credential exchange. Unset means wait forever.
	pub federation_timeout_secs: Option<u64>,
}

impl SignInConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.progress_message.is_some() {
			self.progress_message = other.progress_message;
		}
		if other.provider_timeout_secs.is_some() {
			self.provider_timeout_secs = other.provider_timeout_secs;
		}
		if other.federation_timeout_secs.is_some() {
			self.federation_timeout_secs = other.federation_timeout_secs;
		}
	}

	pub fn finalize(self) -> Result<SignInConfig, ConfigError> {
		let provider_timeout = non_zero_secs("signin.provider_timeout_secs", self.provider_timeout_secs)?;
		let federation_timeout =
			non_zero_secs("signin.federation_timeout_secs", self.federation_timeout_secs)?;

		Ok(SignInConfig {
			progress_message: self
				.progress_message
				.filter(|m| !m.trim().is_empty())
				.unwrap_or_else(default_progress_message),
			provider_timeout,
			federation_timeout,
		})
	}
}

fn non_zero_secs(key: &str, secs: Option<u64>) -> Result<Option<Duration>, ConfigError> {
	match secs {
		Some(0) => Err(ConfigError::invalid_value(
			key,
			"must be greater than zero; leave unset to disable",
		)),
		Some(s) => Ok(Some(Duration::from_secs(s))),
		None => Ok(None),
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignInConfig {
	pub progress_message: String,
	pub provider_timeout: Option<Duration>,
	pub federation_timeout: Option<Duration>,
}

impl Default for SignInConfig {
	fn default() -> Self {
		Self {
			progress_message: default_progress_message(),
			provider_timeout: None,
			federation_timeout: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_have_no_timeouts() {
		let config = SignInConfigLayer::default().finalize().unwrap();
		assert_eq!(config, SignInConfig::default());
		assert_eq!(config.progress_message, "Signing in...");
	}

	#[test]
	fn timeouts_convert_to_durations() {
		let config = SignInConfigLayer {
			provider_timeout_secs: Some(120),
			federation_timeout_secs: Some(30),
			..Default::default()
		}
		.finalize()
		.unwrap();

		assert_eq!(config.provider_timeout, Some(Duration::from_secs(120)));
		assert_eq!(config.federation_timeout, Some(Duration::from_secs(30)));
	}

	#[test]
	fn zero_timeout_is_rejected() {
		let layer = SignInConfigLayer {
			federation_timeout_secs: Some(0),
			..Default::default()
		};
		let err = layer.finalize().unwrap_err();
		assert!(err.to_string().contains("federation_timeout_secs"));
	}

	#[test]
	fn blank_progress_message_falls_back() {
		let config = SignInConfigLayer {
			progress_message: Some("  ".to_string()),
			..Default::default()
		}
		.finalize()
		.unwrap();
		assert_eq!(config.progress_message, "Signing in...");
	}

	#[test]
	fn merge_prefers_other() {
		let mut base = SignInConfigLayer {
			progress_message: Some("Connecting...".to_string()),
			provider_timeout_secs: Some(60),
			federation_timeout_secs: None,
		};
		base.merge(SignInConfigLayer {
			provider_timeout_secs: Some(90),
			..Default::default()
		});
		assert_eq!(base.progress_message.as_deref(), Some("Connecting..."));
		assert_eq!(base.provider_timeout_secs, Some(90));
	}
}
