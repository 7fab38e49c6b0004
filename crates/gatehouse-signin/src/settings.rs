// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use gatehouse_config::{PolicyConfig, SignInConfig};
use gatehouse_signin_core::{OrchestratorSettings, DEFAULT_PROGRESS_MESSAGE, DEFAULT_UNAUTHORIZED_CODE};

/// Runtime settings for one sign-in screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInSettings {
	pub progress_message: String,
	pub unauthorized_code: i32,
	/// Bound on the interactive provider step. `None` waits indefinitely.
	pub provider_timeout: Option<Duration>,
	/// Bound on the credential exchange. `None` waits indefinitely.
	pub federation_timeout: Option<Duration>,
}

impl Default for SignInSettings {
	fn default() -> Self {
		Self {
			progress_message: DEFAULT_PROGRESS_MESSAGE.to_string(),
			unauthorized_code: DEFAULT_UNAUTHORIZED_CODE,
			provider_timeout: None,
			federation_timeout: None,
		}
	}
}

impl SignInSettings {
	pub fn from_config(policy: &PolicyConfig, signin: &SignInConfig) -> Self {
		Self {
			progress_message: signin.progress_message.clone(),
			unauthorized_code: policy.unauthorized_code,
			provider_timeout: signin.provider_timeout,
			federation_timeout: signin.federation_timeout,
		}
	}

	pub(crate) fn orchestrator(&self) -> OrchestratorSettings {
		OrchestratorSettings {
			progress_message: self.progress_message.clone(),
			unauthorized_code: self.unauthorized_code,
		}
	}
}
