// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! What the UI shows: progress indicator, last error, informational notice.

use gatehouse_auth_policy::AdmissionRule;
use serde::{Deserialize, Serialize};

use crate::error::SignInFailure;

pub const DEFAULT_PROGRESS_MESSAGE: &str = "Signing in...";

pub const GENERIC_FAILURE_MESSAGE: &str =
	"Authentication failed: ensure you have an internet connection and a Google account selected.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationState {
	/// Blocking progress indicator.
	pub progress_visible: bool,
	pub progress_message: Option<String>,
	/// Message for the most recent failure. Cleared when a new attempt starts.
	pub error_message: Option<String>,
	/// Short confirmation shown once the account has been admitted.
	pub notice: Option<String>,
}

impl PresentationState {
	pub fn idle() -> Self {
		Self::default()
	}

	pub fn in_progress(message: impl Into<String>) -> Self {
		Self {
			progress_visible: true,
			progress_message: Some(message.into()),
			error_message: None,
			notice: None,
		}
	}

	/// Hide the indicator. Safe to call when already hidden.
	pub fn hide_progress(&mut self) {
		self.progress_visible = false;
		self.progress_message = None;
	}
}

/// Messages shown for failures, parameterised by the organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMessages {
	organization_domain: String,
	unauthorized_code: i32,
}

impl FailureMessages {
	pub fn new(organization_domain: impl Into<String>, unauthorized_code: i32) -> Self {
		Self {
			organization_domain: organization_domain.into(),
			unauthorized_code,
		}
	}

	pub fn unauthorized_code(&self) -> i32 {
		self.unauthorized_code
	}

	pub fn organization_email(&self) -> String {
		format!("Please use your {} email address", self.organization_domain)
	}

	/// Pick the user-facing message for a failure. Policy rejections, and
	/// provider errors carrying the reserved code, ask for an organization
	/// address; everything else gets the generic message.
	pub fn for_failure(&self, failure: &SignInFailure) -> String {
		match failure {
			SignInFailure::PolicyDenied { .. } => self.organization_email(),
			other if other.unauthorized_code() == Some(self.unauthorized_code) => {
				self.organization_email()
			}
			_ => GENERIC_FAILURE_MESSAGE.to_string(),
		}
	}
}

pub fn admission_notice(rule: AdmissionRule) -> &'static str {
	match rule {
		AdmissionRule::OrganizationDomain => "Signed in with organization email",
		AdmissionRule::AllowListed => "Signed in with allow-listed email",
	}
}
