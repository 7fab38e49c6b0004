// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SignInFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub Uuid);

impl AttemptId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for AttemptId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for AttemptId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum SignInStatus {
	Idle,
	AwaitingProvider,
	AwaitingFederation,
	Succeeded,
	Failed(SignInFailure),
}

impl SignInStatus {
	pub fn name(&self) -> &'static str {
		match self {
			SignInStatus::Idle => "Idle",
			SignInStatus::AwaitingProvider => "AwaitingProvider",
			SignInStatus::AwaitingFederation => "AwaitingFederation",
			SignInStatus::Succeeded => "Succeeded",
			SignInStatus::Failed(_) => "Failed",
		}
	}

	/// Whether a new user action may start an attempt from this status.
	pub fn accepts_new_attempt(&self) -> bool {
		matches!(
			self,
			SignInStatus::Idle | SignInStatus::Succeeded | SignInStatus::Failed(_)
		)
	}
}

/// One user-initiated cycle from action to terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInAttempt {
	pub id: AttemptId,
	pub status: SignInStatus,
	pub started_at: DateTime<Utc>,
}

impl SignInAttempt {
	pub fn start() -> Self {
		Self {
			id: AttemptId::new(),
			status: SignInStatus::AwaitingProvider,
			started_at: Utc::now(),
		}
	}
}
