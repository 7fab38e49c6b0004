// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Boundaries to the external SDKs the sign-in flow drives.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::account::{LaunchToken, ProviderAccount, ProviderResult, Session};
use crate::error::{AuthError, ProviderError};

/// Interactive identity provider (Google).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
	/// Prepare a new interactive flow. Any previous pending flow is replaced.
	fn sign_in_intent(&self) -> LaunchToken;

	/// Turn the flow's result into an account or a typed failure.
	async fn resolve_from_result(&self, result: ProviderResult) -> Result<ProviderAccount, ProviderError>;

	/// Invalidate any partially established provider session.
	fn sign_out(&self);
}

/// Handle returned by [`FederatedAuth::add_session_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

/// Called with the current session whenever it changes; `None` means inactive.
pub type SessionListener = Arc<dyn Fn(Option<&Session>) + Send + Sync>;

/// Federated auth backend (Firebase).
#[async_trait]
pub trait FederatedAuth: Send + Sync {
	/// Exchange a provider credential for a federated session. On success the
	/// session is active and listeners have been told.
	async fn sign_in_with_credential(&self, account: &ProviderAccount) -> Result<(), AuthError>;

	fn add_session_listener(&self, listener: SessionListener) -> ListenerId;

	/// Returns false if the id was not registered.
	fn remove_session_listener(&self, id: ListenerId) -> bool;

	fn current_session(&self) -> Option<Session>;
}

/// Opens the authorized destination. Not idempotent.
pub trait Navigator: Send + Sync {
	fn navigate_to_authorized_destination(&self);
}

impl<F> Navigator for F
where
	F: Fn() + Send + Sync,
{
	fn navigate_to_authorized_destination(&self) {
		self()
	}
}
