// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core of the Gatehouse sign-in flow.
//!
//! A Google account proves identity, the organization allow policy decides
//! admission, and a Firebase session is established before the dashboard
//! opens. This crate holds the state machine and the traits for the external
//! SDKs; it performs no I/O of its own.

pub mod account;
pub mod attempt;
pub mod collaborators;
pub mod error;
pub mod orchestrator;
pub mod presentation;
pub mod watcher;

#[cfg(test)]
mod testing;

pub use account::{LaunchToken, ProviderAccount, ProviderResult, Session};
pub use attempt::{AttemptId, SignInAttempt, SignInStatus};
pub use collaborators::{FederatedAuth, IdentityProvider, ListenerId, Navigator, SessionListener};
pub use error::{AuthError, ProviderError, SignInFailure};
pub use gatehouse_auth_policy::{
	is_distinct_unauthorized_code, loggable_domain, AdmissionRule, AllowDecision, AllowPolicy, DEFAULT_UNAUTHORIZED_CODE,
	PROVIDER_STATUS_CODES,
};
pub use orchestrator::{OrchestratorSettings, SignInAction, SignInEvent, SignInOrchestrator, Suspension};
pub use presentation::{FailureMessages, PresentationState, DEFAULT_PROGRESS_MESSAGE, GENERIC_FAILURE_MESSAGE};
pub use watcher::{SessionSubscription, SessionWatcher};
