// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-in state machine.
//!
//! The orchestrator never performs I/O. Every input arrives as a
//! [`SignInEvent`] on one sequential queue and every effect leaves as a
//! [`SignInAction`] for the caller to execute in order.

use std::sync::Arc;

use gatehouse_auth_policy::{loggable_domain, AllowDecision, AllowPolicy, DEFAULT_UNAUTHORIZED_CODE};
use tracing::{debug, info, warn};

use crate::account::{ProviderAccount, ProviderResult};
use crate::attempt::{AttemptId, SignInAttempt, SignInStatus};
use crate::error::{AuthError, ProviderError, SignInFailure};
use crate::presentation::{admission_notice, FailureMessages, PresentationState, DEFAULT_PROGRESS_MESSAGE};
use crate::watcher::SessionWatcher;

/// A suspension point the runtime may bound with a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspension {
	Provider,
	Federation,
}

#[derive(Debug, Clone)]
pub enum SignInEvent {
	/// The user tapped sign-in.
	UserRequestedSignIn,
	/// The UI received the provider flow's result.
	ProviderResultAvailable(ProviderResult),
	/// The provider adapter finished resolving a result.
	ProviderResolved {
		attempt: AttemptId,
		result: Result<ProviderAccount, ProviderError>,
	},
	/// The credential exchange finished.
	FederationResolved {
		attempt: AttemptId,
		result: Result<(), AuthError>,
	},
	/// The auth backend reported a session change.
	SessionChanged { active: bool },
	SuspensionTimedOut { attempt: AttemptId, stage: Suspension },
}

/// Effects the caller performs, in order.
#[derive(Debug, Clone)]
pub enum SignInAction {
	/// Obtain a launch token and hand it to the UI.
	LaunchProvider { attempt: AttemptId },
	/// Resolve the provider result off the queue, then post `ProviderResolved`.
	ResolveProviderResult {
		attempt: AttemptId,
		result: ProviderResult,
	},
	SignOutProvider,
	/// Exchange the credential off the queue, then post `FederationResolved`.
	ExchangeCredential {
		attempt: AttemptId,
		account: ProviderAccount,
	},
	Navigate,
	Publish(PresentationState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
	pub progress_message: String,
	pub unauthorized_code: i32,
}

impl Default for OrchestratorSettings {
	fn default() -> Self {
		Self {
			progress_message: DEFAULT_PROGRESS_MESSAGE.to_string(),
			unauthorized_code: DEFAULT_UNAUTHORIZED_CODE,
		}
	}
}

pub struct SignInOrchestrator {
	policy: AllowPolicy,
	messages: FailureMessages,
	progress_message: String,
	attempt: Option<SignInAttempt>,
	resolving: bool,
	presentation: PresentationState,
	watcher: Arc<SessionWatcher>,
}

impl SignInOrchestrator {
	pub fn new(policy: AllowPolicy, settings: OrchestratorSettings, watcher: Arc<SessionWatcher>) -> Self {
		let messages = FailureMessages::new(policy.organization_domain(), settings.unauthorized_code);
		info!(
			organization_domain = policy.organization_domain(),
			allow_list_len = policy.allow_list_len(),
			unauthorized_code = settings.unauthorized_code,
			"creating sign-in orchestrator"
		);
		Self {
			policy,
			messages,
			progress_message: settings.progress_message,
			attempt: None,
			resolving: false,
			presentation: PresentationState::idle(),
			watcher,
		}
	}

	pub fn status(&self) -> &SignInStatus {
		static IDLE: SignInStatus = SignInStatus::Idle;
		self.attempt.as_ref().map_or(&IDLE, |a| &a.status)
	}

	pub fn attempt(&self) -> Option<&SignInAttempt> {
		self.attempt.as_ref()
	}

	pub fn presentation(&self) -> &PresentationState {
		&self.presentation
	}

	pub fn watcher(&self) -> &Arc<SessionWatcher> {
		&self.watcher
	}

	pub fn handle_event(&mut self, event: SignInEvent) -> Vec<SignInAction> {
		let from = self.status().name();
		debug!(state = from, event = event_name(&event), "handling event");

		match event {
			SignInEvent::UserRequestedSignIn => self.on_user_requested(),
			SignInEvent::ProviderResultAvailable(result) => self.on_provider_result(result),
			SignInEvent::ProviderResolved { attempt, result } => self.on_provider_resolved(attempt, result),
			SignInEvent::FederationResolved { attempt, result } => {
				self.on_federation_resolved(attempt, result)
			}
			SignInEvent::SessionChanged { active } => self.on_session_changed(active),
			SignInEvent::SuspensionTimedOut { attempt, stage } => self.on_timeout(attempt, stage),
		}
	}

	fn on_user_requested(&mut self) -> Vec<SignInAction> {
		if !self.status().accepts_new_attempt() {
			warn!(state = self.status().name(), "sign-in already in flight, ignoring request");
			return Vec::new();
		}

		let from = self.status().name();
		let attempt = SignInAttempt::start();
		let id = attempt.id;
		info!(attempt = %id, started_at = %attempt.started_at, from, to = "AwaitingProvider", "state transition");
		self.attempt = Some(attempt);
		self.resolving = false;
		self.presentation = PresentationState::in_progress(&self.progress_message);

		vec![
			SignInAction::Publish(self.presentation.clone()),
			SignInAction::LaunchProvider { attempt: id },
		]
	}

	fn on_provider_result(&mut self, result: ProviderResult) -> Vec<SignInAction> {
		let Some(id) = self.current_in(&SignInStatus::AwaitingProvider) else {
			debug!(state = self.status().name(), "provider result outside an attempt, ignoring");
			return Vec::new();
		};
		if self.resolving {
			debug!(attempt = %id, "provider result already being resolved, ignoring duplicate");
			return Vec::new();
		}
		self.resolving = true;
		vec![SignInAction::ResolveProviderResult { attempt: id, result }]
	}

	fn on_provider_resolved(
		&mut self,
		attempt: AttemptId,
		result: Result<ProviderAccount, ProviderError>,
	) -> Vec<SignInAction> {
		if !self.is_current(attempt, &SignInStatus::AwaitingProvider) {
			debug!(attempt = %attempt, "stale provider resolution, ignoring");
			return Vec::new();
		}
		self.resolving = false;

		let account = match result {
			Ok(account) => account,
			Err(err) => return self.fail(err.into()),
		};

		match self.policy.decide(&account.email) {
			AllowDecision::Admitted(rule) => {
				info!(attempt = %attempt, rule = ?rule, from = "AwaitingProvider", to = "AwaitingFederation", "state transition");
				self.set_status(SignInStatus::AwaitingFederation);
				self.presentation.notice = Some(admission_notice(rule).to_string());
				vec![
					SignInAction::Publish(self.presentation.clone()),
					SignInAction::ExchangeCredential { attempt, account },
				]
			}
			AllowDecision::DeniedUnauthorizedDomain => {
				warn!(
					attempt = %attempt,
					domain = loggable_domain(&account.email),
					"account rejected by allow policy"
				);
				// Sign-out must precede the visible failure.
				let mut actions = vec![SignInAction::SignOutProvider];
				actions.extend(self.fail(SignInFailure::PolicyDenied {
					email: account.email,
					code: self.messages.unauthorized_code(),
				}));
				actions
			}
		}
	}

	fn on_federation_resolved(&mut self, attempt: AttemptId, result: Result<(), AuthError>) -> Vec<SignInAction> {
		if !self.is_current(attempt, &SignInStatus::AwaitingFederation) {
			debug!(attempt = %attempt, "stale federation resolution, ignoring");
			return Vec::new();
		}

		if let Err(err) = result {
			return self.fail(err.into());
		}

		info!(attempt = %attempt, from = "AwaitingFederation", to = "Succeeded", "state transition");
		self.set_status(SignInStatus::Succeeded);
		self.presentation.hide_progress();

		let mut actions = vec![SignInAction::Publish(self.presentation.clone())];
		actions.extend(self.navigate_once());
		actions
	}

	fn on_session_changed(&mut self, active: bool) -> Vec<SignInAction> {
		if !self.watcher.is_listening() {
			debug!("session notification after unsubscribe, ignoring");
			return Vec::new();
		}
		if !active {
			debug!("session inactive");
			return Vec::new();
		}

		let mut actions = Vec::new();
		if self.presentation.progress_visible {
			self.presentation.hide_progress();
			actions.push(SignInAction::Publish(self.presentation.clone()));
		}
		actions.extend(self.navigate_once());
		actions
	}

	fn on_timeout(&mut self, attempt: AttemptId, stage: Suspension) -> Vec<SignInAction> {
		match stage {
			Suspension::Provider if self.is_current(attempt, &SignInStatus::AwaitingProvider) => {
				warn!(attempt = %attempt, "provider flow timed out");
				self.resolving = false;
				// Discard the pending request so a late result cannot resolve.
				let mut actions = vec![SignInAction::SignOutProvider];
				actions.extend(self.fail(
					ProviderError::NetworkFailure("timed out waiting for the provider".to_string()).into(),
				));
				actions
			}
			Suspension::Federation if self.is_current(attempt, &SignInStatus::AwaitingFederation) => {
				warn!(attempt = %attempt, "credential exchange timed out");
				self.fail(AuthError::ExchangeFailed("timed out".to_string()).into())
			}
			_ => {
				debug!(attempt = %attempt, stage = ?stage, "timer for a finished suspension, ignoring");
				Vec::new()
			}
		}
	}

	fn fail(&mut self, failure: SignInFailure) -> Vec<SignInAction> {
		let from = self.status().name();
		let message = self.messages.for_failure(&failure);
		warn!(error = %failure, from, to = "Failed", "state transition");

		self.presentation.hide_progress();
		self.presentation.notice = None;
		self.presentation.error_message = Some(message);
		self.set_status(SignInStatus::Failed(failure));

		vec![SignInAction::Publish(self.presentation.clone())]
	}

	fn navigate_once(&self) -> Option<SignInAction> {
		if self.watcher.claim_navigation() {
			info!("navigating to authorized destination");
			Some(SignInAction::Navigate)
		} else {
			debug!("navigation already performed");
			None
		}
	}

	fn set_status(&mut self, status: SignInStatus) {
		if let Some(attempt) = self.attempt.as_mut() {
			attempt.status = status;
		}
	}

	fn current_in(&self, status: &SignInStatus) -> Option<AttemptId> {
		self.attempt.as_ref().filter(|a| &a.status == status).map(|a| a.id)
	}

	fn is_current(&self, id: AttemptId, status: &SignInStatus) -> bool {
		self.current_in(status) == Some(id)
	}
}

fn event_name(event: &SignInEvent) -> &'static str {
	match event {
		SignInEvent::UserRequestedSignIn => "UserRequestedSignIn",
		SignInEvent::ProviderResultAvailable(_) => "ProviderResultAvailable",
		SignInEvent::ProviderResolved { .. } => "ProviderResolved",
		SignInEvent::FederationResolved { .. } => "FederationResolved",
		SignInEvent::SessionChanged { .. } => "SessionChanged",
		SignInEvent::SuspensionTimedOut { .. } => "SuspensionTimedOut",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::presentation::GENERIC_FAILURE_MESSAGE;
	use crate::testing::MemoryAuth;
	use crate::watcher::SessionSubscription;

	struct Harness {
		orchestrator: SignInOrchestrator,
		_subscription: SessionSubscription,
	}

	fn harness() -> Harness {
		let watcher = Arc::new(SessionWatcher::new());
		let subscription = watcher.subscribe(Arc::new(MemoryAuth::default()), |_| {});
		let policy = AllowPolicy::new("org.com", ["a@gmail.com"]);
		Harness {
			orchestrator: SignInOrchestrator::new(policy, OrchestratorSettings::default(), watcher),
			_subscription: subscription,
		}
	}

	fn start(o: &mut SignInOrchestrator) -> AttemptId {
		let actions = o.handle_event(SignInEvent::UserRequestedSignIn);
		match actions.last() {
			Some(SignInAction::LaunchProvider { attempt }) => *attempt,
			other => panic!("expected LaunchProvider, got {other:?}"),
		}
	}

	fn resolve(o: &mut SignInOrchestrator, id: AttemptId, email: &str) -> Vec<SignInAction> {
		o.handle_event(SignInEvent::ProviderResultAvailable(ProviderResult::default()));
		o.handle_event(SignInEvent::ProviderResolved {
			attempt: id,
			result: Ok(ProviderAccount::new(email, "id-token")),
		})
	}

	fn count_navigations(actions: &[SignInAction]) -> usize {
		actions
			.iter()
			.filter(|a| matches!(a, SignInAction::Navigate))
			.count()
	}

	#[test]
	fn tap_shows_progress_and_launches_provider() {
		let mut h = harness();
		let actions = h.orchestrator.handle_event(SignInEvent::UserRequestedSignIn);

		assert_eq!(actions.len(), 2);
		match &actions[0] {
			SignInAction::Publish(state) => {
				assert!(state.progress_visible);
				assert_eq!(state.progress_message.as_deref(), Some("Signing in..."));
			}
			other => panic!("expected Publish, got {other:?}"),
		}
		assert!(matches!(actions[1], SignInAction::LaunchProvider { .. }));
		assert_eq!(h.orchestrator.status(), &SignInStatus::AwaitingProvider);
	}

	#[test]
	fn repeated_taps_while_in_flight_are_ignored() {
		let mut h = harness();
		let id = start(&mut h.orchestrator);

		assert!(h.orchestrator.handle_event(SignInEvent::UserRequestedSignIn).is_empty());
		resolve(&mut h.orchestrator, id, "x@org.com");
		assert!(h.orchestrator.handle_event(SignInEvent::UserRequestedSignIn).is_empty());
		assert_eq!(h.orchestrator.attempt().map(|a| a.id), Some(id));
	}

	#[test]
	fn duplicate_provider_result_is_resolved_once() {
		let mut h = harness();
		start(&mut h.orchestrator);
		let first = h
			.orchestrator
			.handle_event(SignInEvent::ProviderResultAvailable(ProviderResult::default()));
		let second = h
			.orchestrator
			.handle_event(SignInEvent::ProviderResultAvailable(ProviderResult::default()));
		assert_eq!(first.len(), 1);
		assert!(second.is_empty());
	}

	#[test]
	fn organization_account_happy_path_navigates_once() {
		let mut h = harness();
		let id = start(&mut h.orchestrator);

		let actions = resolve(&mut h.orchestrator, id, "x@org.com");
		assert!(matches!(actions.last(), Some(SignInAction::ExchangeCredential { .. })));
		assert_eq!(h.orchestrator.status(), &SignInStatus::AwaitingFederation);
		assert_eq!(
			h.orchestrator.presentation().notice.as_deref(),
			Some("Signed in with organization email")
		);

		let mut navigations = 0;
		let done = h.orchestrator.handle_event(SignInEvent::FederationResolved {
			attempt: id,
			result: Ok(()),
		});
		navigations += count_navigations(&done);
		let session = h
			.orchestrator
			.handle_event(SignInEvent::SessionChanged { active: true });
		navigations += count_navigations(&session);

		assert_eq!(navigations, 1);
		assert_eq!(h.orchestrator.status(), &SignInStatus::Succeeded);
		assert!(!h.orchestrator.presentation().progress_visible);
	}

	#[test]
	fn session_notification_before_exchange_result_navigates_once() {
		let mut h = harness();
		let id = start(&mut h.orchestrator);
		resolve(&mut h.orchestrator, id, "a@gmail.com");

		let session = h
			.orchestrator
			.handle_event(SignInEvent::SessionChanged { active: true });
		assert_eq!(count_navigations(&session), 1);
		assert!(!h.orchestrator.presentation().progress_visible);

		let done = h.orchestrator.handle_event(SignInEvent::FederationResolved {
			attempt: id,
			result: Ok(()),
		});
		assert_eq!(count_navigations(&done), 0);
		assert_eq!(h.orchestrator.status(), &SignInStatus::Succeeded);
	}

	#[test]
	fn denied_account_signs_out_before_failure_is_visible() {
		let mut h = harness();
		let id = start(&mut h.orchestrator);

		let actions = resolve(&mut h.orchestrator, id, "x@evil.com");
		assert!(matches!(actions[0], SignInAction::SignOutProvider));
		match &actions[1] {
			SignInAction::Publish(state) => {
				assert!(!state.progress_visible);
				assert_eq!(
					state.error_message.as_deref(),
					Some("Please use your org.com email address")
				);
			}
			other => panic!("expected Publish, got {other:?}"),
		}
		assert!(!actions
			.iter()
			.any(|a| matches!(a, SignInAction::ExchangeCredential { .. })));

		match h.orchestrator.status() {
			SignInStatus::Failed(SignInFailure::PolicyDenied { email, code }) => {
				assert_eq!(email, "x@evil.com");
				assert_eq!(*code, DEFAULT_UNAUTHORIZED_CODE);
			}
			other => panic!("expected PolicyDenied, got {other:?}"),
		}
	}

	#[test]
	fn cancelled_flow_fails_without_sign_out_or_exchange() {
		let mut h = harness();
		let id = start(&mut h.orchestrator);
		h.orchestrator
			.handle_event(SignInEvent::ProviderResultAvailable(ProviderResult::cancelled()));
		let actions = h.orchestrator.handle_event(SignInEvent::ProviderResolved {
			attempt: id,
			result: Err(ProviderError::Cancelled),
		});

		assert_eq!(actions.len(), 1);
		match &actions[0] {
			SignInAction::Publish(state) => {
				assert!(!state.progress_visible);
				assert_eq!(state.error_message.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
			}
			other => panic!("expected Publish, got {other:?}"),
		}
		assert_eq!(
			h.orchestrator.status(),
			&SignInStatus::Failed(ProviderError::Cancelled.into())
		);
	}

	#[test]
	fn exchange_failure_shows_generic_message_and_allows_retry() {
		let mut h = harness();
		let id = start(&mut h.orchestrator);
		resolve(&mut h.orchestrator, id, "x@org.com");

		h.orchestrator.handle_event(SignInEvent::FederationResolved {
			attempt: id,
			result: Err(AuthError::ExchangeFailed("INVALID_IDP_RESPONSE".to_string())),
		});
		let state = h.orchestrator.presentation();
		assert!(!state.progress_visible);
		assert_eq!(state.error_message.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
		assert!(state.notice.is_none());

		let retry = start(&mut h.orchestrator);
		assert_ne!(retry, id);
		assert!(h.orchestrator.presentation().error_message.is_none());
	}

	#[test]
	fn stale_completions_are_dropped() {
		let mut h = harness();
		let first = start(&mut h.orchestrator);
		h.orchestrator.handle_event(SignInEvent::ProviderResolved {
			attempt: first,
			result: Err(ProviderError::Cancelled),
		});
		let second = start(&mut h.orchestrator);

		let late = h.orchestrator.handle_event(SignInEvent::ProviderResolved {
			attempt: first,
			result: Ok(ProviderAccount::new("x@org.com", "t")),
		});
		assert!(late.is_empty());
		assert_eq!(h.orchestrator.status(), &SignInStatus::AwaitingProvider);
		assert_eq!(h.orchestrator.attempt().map(|a| a.id), Some(second));
	}

	#[test]
	fn provider_timeout_fails_attempt() {
		let mut h = harness();
		let id = start(&mut h.orchestrator);
		let actions = h.orchestrator.handle_event(SignInEvent::SuspensionTimedOut {
			attempt: id,
			stage: Suspension::Provider,
		});
		assert!(matches!(actions[0], SignInAction::SignOutProvider));
		assert!(matches!(
			h.orchestrator.status(),
			SignInStatus::Failed(SignInFailure::Provider(ProviderError::NetworkFailure(_)))
		));

		let late = h.orchestrator.handle_event(SignInEvent::ProviderResolved {
			attempt: id,
			result: Ok(ProviderAccount::new("x@org.com", "t")),
		});
		assert!(late.is_empty());
	}

	#[test]
	fn timeout_for_finished_stage_is_ignored() {
		let mut h = harness();
		let id = start(&mut h.orchestrator);
		resolve(&mut h.orchestrator, id, "x@org.com");

		let actions = h.orchestrator.handle_event(SignInEvent::SuspensionTimedOut {
			attempt: id,
			stage: Suspension::Provider,
		});
		assert!(actions.is_empty());
		assert_eq!(h.orchestrator.status(), &SignInStatus::AwaitingFederation);

		h.orchestrator.handle_event(SignInEvent::SuspensionTimedOut {
			attempt: id,
			stage: Suspension::Federation,
		});
		assert_eq!(
			h.orchestrator.status(),
			&SignInStatus::Failed(AuthError::ExchangeFailed("timed out".to_string()).into())
		);
	}

	#[test]
	fn session_notification_after_unsubscribe_is_ignored() {
		let watcher = Arc::new(SessionWatcher::new());
		let subscription = watcher.subscribe(Arc::new(MemoryAuth::default()), |_| {});
		let mut o = SignInOrchestrator::new(
			AllowPolicy::new("org.com", Vec::<String>::new()),
			OrchestratorSettings::default(),
			Arc::clone(&watcher),
		);
		subscription.release();

		let actions = o.handle_event(SignInEvent::SessionChanged { active: true });
		assert!(actions.is_empty());
		assert!(!watcher.has_navigated());
	}

	#[test]
	fn inactive_session_does_nothing() {
		let mut h = harness();
		start(&mut h.orchestrator);
		let actions = h
			.orchestrator
			.handle_event(SignInEvent::SessionChanged { active: false });
		assert!(actions.is_empty());
		assert!(h.orchestrator.presentation().progress_visible);
	}

	#[test]
	fn allow_listed_account_gets_allow_list_notice() {
		let mut h = harness();
		let id = start(&mut h.orchestrator);
		resolve(&mut h.orchestrator, id, "a@gmail.com");
		assert_eq!(
			h.orchestrator.presentation().notice.as_deref(),
			Some("Signed in with allow-listed email")
		);
	}
}
