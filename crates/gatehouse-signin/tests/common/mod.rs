// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory collaborators for driving the runtime end to end.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gatehouse_signin::{Collaborators, SignInController, SignInRuntime, SignInSettings};
use gatehouse_signin_core::{
	AllowPolicy, AuthError, FederatedAuth, IdentityProvider, LaunchToken, ListenerId, Navigator, PresentationState,
	ProviderAccount, ProviderError, ProviderResult, Session, SessionListener, SignInStatus,
};
use parking_lot::Mutex;
use tokio::sync::watch;

pub const ORG_DOMAIN: &str = "org.com";

/// Identity provider that replays queued outcomes in order.
#[derive(Default)]
pub struct ScriptedProvider {
	outcomes: Mutex<VecDeque<Result<ProviderAccount, ProviderError>>>,
	intents: AtomicUsize,
	resolutions: AtomicUsize,
	/// For each sign-out, whether an error was already on screen.
	sign_outs: Mutex<Vec<bool>>,
	observed: Mutex<Option<watch::Receiver<PresentationState>>>,
}

impl ScriptedProvider {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn push(&self, outcome: Result<ProviderAccount, ProviderError>) {
		self.outcomes.lock().push_back(outcome);
	}

	pub fn push_account(&self, email: &str) {
		self.push(Ok(ProviderAccount::new(email, format!("id-token-for-{email}"))));
	}

	/// Record what the UI showed at each sign-out.
	pub fn observe(&self, presentation: watch::Receiver<PresentationState>) {
		*self.observed.lock() = Some(presentation);
	}

	pub fn intents(&self) -> usize {
		self.intents.load(Ordering::SeqCst)
	}

	pub fn resolutions(&self) -> usize {
		self.resolutions.load(Ordering::SeqCst)
	}

	pub fn sign_outs(&self) -> Vec<bool> {
		self.sign_outs.lock().clone()
	}
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
	fn sign_in_intent(&self) -> LaunchToken {
		let n = self.intents.fetch_add(1, Ordering::SeqCst);
		LaunchToken {
			authorization_url: format!("https://accounts.example.test/auth?state=s{n}"),
			state: format!("s{n}"),
		}
	}

	async fn resolve_from_result(&self, _result: ProviderResult) -> Result<ProviderAccount, ProviderError> {
		self.resolutions.fetch_add(1, Ordering::SeqCst);
		self
			.outcomes
			.lock()
			.pop_front()
			.unwrap_or(Err(ProviderError::Unknown(-1)))
	}

	fn sign_out(&self) {
		let error_visible = self
			.observed
			.lock()
			.as_ref()
			.map(|rx| rx.borrow().error_message.is_some())
			.unwrap_or(false);
		self.sign_outs.lock().push(error_visible);
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeMode {
	Succeed,
	Fail,
	Hang,
}

/// Federation bridge that activates a session in memory. Listeners are
/// told about the current session as soon as they register, and about a new
/// session before the exchange call returns.
pub struct MemoryFederation {
	mode: ExchangeMode,
	session: Mutex<Option<Session>>,
	listeners: Mutex<BTreeMap<u64, SessionListener>>,
	next_listener: AtomicU64,
	exchanges: AtomicUsize,
}

impl MemoryFederation {
	pub fn new(mode: ExchangeMode) -> Arc<Self> {
		Arc::new(Self {
			mode,
			session: Mutex::new(None),
			listeners: Mutex::new(BTreeMap::new()),
			next_listener: AtomicU64::new(1),
			exchanges: AtomicUsize::new(0),
		})
	}

	pub fn with_session(mode: ExchangeMode, uid: &str) -> Arc<Self> {
		let federation = Self::new(mode);
		*federation.session.lock() = Some(session(uid));
		federation
	}

	pub fn exchanges(&self) -> usize {
		self.exchanges.load(Ordering::SeqCst)
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.lock().len()
	}

	pub fn set_session(&self, session: Option<Session>) {
		*self.session.lock() = session.clone();
		let listeners: Vec<SessionListener> = self.listeners.lock().values().cloned().collect();
		for listener in listeners {
			listener(session.as_ref());
		}
	}
}

#[async_trait]
impl FederatedAuth for MemoryFederation {
	async fn sign_in_with_credential(&self, account: &ProviderAccount) -> Result<(), AuthError> {
		self.exchanges.fetch_add(1, Ordering::SeqCst);
		match self.mode {
			ExchangeMode::Succeed => {
				self.set_session(Some(Session {
					uid: format!("uid-{}", account.email),
					email: Some(account.email.clone()),
				}));
				Ok(())
			}
			ExchangeMode::Fail => Err(AuthError::ExchangeFailed("INVALID_IDP_RESPONSE".to_string())),
			ExchangeMode::Hang => std::future::pending().await,
		}
	}

	fn add_session_listener(&self, listener: SessionListener) -> ListenerId {
		let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
		self.listeners.lock().insert(id, Arc::clone(&listener));
		let current = self.session.lock().clone();
		listener(current.as_ref());
		ListenerId(id)
	}

	fn remove_session_listener(&self, id: ListenerId) -> bool {
		self.listeners.lock().remove(&id.0).is_some()
	}

	fn current_session(&self) -> Option<Session> {
		self.session.lock().clone()
	}
}

/// Counts navigations and lets tests await them.
pub struct CountingNavigator {
	count: watch::Sender<usize>,
}

impl CountingNavigator {
	pub fn new() -> Arc<Self> {
		Arc::new(Self {
			count: watch::channel(0).0,
		})
	}

	pub fn count(&self) -> usize {
		*self.count.borrow()
	}

	pub fn watch(&self) -> watch::Receiver<usize> {
		self.count.subscribe()
	}
}

impl Navigator for CountingNavigator {
	fn navigate_to_authorized_destination(&self) {
		self.count.send_modify(|n| *n += 1);
	}
}

pub fn org_policy() -> AllowPolicy {
	AllowPolicy::new(ORG_DOMAIN, Vec::<String>::new())
}

pub fn session(uid: &str) -> Session {
	Session {
		uid: uid.to_string(),
		email: None,
	}
}

pub struct Harness {
	pub controller: SignInController,
	pub provider: Arc<ScriptedProvider>,
	pub federation: Arc<MemoryFederation>,
	pub navigator: Arc<CountingNavigator>,
}

impl Harness {
	pub fn start(policy: AllowPolicy, federation: Arc<MemoryFederation>, settings: SignInSettings) -> Self {
		let provider = ScriptedProvider::new();
		let navigator = CountingNavigator::new();
		let collaborators = Collaborators {
			provider: provider.clone(),
			federation: federation.clone(),
			navigator: navigator.clone(),
		};
		let controller = SignInRuntime::spawn(policy, settings, collaborators);
		provider.observe(controller.presentation());

		Self {
			controller,
			provider,
			federation,
			navigator,
		}
	}

	pub fn with_exchange(mode: ExchangeMode) -> Self {
		Self::start(org_policy(), MemoryFederation::new(mode), SignInSettings::default())
	}

	/// Wait until the published status satisfies `f`.
	pub async fn wait_for_status(&self, f: impl FnMut(&SignInStatus) -> bool) -> SignInStatus {
		let mut rx = self.controller.status();
		let status = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(f))
			.await
			.expect("timed out waiting for status")
			.expect("runtime stopped");
		status.clone()
	}

	pub async fn wait_for_navigations(&self, n: usize) {
		let mut rx = self.navigator.watch();
		tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|count| *count >= n))
			.await
			.expect("timed out waiting for navigation")
			.expect("navigator dropped");
	}
}
