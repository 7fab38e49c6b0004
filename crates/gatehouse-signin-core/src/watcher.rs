// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session-change subscription and the at-most-once navigation latch.
//!
//! Two independent paths can observe "session active": the credential
//! exchange completing and the auth backend's session listener. Whichever
//! arrives first claims the latch; the other becomes a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::account::Session;
use crate::collaborators::{FederatedAuth, ListenerId};

#[derive(Debug, Default)]
pub struct SessionWatcher {
	navigated: AtomicBool,
	listening: Arc<AtomicBool>,
}

impl SessionWatcher {
	pub fn new() -> Self {
		Self::default()
	}

	/// Consume the latch. Returns true exactly once per watcher.
	pub fn claim_navigation(&self) -> bool {
		self
			.navigated
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_ok()
	}

	pub fn has_navigated(&self) -> bool {
		self.navigated.load(Ordering::Acquire)
	}

	/// Whether a subscription is currently held.
	pub fn is_listening(&self) -> bool {
		self.listening.load(Ordering::Acquire)
	}

	/// Register with the auth backend. `forward` receives `true` when a
	/// session becomes active and `false` when it goes away, until the
	/// returned guard is released or dropped.
	pub fn subscribe<F>(&self, auth: Arc<dyn FederatedAuth>, forward: F) -> SessionSubscription
	where
		F: Fn(bool) + Send + Sync + 'static,
	{
		let live = Arc::new(AtomicBool::new(true));
		let gate = Arc::clone(&live);
		let id = auth.add_session_listener(Arc::new(move |session: Option<&Session>| {
			if gate.load(Ordering::Acquire) {
				forward(session.is_some());
			} else {
				debug!("dropping session notification after unsubscribe");
			}
		}));

		self.listening.store(true, Ordering::Release);
		debug!(listener = id.0, "session listener registered");

		SessionSubscription {
			auth,
			id,
			live,
			listening: Arc::clone(&self.listening),
			released: false,
		}
	}
}

/// Held for as long as session notifications should be delivered.
pub struct SessionSubscription {
	auth: Arc<dyn FederatedAuth>,
	id: ListenerId,
	live: Arc<AtomicBool>,
	listening: Arc<AtomicBool>,
	released: bool,
}

impl SessionSubscription {
	pub fn release(mut self) {
		self.unsubscribe();
	}

	fn unsubscribe(&mut self) {
		if self.released {
			return;
		}
		self.released = true;
		// Close the gate first: the backend may already be mid-notification.
		self.live.store(false, Ordering::Release);
		self.listening.store(false, Ordering::Release);
		let removed = self.auth.remove_session_listener(self.id);
		debug!(listener = self.id.0, removed, "session listener released");
	}
}

impl Drop for SessionSubscription {
	fn drop(&mut self) {
		self.unsubscribe();
	}
}

impl std::fmt::Debug for SessionSubscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionSubscription")
			.field("id", &self.id)
			.field("released", &self.released)
			.finish()
	}
}
