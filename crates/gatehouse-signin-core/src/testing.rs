// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory collaborators for unit tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::account::{ProviderAccount, Session};
use crate::collaborators::{FederatedAuth, ListenerId, SessionListener};
use crate::error::AuthError;

#[derive(Default)]
pub struct MemoryAuth {
	inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
	next_id: u64,
	listeners: BTreeMap<ListenerId, SessionListener>,
	session: Option<Session>,
}

impl MemoryAuth {
	pub fn set_session(&self, session: Option<Session>) {
		let listeners = {
			let mut inner = self.inner.lock();
			inner.session = session.clone();
			inner.listeners.values().cloned().collect::<Vec<_>>()
		};
		for listener in listeners {
			listener(session.as_ref());
		}
	}

	pub fn listener_count(&self) -> usize {
		self.inner.lock().listeners.len()
	}

	pub fn snapshot_listeners(&self) -> Vec<SessionListener> {
		self.inner.lock().listeners.values().cloned().collect()
	}
}

#[async_trait]
impl FederatedAuth for MemoryAuth {
	async fn sign_in_with_credential(&self, account: &ProviderAccount) -> Result<(), AuthError> {
		self.set_session(Some(Session {
			uid: format!("uid-{}", account.email),
			email: Some(account.email.clone()),
		}));
		Ok(())
	}

	fn add_session_listener(&self, listener: SessionListener) -> ListenerId {
		let mut inner = self.inner.lock();
		inner.next_id += 1;
		let id = ListenerId(inner.next_id);
		inner.listeners.insert(id, listener);
		id
	}

	fn remove_session_listener(&self, id: ListenerId) -> bool {
		self.inner.lock().listeners.remove(&id).is_some()
	}

	fn current_session(&self) -> Option<Session> {
		self.inner.lock().session.clone()
	}
}
