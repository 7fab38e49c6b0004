// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use async_trait::async_trait;
use gatehouse_signin_core::{AuthError, FederatedAuth, ListenerId, ProviderAccount, Session, SessionListener};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::FirebaseAuthConfig;
use crate::error::FirebaseError;
use crate::types::{FirebaseErrorResponse, SignInWithIdpRequest, SignInWithIdpResponse};

const GOOGLE_PROVIDER_ID: &str = "google.com";

#[derive(Default)]
struct AuthState {
	session: Option<Session>,
	next_listener: u64,
	listeners: BTreeMap<ListenerId, SessionListener>,
}

/// Firebase Authentication over the Identity Toolkit REST API.
///
/// Session listeners follow Firebase's auth-state semantics: a listener is
/// called once with the current state when added, then on every change.
/// Listeners are never called with the state lock held, so they may call
/// back into this type.
pub struct FirebaseAuth {
	config: FirebaseAuthConfig,
	http_client: reqwest::Client,
	state: Mutex<AuthState>,
}

impl FirebaseAuth {
	/// # Panics
	///
	/// Panics if the HTTP client cannot be built (should never happen in practice).
	#[tracing::instrument(skip_all, name = "FirebaseAuth::new")]
	pub fn new(config: FirebaseAuthConfig) -> Self {
		let http_client = gatehouse_common_http::builder()
			.build()
			.expect("failed to build HTTP client");
		Self::with_http_client(config, http_client)
	}

	pub fn with_http_client(config: FirebaseAuthConfig, http_client: reqwest::Client) -> Self {
		Self {
			config,
			http_client,
			state: Mutex::new(AuthState::default()),
		}
	}

	/// Exchange a Google ID token at `accounts:signInWithIdp`.
	#[tracing::instrument(skip(self, id_token), name = "FirebaseAuth::sign_in_with_idp")]
	pub async fn sign_in_with_idp(&self, id_token: &str) -> Result<SignInWithIdpResponse, FirebaseError> {
		debug!("exchanging Google ID token with Identity Toolkit");

		let post_body = url_encoded(&[("id_token", id_token), ("providerId", GOOGLE_PROVIDER_ID)]);
		let request = SignInWithIdpRequest {
			post_body,
			request_uri: &self.config.request_uri,
			return_idp_credential: true,
			return_secure_token: true,
		};

		let response = self
			.http_client
			.post(self.config.sign_in_with_idp_url())
			.query(&[("key", self.config.api_key.expose().as_str())])
			.json(&request)
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			return Err(match serde_json::from_str::<FirebaseErrorResponse>(&body) {
				Ok(error) => FirebaseError::Api {
					code: error.error.code,
					message: error.error.message,
				},
				Err(_) => FirebaseError::Api {
					code: status.as_u16(),
					message: status.canonical_reason().unwrap_or("unexpected status").to_string(),
				},
			});
		}

		serde_json::from_str(&body)
			.map_err(|e| FirebaseError::ParseError(format!("failed to parse signInWithIdp response: {e}")))
	}

	/// End the federated session and notify listeners.
	pub fn sign_out(&self) {
		let had_session = self.state.lock().session.is_some();
		if had_session {
			info!("signed out of Firebase");
			self.set_session(None);
		}
	}

	pub fn listener_count(&self) -> usize {
		self.state.lock().listeners.len()
	}

	fn set_session(&self, session: Option<Session>) {
		let listeners: Vec<SessionListener> = {
			let mut state = self.state.lock();
			state.session = session.clone();
			state.listeners.values().cloned().collect()
		};
		debug!(listeners = listeners.len(), active = session.is_some(), "notifying session listeners");
		for listener in listeners {
			listener(session.as_ref());
		}
	}
}

#[async_trait]
impl FederatedAuth for FirebaseAuth {
	#[tracing::instrument(skip_all, name = "FirebaseAuth::sign_in_with_credential")]
	async fn sign_in_with_credential(&self, account: &ProviderAccount) -> Result<(), AuthError> {
		let response = self
			.sign_in_with_idp(account.id_token.expose())
			.await
			.map_err(|e| {
				warn!(error = %e, "Firebase credential exchange failed");
				AuthError::from(e)
			})?;

		info!(uid = %response.local_id, "Firebase session established");
		self.set_session(Some(Session {
			uid: response.local_id,
			email: response.email,
		}));
		Ok(())
	}

	fn add_session_listener(&self, listener: SessionListener) -> ListenerId {
		let (id, current) = {
			let mut state = self.state.lock();
			state.next_listener += 1;
			let id = ListenerId(state.next_listener);
			state.listeners.insert(id, listener.clone());
			(id, state.session.clone())
		};
		listener(current.as_ref());
		id
	}

	fn remove_session_listener(&self, id: ListenerId) -> bool {
		self.state.lock().listeners.remove(&id).is_some()
	}

	fn current_session(&self) -> Option<Session> {
		self.state.lock().session.clone()
	}
}

fn url_encoded(pairs: &[(&str, &str)]) -> String {
	let mut serializer = url::form_urlencoded::Serializer::new(String::new());
	serializer.extend_pairs(pairs);
	serializer.finish()
}
