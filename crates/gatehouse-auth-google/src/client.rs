// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use gatehouse_signin_core::{loggable_domain, IdentityProvider, LaunchToken, ProviderAccount, ProviderError, ProviderResult};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GoogleSignInConfig;
use crate::error::OAuthError;
use crate::types::{GoogleErrorResponse, GoogleIdTokenClaims, GoogleTokenResponse};

/// The `state`/`nonce` pair of the flow the user is currently in.
#[derive(Debug, Clone)]
struct PendingRequest {
	state: String,
	nonce: String,
}

#[derive(Debug, Default)]
struct ClientState {
	pending: Option<PendingRequest>,
	signed_in: Option<String>,
}

/// Google Sign-In over the OAuth 2.0 authorization code flow with OIDC.
///
/// One interactive flow is pending at a time. Its `state` guards the callback
/// and its `nonce` guards the ID token; both are single-use.
#[derive(Debug)]
pub struct GoogleSignInClient {
	config: GoogleSignInConfig,
	http_client: reqwest::Client,
	state: Mutex<ClientState>,
}

impl GoogleSignInClient {
	/// # Panics
	///
	/// Panics if the HTTP client cannot be built (should never happen in practice).
	#[tracing::instrument(skip_all, name = "GoogleSignInClient::new")]
	pub fn new(config: GoogleSignInConfig) -> Self {
		let http_client = gatehouse_common_http::builder()
			.build()
			.expect("failed to build HTTP client");
		Self::with_http_client(config, http_client)
	}

	pub fn with_http_client(config: GoogleSignInConfig, http_client: reqwest::Client) -> Self {
		Self {
			config,
			http_client,
			state: Mutex::new(ClientState::default()),
		}
	}

	/// Email of the account that last completed a sign-in, until `sign_out`.
	pub fn signed_in_email(&self) -> Option<String> {
		self.state.lock().signed_in.clone()
	}

	pub fn has_pending_request(&self) -> bool {
		self.state.lock().pending.is_some()
	}

	/// Build the Google authorization URL for the given `state` and `nonce`.
	#[tracing::instrument(skip(self, state, nonce), fields(client_id = %self.config.client_id))]
	pub fn authorization_url(&self, state: &str, nonce: &str) -> String {
		let mut url = self.config.endpoints.authorize_url.clone();

		url
			.query_pairs_mut()
			.append_pair("client_id", &self.config.client_id)
			.append_pair("redirect_uri", &self.config.redirect_uri)
			.append_pair("response_type", "code")
			.append_pair("scope", &self.config.scopes_string())
			.append_pair("state", state)
			.append_pair("nonce", nonce)
			.append_pair("prompt", "select_account");

		url.to_string()
	}

	/// Exchange an authorization code for tokens.
	#[tracing::instrument(skip(self, code), name = "GoogleSignInClient::exchange_code")]
	pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokenResponse, OAuthError> {
		debug!("exchanging authorization code for tokens");

		let response = self
			.http_client
			.post(self.config.endpoints.token_url.clone())
			.form(&[
				("client_id", self.config.client_id.as_str()),
				("client_secret", self.config.client_secret.expose().as_str()),
				("code", code),
				("redirect_uri", self.config.redirect_uri.as_str()),
				("grant_type", "authorization_code"),
			])
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		if let Ok(error_response) = serde_json::from_str::<GoogleErrorResponse>(&body) {
			if !error_response.error.is_empty() {
				let message = error_response
					.error_description
					.unwrap_or_else(|| error_response.error.clone());
				return Err(OAuthError::GoogleError {
					error: error_response.error,
					message,
				});
			}
		}

		if !status.is_success() {
			return Err(OAuthError::GoogleError {
				error: status.as_u16().to_string(),
				message: status.canonical_reason().unwrap_or("unexpected status").to_string(),
			});
		}

		serde_json::from_str(&body)
			.map_err(|e| OAuthError::ParseError(format!("failed to parse token response: {e}")))
	}

	/// Decode the ID token payload and check it was issued to this client.
	///
	/// The signature is not verified: the token is handed straight to Firebase,
	/// which does verify it before establishing a session.
	#[tracing::instrument(skip(self, id_token), name = "GoogleSignInClient::decode_id_token")]
	pub fn decode_id_token(&self, id_token: &str) -> Result<GoogleIdTokenClaims, OAuthError> {
		let parts: Vec<&str> = id_token.split('.').collect();
		if parts.len() != 3 {
			return Err(OAuthError::InvalidIdToken(
				"ID token must have 3 parts".to_string(),
			));
		}

		let decoded = URL_SAFE_NO_PAD
			.decode(parts[1])
			.map_err(|e| OAuthError::InvalidIdToken(format!("failed to decode payload: {e}")))?;

		let claims: GoogleIdTokenClaims = serde_json::from_slice(&decoded)
			.map_err(|e| OAuthError::InvalidIdToken(format!("failed to parse claims: {e}")))?;

		if claims.aud != self.config.client_id {
			return Err(OAuthError::InvalidIdToken(format!(
				"audience {} does not match client",
				claims.aud
			)));
		}

		Ok(claims)
	}

	/// Start a new flow, replacing any pending one.
	fn begin(&self) -> LaunchToken {
		let pending = PendingRequest {
			state: Uuid::new_v4().to_string(),
			nonce: Uuid::new_v4().to_string(),
		};
		let authorization_url = self.authorization_url(&pending.state, &pending.nonce);
		let state = pending.state.clone();

		let replaced = self.state.lock().pending.replace(pending).is_some();
		debug!(replaced, "Google sign-in flow prepared");

		LaunchToken {
			authorization_url,
			state,
		}
	}

	async fn resolve(&self, result: ProviderResult) -> Result<ProviderAccount, OAuthError> {
		// The pending request is consumed whatever the outcome.
		let pending = self.state.lock().pending.take();

		if let Some(error) = result.param("error") {
			return Err(if error == "access_denied" {
				OAuthError::Cancelled
			} else {
				OAuthError::CallbackError(error.to_string())
			});
		}

		let pending = pending.ok_or(OAuthError::NoPendingRequest)?;
		if result.param("state") != Some(pending.state.as_str()) {
			return Err(OAuthError::StateMismatch);
		}

		let code = result.param("code").ok_or(OAuthError::MissingCode)?;
		let tokens = self.exchange_code(code).await?;
		let claims = self.decode_id_token(tokens.id_token.expose())?;

		if claims.nonce.as_deref() != Some(pending.nonce.as_str()) {
			return Err(OAuthError::NonceMismatch);
		}
		let email = claims.email.ok_or(OAuthError::MissingEmail)?;

		self.state.lock().signed_in = Some(email.clone());
		info!(domain = loggable_domain(&email), "Google sign-in resolved");

		Ok(ProviderAccount {
			email,
			id_token: tokens.id_token,
		})
	}
}

#[async_trait]
impl IdentityProvider for GoogleSignInClient {
	fn sign_in_intent(&self) -> LaunchToken {
		self.begin()
	}

	#[tracing::instrument(skip_all, name = "GoogleSignInClient::resolve_from_result")]
	async fn resolve_from_result(&self, result: ProviderResult) -> Result<ProviderAccount, ProviderError> {
		self.resolve(result).await.map_err(|e| {
			warn!(error = %e, status = e.status_code(), "Google sign-in failed");
			ProviderError::from(e)
		})
	}

	fn sign_out(&self) {
		let mut state = self.state.lock();
		let had_account = state.signed_in.take().is_some();
		let had_pending = state.pending.take().is_some();
		debug!(had_account, had_pending, "signed out of Google");
	}
}
