// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Values exchanged with the identity provider and the federated auth backend.

use std::collections::BTreeMap;
use std::fmt;

use gatehouse_common_secret::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

/// The account the user picked in the provider's interactive flow.
///
/// Consumed once per sign-in attempt: the email goes to the allow policy and
/// the ID token to the credential exchange.
#[derive(Debug, Clone)]
pub struct ProviderAccount {
	pub email: String,
	pub id_token: SecretString,
}

impl ProviderAccount {
	pub fn new(email: impl Into<String>, id_token: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			id_token: SecretString::new(id_token.into()),
		}
	}
}

/// What the UI needs to start the provider's interactive flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchToken {
	/// URL to open in the browser or web view.
	pub authorization_url: String,
	/// Opaque correlation value the provider echoes back in its result.
	pub state: String,
}

/// Whatever the provider's interactive flow handed back to the UI.
///
/// For a redirect-based provider this is the query string of the callback URL.
/// The UI never interprets it; only the provider adapter does.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderResult {
	params: BTreeMap<String, String>,
}

impl ProviderResult {
	/// Parse a query string, with or without the leading `?`.
	pub fn from_query(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		Self {
			params: url::form_urlencoded::parse(query.as_bytes())
				.map(|(k, v)| (k.into_owned(), v.into_owned()))
				.collect(),
		}
	}

	/// Parse the query of a full callback URL.
	pub fn from_redirect_url(redirect: &str) -> Result<Self, url::ParseError> {
		let url = Url::parse(redirect)?;
		Ok(Self::from_query(url.query().unwrap_or_default()))
	}

	/// The result reported when the user backs out of the provider flow.
	pub fn cancelled() -> Self {
		Self::default().with_param("error", "access_denied")
	}

	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(name.into(), value.into());
		self
	}

	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}
}

// Authorization codes are single-use credentials; only the keys are printed.
impl fmt::Debug for ProviderResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderResult")
			.field("params", &self.params.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// An active federated session as reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	pub uid: String,
	pub email: Option<String>,
}
