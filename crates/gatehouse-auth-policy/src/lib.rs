// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organization email allow policy.
//!
//! The dashboard is open to two kinds of Google accounts:
//!
//! 1. Any address on the organization's own domain.
//! 2. A short, explicit list of outside addresses (guards on personal Gmail
//!    accounts, for example).
//!
//! Rules are evaluated in that order and the first match wins. Everything else
//! is denied, including input that is not an email address at all. The policy
//! is a pure function of its configuration and the address: no I/O, no
//! logging, and every string produces a decision.
//!
//! # Example
//!
//! ```
//! use gatehouse_auth_policy::{AdmissionRule, AllowDecision, AllowPolicy};
//!
//! let policy = AllowPolicy::new("org.com", ["a@gmail.com"]);
//!
//! assert_eq!(
//! 	policy.decide("user@org.com"),
//! 	AllowDecision::Admitted(AdmissionRule::OrganizationDomain)
//! );
//! assert_eq!(
//! 	policy.decide("a@gmail.com"),
//! 	AllowDecision::Admitted(AdmissionRule::AllowListed)
//! );
//! assert_eq!(policy.decide("outsider@gmail.com"), AllowDecision::DeniedUnauthorizedDomain);
//! ```

use std::collections::HashSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Status code reported when the allow policy rejects an account.
///
/// Sits well outside the Google Sign-In status code range so it can never be
/// confused with a provider-native failure.
pub const DEFAULT_UNAUTHORIZED_CODE: i32 = 14672;

/// Status codes the identity provider reports natively, from common status
/// codes up to the Google Sign-In specific ones.
pub const PROVIDER_STATUS_CODES: RangeInclusive<i32> = 0..=12502;

/// Whether `code` can mark a policy rejection without colliding with a
/// provider-native status.
pub fn is_distinct_unauthorized_code(code: i32) -> bool {
	!PROVIDER_STATUS_CODES.contains(&code)
}

/// Which rule admitted an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionRule {
	/// The address is on the organization domain.
	OrganizationDomain,
	/// The address is on the explicit allow-list.
	AllowListed,
}

/// Outcome of [`AllowPolicy::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowDecision {
	Admitted(AdmissionRule),
	DeniedUnauthorizedDomain,
}

impl AllowDecision {
	pub fn is_admitted(&self) -> bool {
		matches!(self, Self::Admitted(_))
	}
}

/// The organization allow policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowPolicy {
	organization_domain: String,
	allow_list: HashSet<String>,
}

impl AllowPolicy {
	/// Build a policy for `organization_domain` with an explicit allow-list.
	///
	/// The domain is stored trimmed and lowercased, with a leading `@`
	/// tolerated. Allow-list entries are stored verbatim; they are matched
	/// exactly and case-sensitively.
	pub fn new<I, S>(organization_domain: impl AsRef<str>, allow_list: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let domain = organization_domain.as_ref().trim();
		let domain = domain.strip_prefix('@').unwrap_or(domain);

		Self {
			organization_domain: domain.to_ascii_lowercase(),
			allow_list: allow_list.into_iter().map(Into::into).collect(),
		}
	}

	pub fn organization_domain(&self) -> &str {
		&self.organization_domain
	}

	pub fn allow_list_len(&self) -> usize {
		self.allow_list.len()
	}

	/// Decide whether `email` may sign in.
	pub fn decide(&self, email: &str) -> AllowDecision {
		let Some(domain) = email_domain(email) else {
			return AllowDecision::DeniedUnauthorizedDomain;
		};

		if !self.organization_domain.is_empty()
			&& domain.eq_ignore_ascii_case(&self.organization_domain)
		{
			return AllowDecision::Admitted(AdmissionRule::OrganizationDomain);
		}

		if self.allow_list.contains(email) {
			return AllowDecision::Admitted(AdmissionRule::AllowListed);
		}

		AllowDecision::DeniedUnauthorizedDomain
	}
}

/// The domain part of an email address: everything after the last `@`.
///
/// Returns `None` when there is no `@`, or when either side of it is empty.
pub fn email_domain(email: &str) -> Option<&str> {
	let (local, domain) = email.rsplit_once('@')?;
	if local.is_empty() || domain.is_empty() {
		return None;
	}
	Some(domain)
}

/// The part of `email` that is safe to log: its domain, or `<malformed>`.
pub fn loggable_domain(email: &str) -> &str {
	email_domain(email).unwrap_or("<malformed>")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn policy() -> AllowPolicy {
		AllowPolicy::new("org.com", ["a@gmail.com", "chad.w@gmail.com"])
	}

	#[test]
	fn organization_address_is_admitted() {
		assert_eq!(
			policy().decide("user@org.com"),
			AllowDecision::Admitted(AdmissionRule::OrganizationDomain)
		);
	}

	#[test]
	fn organization_domain_match_ignores_ascii_case() {
		assert!(policy().decide("User@Org.COM").is_admitted());
	}

	#[test]
	fn outsider_not_on_allow_list_is_denied() {
		let policy = AllowPolicy::new("org.com", ["a@gmail.com"]);
		assert_eq!(
			policy.decide("outsider@gmail.com"),
			AllowDecision::DeniedUnauthorizedDomain
		);
	}

	#[test]
	fn allow_listed_address_is_admitted() {
		let policy = AllowPolicy::new("org.com", ["a@gmail.com"]);
		assert_eq!(
			policy.decide("a@gmail.com"),
			AllowDecision::Admitted(AdmissionRule::AllowListed)
		);
	}

	#[test]
	fn allow_list_match_is_case_sensitive() {
		assert_eq!(
			policy().decide("A@gmail.com"),
			AllowDecision::DeniedUnauthorizedDomain
		);
	}

	#[test]
	fn subdomain_is_not_the_organization_domain() {
		assert_eq!(
			policy().decide("x@mail.org.com"),
			AllowDecision::DeniedUnauthorizedDomain
		);
		assert_eq!(
			policy().decide("x@evilorg.com"),
			AllowDecision::DeniedUnauthorizedDomain
		);
	}

	#[test]
	fn malformed_addresses_are_denied() {
		let policy = policy();
		for input in ["", "@", "no-at-sign", "user@", "@org.com", "org.com"] {
			assert_eq!(
				policy.decide(input),
				AllowDecision::DeniedUnauthorizedDomain,
				"input {input:?}"
			);
		}
	}

	#[test]
	fn multiple_at_signs_use_the_last_one() {
		let policy = policy();
		assert!(policy.decide("a@b@org.com").is_admitted());
		assert_eq!(
			policy.decide("a@org.com@evil.com"),
			AllowDecision::DeniedUnauthorizedDomain
		);
	}

	#[test]
	fn domain_is_normalized_on_construction() {
		let policy = AllowPolicy::new("  @Org.Com ", Vec::<String>::new());
		assert_eq!(policy.organization_domain(), "org.com");
		assert!(policy.decide("x@org.com").is_admitted());
	}

	#[test]
	fn empty_domain_admits_only_the_allow_list() {
		let policy = AllowPolicy::new("", ["a@gmail.com"]);
		assert!(policy.decide("a@gmail.com").is_admitted());
		assert!(!policy.decide("x@example.com").is_admitted());
	}

	#[test]
	fn email_domain_splits_on_last_at() {
		assert_eq!(email_domain("x@org.com"), Some("org.com"));
		assert_eq!(email_domain("x@y@z.io"), Some("z.io"));
		assert_eq!(email_domain("x"), None);
		assert_eq!(email_domain("x@"), None);
		assert_eq!(email_domain("@x"), None);
	}

	#[test]
	fn loggable_domain_drops_the_local_part() {
		assert_eq!(loggable_domain("alice@org.com"), "org.com");
		assert_eq!(loggable_domain("a@b@evil.com"), "evil.com");
		assert_eq!(loggable_domain("no-at-sign"), "<malformed>");
		assert_eq!(loggable_domain("@org.com"), "<malformed>");
	}

	#[test]
	fn unauthorized_code_must_avoid_provider_codes() {
		assert!(is_distinct_unauthorized_code(DEFAULT_UNAUTHORIZED_CODE));
		assert!(is_distinct_unauthorized_code(-1));
		for native in [0, 4, 7, 10, 12500, 12501, 12502] {
			assert!(!is_distinct_unauthorized_code(native), "{native}");
		}
	}

	#[test]
	fn decision_serializes_as_snake_case() {
		let json = serde_json::to_string(&AllowDecision::Admitted(AdmissionRule::AllowListed)).unwrap();
		assert_eq!(json, r#"{"admitted":"allow_listed"}"#);
	}
}
