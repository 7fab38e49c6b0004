// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Allow policy section: organization domain and the explicit allow-list.

pub use gatehouse_auth_policy::DEFAULT_UNAUTHORIZED_CODE;

use gatehouse_auth_policy::{is_distinct_unauthorized_code, AllowPolicy, PROVIDER_STATUS_CODES};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Policy configuration layer (all fields optional for merging).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfigLayer {
	pub organization_domain: Option<String>,
	pub allow_list: Option<Vec<String>>,
	pub unauthorized_code: Option<i32>,
}

impl PolicyConfigLayer {
	pub fn merge(&mut self, other: PolicyConfigLayer) {
		if other.organization_domain.is_some() {
			self.organization_domain = other.organization_domain;
		}
		if other.allow_list.is_some() {
			self.allow_list = other.allow_list;
		}
		if other.unauthorized_code.is_some() {
			self.unauthorized_code = other.unauthorized_code;
		}
	}

	pub fn finalize(self) -> Result<PolicyConfig, ConfigError> {
		let organization_domain = self
			.organization_domain
			.map(|d| d.trim().to_string())
			.filter(|d| !d.is_empty())
			.ok_or_else(|| ConfigError::Missing("policy.organization_domain".to_string()))?;

		if organization_domain.contains('@') {
			return Err(ConfigError::invalid_value(
				"policy.organization_domain",
				format!("'{organization_domain}' must be a bare domain without '@'"),
			));
		}

		let allow_list = self.allow_list.unwrap_or_default();
		if let Some(bad) = allow_list.iter().find(|entry| !entry.contains('@')) {
			return Err(ConfigError::invalid_value(
				"policy.allow_list",
				format!("'{bad}' is not an email address"),
			));
		}

		let unauthorized_code = self.unauthorized_code.unwrap_or(DEFAULT_UNAUTHORIZED_CODE);
		if !is_distinct_unauthorized_code(unauthorized_code) {
			return Err(ConfigError::invalid_value(
				"policy.unauthorized_code",
				format!(
					"{unauthorized_code} overlaps provider status codes {}..={}",
					PROVIDER_STATUS_CODES.start(),
					PROVIDER_STATUS_CODES.end()
				),
			));
		}

		Ok(PolicyConfig {
			organization_domain,
			allow_list,
			unauthorized_code,
		})
	}
}

/// Resolved policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
	pub organization_domain: String,
	pub allow_list: Vec<String>,
	pub unauthorized_code: i32,
}

impl PolicyConfig {
	pub fn allow_policy(&self) -> AllowPolicy {
		AllowPolicy::new(&self.organization_domain, self.allow_list.iter().cloned())
	}
}
