// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{FirebaseConfigLayer, GoogleConfigLayer, PolicyConfigLayer, SignInConfigLayer};

/// One source's view of the configuration; every field is optional so layers
/// can be stacked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatehouseConfigLayer {
	#[serde(default)]
	pub policy: Option<PolicyConfigLayer>,
	#[serde(default)]
	pub google: Option<GoogleConfigLayer>,
	#[serde(default)]
	pub firebase: Option<FirebaseConfigLayer>,
	#[serde(default)]
	pub signin: Option<SignInConfigLayer>,
}

impl GatehouseConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: GatehouseConfigLayer) {
		merge_option(&mut self.policy, other.policy, PolicyConfigLayer::merge);
		merge_option(&mut self.google, other.google, GoogleConfigLayer::merge);
		merge_option(&mut self.firebase, other.firebase, FirebaseConfigLayer::merge);
		merge_option(&mut self.signin, other.signin, SignInConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}
