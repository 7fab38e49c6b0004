// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Gatehouse sign-in gate.
//!
//! This crate provides:
//! - Layered configuration from defaults, a TOML file, and the environment
//! - Validation of the allow policy (organization domain, allow-list)
//! - `GATEHOUSE_*` environment naming, with `*_FILE` support for secrets
//!
//! # Usage
//!
//! ```ignore
//! use gatehouse_config::load_config;
//!
//! let config = load_config()?;
//! println!("admitting @{}", config.policy.organization_domain);
//! ```

pub mod env;
pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::GatehouseConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::path::PathBuf;

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct GatehouseConfig {
	pub policy: PolicyConfig,
	pub google: Option<GoogleConfig>,
	pub firebase: Option<FirebaseConfig>,
	pub signin: SignInConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`GATEHOUSE_*`)
/// 2. Config file (`/etc/gatehouse/gatehouse.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<GatehouseConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<GatehouseConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Load configuration from the environment only.
pub fn load_config_from_env() -> Result<GatehouseConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![Box::new(DefaultsSource), Box::new(EnvSource)];
	load_from_sources(sources)
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<GatehouseConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = GatehouseConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize a merged layer into resolved config.
pub fn finalize(layer: GatehouseConfigLayer) -> Result<GatehouseConfig, ConfigError> {
	let policy = layer.policy.unwrap_or_default().finalize()?;
	let google = layer.google.unwrap_or_default().build()?;
	let firebase = layer.firebase.unwrap_or_default().build()?;
	let signin = layer.signin.unwrap_or_default().finalize()?;

	info!(
		organization_domain = %policy.organization_domain,
		allow_list_len = policy.allow_list.len(),
		google_configured = google.is_some(),
		firebase_configured = firebase.is_some(),
		provider_timeout = ?signin.provider_timeout,
		federation_timeout = ?signin.federation_timeout,
		"Gatehouse configuration loaded"
	);

	Ok(GatehouseConfig {
		policy,
		google,
		firebase,
		signin,
	})
}
