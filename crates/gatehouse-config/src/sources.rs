// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file, and the environment.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::env::{env_parse, env_var, load_secret_env, parse_comma_list, parse_line_list, read_file};
use crate::error::ConfigError;
use crate::layer::GatehouseConfigLayer;
use crate::sections::{FirebaseConfigLayer, GoogleConfigLayer, PolicyConfigLayer, SignInConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// A place configuration can come from.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<GatehouseConfigLayer, ConfigError>;
}

/// Built-in defaults. Every default lives in the section `finalize`/`build`
/// functions, so this layer is empty.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<GatehouseConfigLayer, ConfigError> {
		Ok(GatehouseConfigLayer::default())
	}
}

/// TOML file source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/gatehouse/gatehouse.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<GatehouseConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(GatehouseConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = read_file(&self.path)?;
		let layer = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `GATEHOUSE_<SECTION>_<FIELD>`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<GatehouseConfigLayer, ConfigError> {
		Ok(GatehouseConfigLayer {
			policy: Some(load_policy_from_env()?),
			google: Some(load_google_from_env()?),
			firebase: Some(load_firebase_from_env()?),
			signin: Some(load_signin_from_env()?),
		})
	}
}

fn load_policy_from_env() -> Result<PolicyConfigLayer, ConfigError> {
	// The file form wins so a long guard list can live in a mounted file.
	let allow_list = match env_var("GATEHOUSE_POLICY_ALLOW_LIST_FILE") {
		Some(path) => Some(parse_line_list(&read_file(Path::new(&path))?)),
		None => env_var("GATEHOUSE_POLICY_ALLOW_LIST").map(|v| parse_comma_list(&v)),
	};

	Ok(PolicyConfigLayer {
		organization_domain: env_var("GATEHOUSE_POLICY_ORGANIZATION_DOMAIN"),
		allow_list,
		unauthorized_code: env_parse("GATEHOUSE_POLICY_UNAUTHORIZED_CODE")?,
	})
}

fn load_google_from_env() -> Result<GoogleConfigLayer, ConfigError> {
	Ok(GoogleConfigLayer {
		client_id: env_var("GATEHOUSE_GOOGLE_CLIENT_ID"),
		client_secret: load_secret_env("GATEHOUSE_GOOGLE_CLIENT_SECRET")?,
		redirect_uri: env_var("GATEHOUSE_GOOGLE_REDIRECT_URI"),
		scopes: env_var("GATEHOUSE_GOOGLE_SCOPES").map(|v| {
			v.split([' ', ','])
				.map(|s| s.trim().to_string())
				.filter(|s| !s.is_empty())
				.collect()
		}),
	})
}

fn load_firebase_from_env() -> Result<FirebaseConfigLayer, ConfigError> {
	Ok(FirebaseConfigLayer {
		api_key: load_secret_env("GATEHOUSE_FIREBASE_API_KEY")?,
		request_uri: env_var("GATEHOUSE_FIREBASE_REQUEST_URI"),
	})
}

fn load_signin_from_env() -> Result<SignInConfigLayer, ConfigError> {
	Ok(SignInConfigLayer {
		progress_message: env_var("GATEHOUSE_SIGNIN_PROGRESS_MESSAGE"),
		provider_timeout_secs: env_parse("GATEHOUSE_SIGNIN_PROVIDER_TIMEOUT_SECS")?,
		federation_timeout_secs: env_parse("GATEHOUSE_SIGNIN_FEDERATION_TIMEOUT_SECS")?,
	})
}
