// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment variable readers.
//!
//! Secrets follow the `VAR` / `VAR_FILE` convention so the Google client secret
//! and Firebase API key can come from a mounted secret file instead of the
//! process environment.

use std::path::{Path, PathBuf};
use std::{env, fs};

use gatehouse_common_secret::SecretString;

use crate::error::ConfigError;

/// Read a non-empty environment variable.
pub fn env_var(name: &str) -> Option<String> {
	env::var(name).ok().filter(|s| !s.is_empty())
}

/// Read an integer environment variable.
pub fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::invalid_value(name, format!("'{v}' is not a valid number"))),
		None => Ok(None),
	}
}

/// Load a secret from `{var}_FILE` (preferred) or `{var}`.
///
/// A single trailing newline is stripped from file contents.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, ConfigError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(ConfigError::invalid_value(file_var, "path is empty"));
		}

		let content = read_file(Path::new(&path_str))?;
		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	Ok(env_var(var).map(SecretString::new))
}

/// Split a comma-separated list, dropping blanks.
pub fn parse_comma_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
		.collect()
}

/// Parse a newline-separated list. Blank lines and `#` comments are skipped.
pub fn parse_line_list(content: &str) -> Vec<String> {
	content
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.map(str::to_string)
		.collect()
}

pub(crate) fn read_file(path: &Path) -> Result<String, ConfigError> {
	fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
		path: PathBuf::from(path),
		source: e,
	})
}
