// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
	#[error("sign-in runtime has stopped")]
	Stopped,

	#[error("{0} is not configured")]
	NotConfigured(&'static str),

	#[error("invalid {section} configuration: {message}")]
	InvalidConfig { section: &'static str, message: String },
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
