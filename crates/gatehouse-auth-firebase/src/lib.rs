// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Firebase Authentication bridge for Gatehouse.
//!
//! Exchanges the Google ID token for a Firebase session through the Identity
//! Toolkit `accounts:signInWithIdp` endpoint, and tells session listeners
//! when the session becomes active. The session lives in memory only.

mod auth;
mod config;
mod error;
mod types;

pub use auth::FirebaseAuth;
pub use config::{FirebaseAuthConfig, IDENTITY_TOOLKIT_URL};
pub use error::FirebaseError;
pub use types::SignInWithIdpResponse;
