// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Google Sign-In identity provider for Gatehouse.
//!
//! Implements [`IdentityProvider`](gatehouse_signin_core::IdentityProvider)
//! over the OAuth 2.0 authorization code flow with OpenID Connect:
//!
//! 1. `sign_in_intent` generates a fresh `state` and `nonce` and returns the
//!    authorization URL for the UI to open.
//! 2. The user picks an account; Google redirects to `redirect_uri` with a
//!    `code` and the `state`.
//! 3. `resolve_from_result` checks the `state`, exchanges the code at the
//!    token endpoint, decodes the ID token, checks the `nonce`, and returns
//!    the account email plus the raw ID token.
//!
//! A user backing out of the chooser arrives as `error=access_denied` and
//! resolves to [`ProviderError::Cancelled`](gatehouse_signin_core::ProviderError).
//!
//! # Security Considerations
//!
//! - The `client_secret` and all tokens are wrapped in
//!   [`SecretString`](gatehouse_common_secret::SecretString).
//! - Tracing instrumentation skips codes and tokens.
//! - `state` and `nonce` are single-use; a second callback for the same flow
//!   is rejected.

mod client;
mod config;
mod error;
mod types;

pub use client::GoogleSignInClient;
pub use config::{GoogleEndpoints, GoogleSignInConfig, GOOGLE_AUTHORIZE_URL, GOOGLE_TOKEN_URL};
pub use error::{status, ConfigError, OAuthError};
pub use types::{GoogleIdTokenClaims, GoogleTokenResponse};
