// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sign-in runtime for Gatehouse.
//!
//! Wires the pure [`SignInOrchestrator`](gatehouse_signin_core::SignInOrchestrator)
//! to a Google identity provider, a Firebase federation bridge, and a
//! navigator, and runs every transition on one tokio task. The UI talks to it
//! through a [`SignInController`].
//!
//! ```ignore
//! let config = gatehouse_config::load_config()?;
//! let controller = gatehouse_signin::connect(&config, Arc::new(|| open_home()))?;
//! let mut launches = controller.launches();
//! controller.on_user_requests_sign_in()?;
//! let token = launches.recv().await?;
//! ```

mod controller;
mod error;
mod runtime;
mod settings;

use std::sync::Arc;

use gatehouse_auth_firebase::{FirebaseAuth, FirebaseAuthConfig};
use gatehouse_auth_google::{GoogleSignInClient, GoogleSignInConfig};
use gatehouse_config::GatehouseConfig;
use gatehouse_signin_core::Navigator;
use tracing::info;

pub use controller::SignInController;
pub use error::{RuntimeError, RuntimeResult};
pub use runtime::{Collaborators, SignInRuntime};
pub use settings::SignInSettings;

/// Build the Google and Firebase adapters from `config` and start a runtime.
///
/// Must be called from within a tokio runtime.
pub fn connect(config: &GatehouseConfig, navigator: Arc<dyn Navigator>) -> RuntimeResult<SignInController> {
	let google = config
		.google
		.as_ref()
		.ok_or(RuntimeError::NotConfigured("google"))?;
	let google = GoogleSignInConfig::from(google);
	google.validate().map_err(|e| RuntimeError::InvalidConfig {
		section: "google",
		message: e.to_string(),
	})?;

	let firebase = config
		.firebase
		.as_ref()
		.ok_or(RuntimeError::NotConfigured("firebase"))?;

	info!(
		domain = %config.policy.organization_domain,
		allow_list = config.policy.allow_list.len(),
		"connecting sign-in runtime"
	);

	let collaborators = Collaborators {
		provider: Arc::new(GoogleSignInClient::new(google)),
		federation: Arc::new(FirebaseAuth::new(FirebaseAuthConfig::from(firebase))),
		navigator,
	};
	Ok(SignInRuntime::from_config(config, collaborators))
}
