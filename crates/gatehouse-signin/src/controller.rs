// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use gatehouse_signin_core::{LaunchToken, PresentationState, ProviderResult, SignInEvent, SignInStatus};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::Command;

/// Handle the UI layer uses to drive sign-in and observe what to show.
///
/// Cheap to clone. The runtime stops when [`shutdown`](Self::shutdown) is
/// called or every handle has been dropped.
#[derive(Clone)]
pub struct SignInController {
	commands: mpsc::UnboundedSender<Command>,
	presentation: watch::Receiver<PresentationState>,
	status: watch::Receiver<SignInStatus>,
	launches: broadcast::Sender<LaunchToken>,
}

impl SignInController {
	pub(crate) fn new(
		commands: mpsc::UnboundedSender<Command>,
		presentation: watch::Receiver<PresentationState>,
		status: watch::Receiver<SignInStatus>,
		launches: broadcast::Sender<LaunchToken>,
	) -> Self {
		Self {
			commands,
			presentation,
			status,
			launches,
		}
	}

	/// The user tapped sign-in. Ignored while an attempt is in flight.
	pub fn on_user_requests_sign_in(&self) -> RuntimeResult<()> {
		self.send(SignInEvent::UserRequestedSignIn)
	}

	/// The provider flow returned control to the UI with `result`.
	pub fn on_provider_result_available(&self, result: ProviderResult) -> RuntimeResult<()> {
		self.send(SignInEvent::ProviderResultAvailable(result))
	}

	/// Progress indicator, last error, and notice.
	pub fn presentation(&self) -> watch::Receiver<PresentationState> {
		self.presentation.clone()
	}

	pub fn current_presentation(&self) -> PresentationState {
		self.presentation.borrow().clone()
	}

	pub fn status(&self) -> watch::Receiver<SignInStatus> {
		self.status.clone()
	}

	/// Launch tokens for the UI to open, one per accepted sign-in request.
	/// Only tokens issued after subscribing are received.
	pub fn launches(&self) -> broadcast::Receiver<LaunchToken> {
		self.launches.subscribe()
	}

	/// Stop the runtime and release the session subscription. Resolves once
	/// the runtime has stopped; later calls return [`RuntimeError::Stopped`].
	pub async fn shutdown(&self) -> RuntimeResult<()> {
		let (ack, done) = oneshot::channel();
		self
			.commands
			.send(Command::Shutdown(ack))
			.map_err(|_| RuntimeError::Stopped)?;
		done.await.map_err(|_| RuntimeError::Stopped)
	}

	pub fn is_running(&self) -> bool {
		!self.commands.is_closed()
	}

	fn send(&self, event: SignInEvent) -> RuntimeResult<()> {
		self
			.commands
			.send(Command::Event(event))
			.map_err(|_| RuntimeError::Stopped)
	}
}
