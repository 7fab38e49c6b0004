// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The single sequential actor that owns the orchestrator.
//!
//! User actions arrive as commands from [`SignInController`] handles; provider
//! and exchange completions, timers, and session notifications arrive on an
//! internal queue. One task drains both, completions first, so no two
//! transitions ever overlap.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use gatehouse_config::GatehouseConfig;
use gatehouse_signin_core::{
	AllowPolicy, AttemptId, FederatedAuth, IdentityProvider, LaunchToken, Navigator, PresentationState,
	SessionSubscription, SessionWatcher, SignInAction, SignInEvent, SignInOrchestrator, SignInStatus,
	Suspension,
};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::controller::SignInController;
use crate::settings::SignInSettings;

const LAUNCH_CHANNEL_CAPACITY: usize = 16;

/// The external SDKs the runtime drives.
#[derive(Clone)]
pub struct Collaborators {
	pub provider: Arc<dyn IdentityProvider>,
	pub federation: Arc<dyn FederatedAuth>,
	pub navigator: Arc<dyn Navigator>,
}

pub(crate) enum Command {
	Event(SignInEvent),
	Shutdown(oneshot::Sender<()>),
}

pub struct SignInRuntime {
	orchestrator: SignInOrchestrator,
	collaborators: Collaborators,
	provider_timeout: Option<Duration>,
	federation_timeout: Option<Duration>,
	commands: mpsc::UnboundedReceiver<Command>,
	completions: mpsc::UnboundedReceiver<SignInEvent>,
	completions_tx: mpsc::UnboundedSender<SignInEvent>,
	presentation: watch::Sender<PresentationState>,
	status: watch::Sender<SignInStatus>,
	launches: broadcast::Sender<LaunchToken>,
	subscription: Option<SessionSubscription>,
}

impl SignInRuntime {
	/// Start the runtime on the current tokio runtime and return its handle.
	///
	/// The session listener is registered before this returns and released
	/// when the runtime stops.
	pub fn spawn(policy: AllowPolicy, settings: SignInSettings, collaborators: Collaborators) -> SignInController {
		let watcher = Arc::new(SessionWatcher::new());
		let orchestrator = SignInOrchestrator::new(policy, settings.orchestrator(), Arc::clone(&watcher));

		let (commands_tx, commands) = mpsc::unbounded_channel();
		let (completions_tx, completions) = mpsc::unbounded_channel();
		let (presentation, presentation_rx) = watch::channel(orchestrator.presentation().clone());
		let (status, status_rx) = watch::channel(orchestrator.status().clone());
		let (launches, _) = broadcast::channel(LAUNCH_CHANNEL_CAPACITY);

		let session_tx = completions_tx.clone();
		let subscription = watcher.subscribe(Arc::clone(&collaborators.federation), move |active| {
			if session_tx.send(SignInEvent::SessionChanged { active }).is_err() {
				debug!("sign-in runtime gone, dropping session notification");
			}
		});

		let controller = SignInController::new(commands_tx, presentation_rx, status_rx, launches.clone());

		let runtime = Self {
			orchestrator,
			collaborators,
			provider_timeout: settings.provider_timeout,
			federation_timeout: settings.federation_timeout,
			commands,
			completions,
			completions_tx,
			presentation,
			status,
			launches,
			subscription: Some(subscription),
		};
		tokio::spawn(runtime.run());

		controller
	}

	/// Build from loaded configuration with the given collaborators.
	pub fn from_config(config: &GatehouseConfig, collaborators: Collaborators) -> SignInController {
		let policy = config.policy.allow_policy();
		let settings = SignInSettings::from_config(&config.policy, &config.signin);
		Self::spawn(policy, settings, collaborators)
	}

	async fn run(mut self) {
		info!("sign-in runtime started");
		loop {
			tokio::select! {
				biased;

				Some(event) = self.completions.recv() => self.dispatch(event),
				command = self.commands.recv() => match command {
					Some(Command::Event(event)) => self.dispatch(event),
					Some(Command::Shutdown(ack)) => {
						self.commands.close();
						self.stop();
						let _ = ack.send(());
						return;
					}
					None => {
						debug!("all controllers dropped");
						break;
					}
				},
			}
		}
		self.stop();
	}

	fn stop(&mut self) {
		if let Some(subscription) = self.subscription.take() {
			subscription.release();
		}
		info!("sign-in runtime stopped");
	}

	fn dispatch(&mut self, event: SignInEvent) {
		for action in self.orchestrator.handle_event(event) {
			self.execute(action);
		}

		let current = self.orchestrator.status();
		self.status.send_if_modified(|status| {
			if *status != *current {
				*status = current.clone();
				true
			} else {
				false
			}
		});
	}

	fn execute(&mut self, action: SignInAction) {
		match action {
			SignInAction::Publish(state) => {
				self.presentation.send_replace(state);
			}
			SignInAction::LaunchProvider { attempt } => {
				let token = self.collaborators.provider.sign_in_intent();
				if self.launches.send(token).is_err() {
					warn!(attempt = %attempt, "no UI is listening for launch tokens");
				}
				self.arm_timer(attempt, Suspension::Provider, self.provider_timeout);
			}
			SignInAction::ResolveProviderResult { attempt, result } => {
				let provider = Arc::clone(&self.collaborators.provider);
				self.complete_with(async move {
					let result = provider.resolve_from_result(result).await;
					SignInEvent::ProviderResolved { attempt, result }
				});
			}
			SignInAction::SignOutProvider => {
				self.collaborators.provider.sign_out();
			}
			SignInAction::ExchangeCredential { attempt, account } => {
				let federation = Arc::clone(&self.collaborators.federation);
				self.complete_with(async move {
					let result = federation.sign_in_with_credential(&account).await;
					SignInEvent::FederationResolved { attempt, result }
				});
				self.arm_timer(attempt, Suspension::Federation, self.federation_timeout);
			}
			SignInAction::Navigate => {
				self.collaborators.navigator.navigate_to_authorized_destination();
			}
		}
	}

	/// Run `work` off the queue and post its event back when it finishes.
	fn complete_with<F>(&self, work: F)
	where
		F: Future<Output = SignInEvent> + Send + 'static,
	{
		let tx = self.completions_tx.clone();
		tokio::spawn(async move {
			if tx.send(work.await).is_err() {
				debug!("sign-in runtime gone, dropping completion");
			}
		});
	}

	fn arm_timer(&self, attempt: AttemptId, stage: Suspension, timeout: Option<Duration>) {
		let Some(timeout) = timeout else {
			return;
		};
		debug!(attempt = %attempt, stage = ?stage, ?timeout, "arming suspension timer");
		self.complete_with(async move {
			tokio::time::sleep(timeout).await;
			SignInEvent::SuspensionTimedOut { attempt, stage }
		});
	}
}
