//! Session core for the Blood Connect demo.
//!
//! One owned [`CoordinationSession`] aggregates the sign-in state machine,
//! the view router, and the emergency-request lifecycle. It is driven
//! exclusively through [`SessionCommand`] values and reports transitions as
//! [`SessionEvent`]s, so the presentation bindings (terminal and egui) stay
//! free of state logic. The only suspension point is the broadcast timer, a
//! one-shot task that re-enters the command queue.

use std::time::Duration;

use shared::{
    domain::{
        BroadcastSummary, DonorResponseId, EmergencyRequest, NearbyRequestId, UserProfile,
        UserRole, ViewState,
    },
    error::SessionError,
};
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

pub mod auth;
pub mod emergency;
pub mod feed;
pub mod router;

pub use auth::{AuthState, Credentials};
pub use emergency::{EmergencyForm, EmergencyLifecycle};
pub use feed::DashboardFeeds;
pub use router::ViewRouter;

use router::view_name;

const EVENT_CHANNEL_CAPACITY: usize = 256;

pub const DEFAULT_BROADCAST_DELAY: Duration = Duration::from_secs(3);

pub const RESPOND_ACK_MESSAGE: &str = "Thank you for responding! Your response has been sent \
to the hospital. They will contact you shortly with pickup details.";
pub const CONTACT_ACK_MESSAGE: &str = "Contact initiated! The donor has been notified of your \
request. You should receive a call within 10 minutes.";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long the simulated broadcast stays in Processing. The literal
    /// value is cosmetic; tests drive it with a paused clock.
    pub broadcast_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            broadcast_delay: DEFAULT_BROADCAST_DELAY,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionCommand {
    SelectRole(UserRole),
    SubmitCredentials(Credentials),
    QuickSignIn(UserRole),
    SignOut,
    NavigateToMap,
    NavigateBack,
    OpenEmergencyForm,
    SubmitEmergencyForm(EmergencyForm),
    QuickEmergencyRequest,
    DismissEmergency,
    RespondToRequest(NearbyRequestId),
    ContactDonor(DonorResponseId),
    /// Queued by the broadcast timer, never by a binding.
    CompleteBroadcast,
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::SelectRole(_) => "select_role",
            SessionCommand::SubmitCredentials(_) => "submit_credentials",
            SessionCommand::QuickSignIn(_) => "quick_sign_in",
            SessionCommand::SignOut => "sign_out",
            SessionCommand::NavigateToMap => "navigate_to_map",
            SessionCommand::NavigateBack => "navigate_back",
            SessionCommand::OpenEmergencyForm => "open_emergency_form",
            SessionCommand::SubmitEmergencyForm(_) => "submit_emergency_form",
            SessionCommand::QuickEmergencyRequest => "quick_emergency_request",
            SessionCommand::DismissEmergency => "dismiss_emergency",
            SessionCommand::RespondToRequest(_) => "respond_to_request",
            SessionCommand::ContactDonor(_) => "contact_donor",
            SessionCommand::CompleteBroadcast => "complete_broadcast",
        }
    }

    fn is_internal(&self) -> bool {
        matches!(self, SessionCommand::CompleteBroadcast)
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    RoleSelected(UserRole),
    SignedIn(UserProfile),
    SignedOut,
    ViewChanged(ViewState),
    EmergencyFormOpened(EmergencyForm),
    EmergencySubmitted(EmergencyRequest),
    BroadcastCompleted {
        request: EmergencyRequest,
        summary: BroadcastSummary,
    },
    ResponseAcknowledged(String),
    Rejected(SessionError),
}

pub struct CoordinationSession {
    auth: AuthState,
    router: ViewRouter,
    emergency: EmergencyLifecycle,
    feeds: DashboardFeeds,
    config: SessionConfig,
    events: broadcast::Sender<SessionEvent>,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    broadcast_timer: Option<JoinHandle<()>>,
}

impl CoordinationSession {
    /// Returns the session plus the receiving half of its command queue.
    /// Whoever drains the receiver owns the single event-handling path; the
    /// broadcast timer re-enters through the sending half.
    pub fn new(config: SessionConfig) -> (Self, mpsc::UnboundedReceiver<SessionCommand>) {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let session = Self {
            auth: AuthState::Unauthenticated,
            router: ViewRouter::new(),
            emergency: EmergencyLifecycle::Idle,
            feeds: DashboardFeeds::demo(),
            config,
            events,
            command_tx,
            broadcast_timer: None,
        };
        (session, command_rx)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn command_sender(&self) -> mpsc::UnboundedSender<SessionCommand> {
        self.command_tx.clone()
    }

    /// The screen a binding should render right now.
    pub fn active_view(&self) -> ViewState {
        self.router.resolve(self.auth.profile().is_some())
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.auth.profile()
    }

    pub fn pending_role(&self) -> Option<UserRole> {
        self.auth.pending_role()
    }

    pub fn emergency(&self) -> &EmergencyLifecycle {
        &self.emergency
    }

    pub fn feeds(&self) -> &DashboardFeeds {
        &self.feeds
    }

    /// Applies one command synchronously. Rejections leave every machine
    /// untouched; accepted transitions are reported through the event
    /// channel before this returns.
    pub fn dispatch(&mut self, command: SessionCommand) -> Result<(), SessionError> {
        debug!(
            command = command.name(),
            view = view_name(self.active_view()),
            "dispatching session command"
        );
        match command {
            SessionCommand::SelectRole(role) => {
                self.auth.select_role(role)?;
                self.emit(SessionEvent::RoleSelected(role));
            }
            SessionCommand::SubmitCredentials(fields) => {
                let profile = self.auth.submit_credentials(&fields)?;
                self.finish_sign_in(profile);
            }
            SessionCommand::QuickSignIn(role) => {
                self.auth.select_role(role)?;
                self.emit(SessionEvent::RoleSelected(role));
                let profile = self
                    .auth
                    .submit_credentials(&Credentials::quick_sign_in(role))?;
                self.finish_sign_in(profile);
            }
            SessionCommand::SignOut => {
                if self.auth.profile().is_none() {
                    return Err(SessionError::InvalidTransition {
                        state: "unauthenticated",
                        command: "sign_out",
                    });
                }
                if let Some(timer) = self.broadcast_timer.take() {
                    timer.abort();
                }
                self.auth = AuthState::Unauthenticated;
                self.router = ViewRouter::new();
                self.emergency = EmergencyLifecycle::Idle;
                self.feeds = DashboardFeeds::demo();
                info!("signed out; session reinitialized");
                self.emit(SessionEvent::SignedOut);
                self.emit(SessionEvent::ViewChanged(ViewState::Auth));
            }
            SessionCommand::NavigateToMap => {
                let previous = self.router.active();
                let view = self.router.navigate_to_map()?;
                if view != previous {
                    self.emit(SessionEvent::ViewChanged(view));
                }
            }
            SessionCommand::NavigateBack => {
                let view = self.router.navigate_back()?;
                self.emit(SessionEvent::ViewChanged(view));
            }
            SessionCommand::OpenEmergencyForm => {
                let blood_type = match self.auth.profile() {
                    Some(profile) if self.router.active() == ViewState::RecipientDashboard => {
                        profile.blood_type
                    }
                    _ => {
                        return Err(SessionError::InvalidTransition {
                            state: view_name(self.active_view()),
                            command: "open_emergency_form",
                        })
                    }
                };
                let form = self.emergency.open(blood_type)?;
                self.router.set_active(ViewState::EmergencyForm);
                self.emit(SessionEvent::EmergencyFormOpened(form));
                self.emit(SessionEvent::ViewChanged(ViewState::EmergencyForm));
            }
            SessionCommand::SubmitEmergencyForm(form) => {
                let request = self.emergency.submit(form)?;
                self.begin_processing(request);
            }
            SessionCommand::QuickEmergencyRequest => {
                let request = self.emergency.submit_draft()?;
                self.begin_processing(request);
            }
            SessionCommand::DismissEmergency => {
                self.emergency.dismiss()?;
                self.router.set_active(ViewState::RecipientDashboard);
                self.emit(SessionEvent::ViewChanged(ViewState::RecipientDashboard));
            }
            SessionCommand::RespondToRequest(id) => {
                if self.router.active() != ViewState::DonorDashboard {
                    return Err(SessionError::InvalidTransition {
                        state: view_name(self.active_view()),
                        command: "respond_to_request",
                    });
                }
                self.feeds
                    .nearby_request(id)
                    .ok_or_else(|| SessionError::validation("request", "unknown request"))?;
                self.emit(SessionEvent::ResponseAcknowledged(
                    RESPOND_ACK_MESSAGE.to_string(),
                ));
            }
            SessionCommand::ContactDonor(id) => {
                if self.router.active() != ViewState::RecipientDashboard {
                    return Err(SessionError::InvalidTransition {
                        state: view_name(self.active_view()),
                        command: "contact_donor",
                    });
                }
                self.feeds
                    .donor_response(id)
                    .ok_or_else(|| SessionError::validation("donor", "unknown donor"))?;
                self.emit(SessionEvent::ResponseAcknowledged(
                    CONTACT_ACK_MESSAGE.to_string(),
                ));
            }
            SessionCommand::CompleteBroadcast => {
                let (request, summary) = self.emergency.complete_broadcast()?;
                self.broadcast_timer = None;
                self.router.set_active(ViewState::EmergencySuccess);
                self.emit(SessionEvent::BroadcastCompleted { request, summary });
                self.emit(SessionEvent::ViewChanged(ViewState::EmergencySuccess));
            }
        }
        Ok(())
    }

    fn finish_sign_in(&mut self, profile: UserProfile) {
        self.router.set_active(profile.role.dashboard());
        self.emit(SessionEvent::SignedIn(profile));
        self.emit(SessionEvent::ViewChanged(self.router.active()));
    }

    fn begin_processing(&mut self, request: EmergencyRequest) {
        self.router.set_active(ViewState::EmergencyProcessing);
        self.emit(SessionEvent::EmergencySubmitted(request));
        self.emit(SessionEvent::ViewChanged(ViewState::EmergencyProcessing));
        self.arm_broadcast_timer();
    }

    fn arm_broadcast_timer(&mut self) {
        if let Some(timer) = self.broadcast_timer.take() {
            timer.abort();
        }
        let delay = self.config.broadcast_delay;
        let command_tx = self.command_tx.clone();
        self.broadcast_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if command_tx.send(SessionCommand::CompleteBroadcast).is_err() {
                debug!("command queue closed before broadcast completion");
            }
        }));
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

/// Runs a session on its own task, preserving the single event-handling
/// path: binding commands and timer completions drain through one queue.
pub struct SessionHandle {
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    events: broadcast::Sender<SessionEvent>,
    driver: JoinHandle<()>,
}

impl SessionHandle {
    pub fn spawn(config: SessionConfig) -> Self {
        let (mut session, mut command_rx) = CoordinationSession::new(config);
        let command_tx = session.command_sender();
        let events = session.events.clone();
        let driver_events = events.clone();
        let driver = tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                let name = command.name();
                let internal = command.is_internal();
                if let Err(err) = session.dispatch(command) {
                    if internal {
                        debug!(command = name, %err, "stale internal command dropped");
                    } else {
                        warn!(command = name, %err, "session command rejected");
                        let _ = driver_events.send(SessionEvent::Rejected(err));
                    }
                }
            }
        });
        Self {
            command_tx,
            events,
            driver,
        }
    }

    pub fn send(&self, command: SessionCommand) -> bool {
        self.command_tx.send(command).is_ok()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn shutdown(&self) {
        self.driver.abort();
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
