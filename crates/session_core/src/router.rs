//! View routing: one active screen, with a single-level return target for
//! the map view.

use shared::{domain::ViewState, error::SessionError};

pub(crate) fn view_name(view: ViewState) -> &'static str {
    match view {
        ViewState::Auth => "auth",
        ViewState::DonorDashboard => "donor_dashboard",
        ViewState::RecipientDashboard => "recipient_dashboard",
        ViewState::Map => "map",
        ViewState::EmergencyForm => "emergency_form",
        ViewState::EmergencyProcessing => "emergency_processing",
        ViewState::EmergencySuccess => "emergency_success",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRouter {
    active: ViewState,
    return_target: Option<ViewState>,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRouter {
    pub fn new() -> Self {
        Self {
            active: ViewState::Auth,
            return_target: None,
        }
    }

    pub fn active(&self) -> ViewState {
        self.active
    }

    /// Resolution is a pure function of the requested view and profile
    /// presence: without a profile every request renders the auth screen.
    pub fn resolve(&self, authenticated: bool) -> ViewState {
        if authenticated {
            self.active
        } else {
            ViewState::Auth
        }
    }

    pub(crate) fn set_active(&mut self, view: ViewState) {
        self.active = view;
    }

    /// Records the invoking dashboard as the return target. Entering the map
    /// while already on it is a no-op and must not overwrite the target.
    pub fn navigate_to_map(&mut self) -> Result<ViewState, SessionError> {
        match self.active {
            view if view.is_dashboard() => {
                self.return_target = Some(view);
                self.active = ViewState::Map;
                Ok(self.active)
            }
            ViewState::Map => Ok(ViewState::Map),
            other => Err(SessionError::InvalidTransition {
                state: view_name(other),
                command: "navigate_to_map",
            }),
        }
    }

    /// Single-level back: restores the recorded dashboard and clears the
    /// target.
    pub fn navigate_back(&mut self) -> Result<ViewState, SessionError> {
        if self.active != ViewState::Map {
            return Err(SessionError::NoReturnTarget);
        }
        let target = self.return_target.take().ok_or(SessionError::NoReturnTarget)?;
        self.active = target;
        Ok(target)
    }

    #[cfg(test)]
    pub(crate) fn return_target(&self) -> Option<ViewState> {
        self.return_target
    }
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
