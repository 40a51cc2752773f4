//! Emergency request lifecycle: Form -> Processing -> Success, strictly
//! forward, with no cancellation once processing begins.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{BloodType, BroadcastSummary, EmergencyRequest, RequestStatus, UrgencyLevel},
    error::SessionError,
};

pub const MIN_UNITS: u32 = 1;
pub const MAX_UNITS: u32 = 99;

/// Editable form state. The blood type is pre-filled from the profile and
/// read-only; units arrive as the raw string the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyForm {
    pub blood_type: BloodType,
    pub units_needed: String,
    pub location: String,
    pub urgency: UrgencyLevel,
    pub notes: String,
}

impl EmergencyForm {
    /// Demo defaults shown when the form opens.
    pub fn prefilled(blood_type: BloodType) -> Self {
        Self {
            blood_type,
            units_needed: "2".to_string(),
            location: "City Hospital".to_string(),
            urgency: UrgencyLevel::Critical,
            notes: "Patient in surgery, immediate need for blood transfusion".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmergencyLifecycle {
    /// No request in flight; the recipient dashboard is in control.
    Idle,
    Form(EmergencyForm),
    Processing(EmergencyRequest),
    Success {
        request: EmergencyRequest,
        summary: BroadcastSummary,
    },
}

impl EmergencyLifecycle {
    pub fn state_name(&self) -> &'static str {
        match self {
            EmergencyLifecycle::Idle => "idle",
            EmergencyLifecycle::Form(_) => "form",
            EmergencyLifecycle::Processing(_) => "processing",
            EmergencyLifecycle::Success { .. } => "success",
        }
    }

    pub fn form(&self) -> Option<&EmergencyForm> {
        match self {
            EmergencyLifecycle::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn request(&self) -> Option<&EmergencyRequest> {
        match self {
            EmergencyLifecycle::Processing(request) => Some(request),
            EmergencyLifecycle::Success { request, .. } => Some(request),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<BroadcastSummary> {
        match self {
            EmergencyLifecycle::Success { summary, .. } => Some(*summary),
            _ => None,
        }
    }

    pub fn open(&mut self, blood_type: BloodType) -> Result<EmergencyForm, SessionError> {
        match self {
            EmergencyLifecycle::Idle => {
                let form = EmergencyForm::prefilled(blood_type);
                *self = EmergencyLifecycle::Form(form.clone());
                Ok(form)
            }
            other => Err(SessionError::InvalidTransition {
                state: other.state_name(),
                command: "open_emergency_form",
            }),
        }
    }

    /// Validates and moves Draft -> Processing. On rejection the form state
    /// is untouched, so the user keeps what they typed.
    pub fn submit(&mut self, form: EmergencyForm) -> Result<EmergencyRequest, SessionError> {
        match self {
            EmergencyLifecycle::Form(_) => {
                let mut request = build_request(form)?;
                request.status = RequestStatus::Processing;
                tracing::info!(
                    blood_type = request.blood_type.label(),
                    units = request.units_needed,
                    urgency = request.urgency.label(),
                    "emergency request submitted"
                );
                *self = EmergencyLifecycle::Processing(request.clone());
                Ok(request)
            }
            other => Err(SessionError::InvalidTransition {
                state: other.state_name(),
                command: "submit_emergency_form",
            }),
        }
    }

    /// One-click request: broadcasts the pre-filled draft unchanged.
    pub fn submit_draft(&mut self) -> Result<EmergencyRequest, SessionError> {
        let form = match self {
            EmergencyLifecycle::Form(form) => form.clone(),
            other => {
                return Err(SessionError::InvalidTransition {
                    state: other.state_name(),
                    command: "quick_emergency_request",
                })
            }
        };
        self.submit(form)
    }

    /// Timer-driven Processing -> Success transition. The summary counts are
    /// static display data.
    pub fn complete_broadcast(
        &mut self,
    ) -> Result<(EmergencyRequest, BroadcastSummary), SessionError> {
        match self {
            EmergencyLifecycle::Processing(request) => {
                let mut request = request.clone();
                request.status = RequestStatus::Broadcast;
                let summary = BroadcastSummary::demo();
                *self = EmergencyLifecycle::Success {
                    request: request.clone(),
                    summary,
                };
                Ok((request, summary))
            }
            other => Err(SessionError::InvalidTransition {
                state: other.state_name(),
                command: "complete_broadcast",
            }),
        }
    }

    /// Cancel from the form or leave the success screen. Processing has no
    /// abort path: the broadcast is fire-and-forget.
    pub fn dismiss(&mut self) -> Result<(), SessionError> {
        match self {
            EmergencyLifecycle::Form(_) | EmergencyLifecycle::Success { .. } => {
                *self = EmergencyLifecycle::Idle;
                Ok(())
            }
            other => Err(SessionError::InvalidTransition {
                state: other.state_name(),
                command: "dismiss_emergency",
            }),
        }
    }
}

fn build_request(form: EmergencyForm) -> Result<EmergencyRequest, SessionError> {
    let units_text = form.units_needed.trim();
    let units_needed: u32 = units_text.parse().map_err(|_| {
        SessionError::validation(
            "units needed",
            format!("'{units_text}' is not a whole number"),
        )
    })?;
    if !(MIN_UNITS..=MAX_UNITS).contains(&units_needed) {
        return Err(SessionError::validation(
            "units needed",
            format!("must be between {MIN_UNITS} and {MAX_UNITS}"),
        ));
    }

    let location = form.location.trim();
    if location.is_empty() {
        return Err(SessionError::validation("location", "this field is required"));
    }

    Ok(EmergencyRequest {
        blood_type: form.blood_type,
        units_needed,
        location: location.to_string(),
        urgency: form.urgency,
        notes: form.notes.trim().to_string(),
        status: RequestStatus::Draft,
    })
}

#[cfg(test)]
#[path = "tests/emergency_tests.rs"]
mod tests;
