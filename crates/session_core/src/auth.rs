//! Sign-in state machine: role selection, credential validation, profile
//! construction.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{BloodType, UserProfile, UserRole},
    error::SessionError,
};

/// Raw sign-in form fields, exactly as typed. Validation happens on submit,
/// never while editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub phone: String,
    pub blood_type: String,
    pub location: String,
}

impl Credentials {
    /// Preset credentials behind the demo's one-click sign-in buttons.
    pub fn quick_sign_in(role: UserRole) -> Self {
        match role {
            UserRole::Donor => Self {
                name: "Alex Donor".to_string(),
                phone: "+1 555-0100".to_string(),
                blood_type: "O+".to_string(),
                location: "Midtown".to_string(),
            },
            UserRole::Recipient => Self {
                name: "Sarah Recipient".to_string(),
                phone: "+1 555-0101".to_string(),
                blood_type: "B+".to_string(),
                location: "City Hospital".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    RoleSelected(UserRole),
    Authenticated(UserProfile),
}

impl AuthState {
    pub fn pending_role(&self) -> Option<UserRole> {
        match self {
            AuthState::RoleSelected(role) => Some(*role),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            AuthState::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }

    /// Re-selection while still unauthenticated just overwrites the pending
    /// role; the input surface constrains the value, so this never fails on
    /// the role itself.
    pub fn select_role(&mut self, role: UserRole) -> Result<(), SessionError> {
        match self {
            AuthState::Unauthenticated | AuthState::RoleSelected(_) => {
                *self = AuthState::RoleSelected(role);
                Ok(())
            }
            AuthState::Authenticated(_) => Err(SessionError::InvalidTransition {
                state: "authenticated",
                command: "select_role",
            }),
        }
    }

    /// On success constructs the immutable session profile and moves to
    /// `Authenticated`. On rejection the state is left untouched so the form
    /// stays editable with nothing cleared.
    pub fn submit_credentials(
        &mut self,
        fields: &Credentials,
    ) -> Result<UserProfile, SessionError> {
        let role = match self {
            AuthState::RoleSelected(role) => *role,
            AuthState::Unauthenticated => {
                return Err(SessionError::InvalidTransition {
                    state: "unauthenticated",
                    command: "submit_credentials",
                })
            }
            AuthState::Authenticated(_) => {
                return Err(SessionError::InvalidTransition {
                    state: "authenticated",
                    command: "submit_credentials",
                })
            }
        };

        let profile = build_profile(role, fields)?;
        tracing::info!(name = %profile.name, role = profile.role.label(), "sign-in complete");
        *self = AuthState::Authenticated(profile.clone());
        Ok(profile)
    }
}

fn build_profile(role: UserRole, fields: &Credentials) -> Result<UserProfile, SessionError> {
    let name = required("name", &fields.name)?;
    let phone = required("phone", &fields.phone)?;
    let blood_label = required("blood type", &fields.blood_type)?;
    let location = required("location", &fields.location)?;

    let blood_type = BloodType::parse(&blood_label).ok_or_else(|| {
        SessionError::validation(
            "blood type",
            format!("'{blood_label}' is not a recognized blood type"),
        )
    })?;

    Ok(UserProfile {
        name,
        role,
        blood_type,
        phone,
        location,
    })
}

fn required(field: &'static str, value: &str) -> Result<String, SessionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SessionError::validation(field, "this field is required"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
