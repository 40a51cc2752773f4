use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Rejected form input. The originating form stays editable and no
    /// fields are cleared.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Back-navigation requested outside the map view. Unreachable through
    /// the UI, which only exposes the back action from the map.
    #[error("no return target recorded outside the map view")]
    NoReturnTarget,

    /// A command arrived in a view it is not valid in.
    #[error("'{command}' is not valid in the {state} state")]
    InvalidTransition {
        state: &'static str,
        command: &'static str,
    },
}

impl SessionError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SessionError::Validation { .. })
    }
}
