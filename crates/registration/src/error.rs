use crate::value::ServiceId;

/// Registration lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
	/// The registration is no longer active.
	#[error("cannot {operation}: service {service_id} is no longer registered")]
	InvalidState {
		service_id: ServiceId,
		operation: &'static str,
	},
}

impl RegistrationError {
	/// Returns true for [`RegistrationError::InvalidState`].
	pub fn is_invalid_state(&self) -> bool {
		matches!(self, RegistrationError::InvalidState { .. })
	}
}
