use svcreg_registration::{RegistrationError, ServiceId};

/// Registry operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// A service must be published under at least one interface name.
	#[error("a service must be registered under at least one class")]
	NoClasses,

	/// The id space is used up. Ids are never reused.
	#[error("service ids exhausted")]
	IdsExhausted,

	/// No live registration carries this id.
	#[error("no service registered with id {0}")]
	UnknownService(ServiceId),

	#[error(transparent)]
	Registration(#[from] RegistrationError),
}
