//! Collaborator doubles shared by unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
	Bundle, ComponentInstance, Registry, ServiceFactory, ServiceId, ServiceObject,
	ServiceRegistration,
};

/// Notification kinds recorded by [`RecordingRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notification {
	PropertiesChanged(ServiceId),
	Unregistered { id: ServiceId, valid_at_notify: bool },
}

#[derive(Default)]
pub(crate) struct RecordingRegistry {
	pub events: Mutex<Vec<Notification>>,
}

impl RecordingRegistry {
	pub fn events(&self) -> Vec<Notification> {
		self.events.lock().clone()
	}
}

impl Registry for RecordingRegistry {
	fn notify_properties_changed(&self, registration: &ServiceRegistration) {
		self.events
			.lock()
			.push(Notification::PropertiesChanged(registration.service_id()));
	}

	fn notify_unregistered(&self, registration: &ServiceRegistration) {
		self.events.lock().push(Notification::Unregistered {
			id: registration.service_id(),
			valid_at_notify: registration.is_valid(),
		});
	}
}

pub(crate) struct TestInstance {
	pub name: String,
	pub bundle: Option<Bundle>,
}

impl TestInstance {
	pub fn with_bundle(name: &str, bundle_id: u64) -> Arc<Self> {
		Arc::new(Self {
			name: name.to_string(),
			bundle: Some(Bundle::new(bundle_id, format!("bundle.{name}"))),
		})
	}

	pub fn without_bundle(name: &str) -> Arc<Self> {
		Arc::new(Self {
			name: name.to_string(),
			bundle: None,
		})
	}
}

impl ComponentInstance for TestInstance {
	fn instance_name(&self) -> &str {
		&self.name
	}

	fn bundle(&self) -> Option<Bundle> {
		self.bundle.clone()
	}
}

/// Factory producing a fresh `u64` per call and recording every call.
#[derive(Default)]
pub(crate) struct CountingFactory {
	pub created: Mutex<Vec<Option<Bundle>>>,
	pub released: Mutex<Vec<(Bundle, ServiceObject)>>,
}

impl ServiceFactory for CountingFactory {
	fn create(
		&self,
		bundle: Option<&Bundle>,
		_registration: &ServiceRegistration,
	) -> Option<ServiceObject> {
		let mut created = self.created.lock();
		created.push(bundle.cloned());
		Some(Arc::new(created.len() as u64))
	}

	fn release(&self, bundle: &Bundle, _registration: &ServiceRegistration, service: &ServiceObject) {
		self.released
			.lock()
			.push((bundle.clone(), Arc::clone(service)));
	}
}

/// Factory that never produces an object.
pub(crate) struct EmptyFactory;

impl ServiceFactory for EmptyFactory {
	fn create(&self, _: Option<&Bundle>, _: &ServiceRegistration) -> Option<ServiceObject> {
		None
	}

	fn release(&self, _: &Bundle, _: &ServiceRegistration, _: &ServiceObject) {}
}
