use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use crate::context::{Bundle, ComponentInstance};
use crate::properties::OBJECTCLASS;
use crate::registration::ServiceRegistration;
use crate::value::{PropertyValue, ServiceId};

/// The externally visible handle of one registration.
///
/// Each registration owns exactly one reference for its whole life, so
/// equality and hashing are by identity and references can key maps and sets.
/// The handle only holds weak links; it never keeps the registration or the
/// component instance alive.
pub struct ServiceReference {
	registration: Weak<ServiceRegistration>,
	instance: Weak<dyn ComponentInstance>,
	service_id: ServiceId,
}

impl ServiceReference {
	pub(crate) fn new(
		registration: Weak<ServiceRegistration>,
		instance: Weak<dyn ComponentInstance>,
		service_id: ServiceId,
	) -> Self {
		Self {
			registration,
			instance,
			service_id,
		}
	}

	/// Returns the registration, if it is still alive.
	pub fn registration(&self) -> Option<Arc<ServiceRegistration>> {
		self.registration.upgrade()
	}

	/// Returns the id of the registration this handle belongs to.
	pub fn service_id(&self) -> ServiceId {
		self.service_id
	}

	/// Returns true while the registration is alive and still registered.
	pub fn is_valid(&self) -> bool {
		self.registration().is_some_and(|reg| reg.is_valid())
	}

	/// Case-insensitive property lookup.
	pub fn property(&self, key: &str) -> Option<PropertyValue> {
		self.registration()?.property(key)
	}

	/// Snapshot of the property keys; empty once the registration is gone.
	pub fn property_keys(&self) -> Vec<String> {
		self.registration()
			.map(|reg| reg.property_keys())
			.unwrap_or_default()
	}

	/// Returns the component instance the handle was created for.
	pub fn component_instance(&self) -> Option<Arc<dyn ComponentInstance>> {
		self.instance.upgrade()
	}

	/// Returns the bundle context of that component instance.
	pub fn bundle(&self) -> Option<Bundle> {
		self.component_instance()?.bundle()
	}

	/// Returns true if `class` is one of the published interface names.
	pub fn is_assignable_to(&self, class: &str) -> bool {
		matches!(
			self.property(OBJECTCLASS),
			Some(PropertyValue::StringArray(classes)) if classes.iter().any(|c| c == class)
		)
	}

	/// Orders references by preference.
	///
	/// A higher `service.ranking` is greater; at equal ranking the lower service
	/// id (registered earlier) is greater.
	pub fn compare_ranking(&self, other: &Self) -> Ordering {
		self.ranking()
			.cmp(&other.ranking())
			.then_with(|| other.service_id.cmp(&self.service_id))
	}

	fn ranking(&self) -> i64 {
		self.registration().map_or(0, |reg| reg.ranking())
	}
}

impl PartialEq for ServiceReference {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self, other)
	}
}

impl Eq for ServiceReference {}

impl Hash for ServiceReference {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::ptr::hash(self, state);
	}
}

impl fmt::Debug for ServiceReference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServiceReference")
			.field("service_id", &self.service_id)
			.field("valid", &self.is_valid())
			.finish()
	}
}
