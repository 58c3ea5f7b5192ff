//! The registration record.
//!
//! # Role
//!
//! A [`ServiceRegistration`] is created by the owning registry when a component
//! publishes a service. It governs how consumers obtain and release the service
//! object and how the publisher updates or withdraws it.
//!
//! # Invariants
//!
//! - The record is unregistered exactly when its published object slot is empty.
//!   Unregistration is terminal and happens at most once, even under racing callers.
//! - [`ServiceRegistration::reference`] returns the same handle for the record's
//!   whole life.
//! - The registry is notified of an unregistration before the object is cleared,
//!   and of a property change after the new table is visible.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;
use tracing::{debug, trace, warn};

use crate::context::ComponentInstance;
use crate::error::RegistrationError;
use crate::properties::{Properties, PropertyTable, SERVICE_RANKING};
use crate::reference::ServiceReference;
use crate::resolver::{Publication, ServiceObjectResolver};
use crate::value::{PropertyValue, ServiceId, ServiceObject};

/// The registry collaborator a registration reports to.
///
/// Implementations must not call back into the registration's mutating
/// operations from these notifications.
pub trait Registry: Send + Sync {
	/// Called after the registration's properties were replaced.
	fn notify_properties_changed(&self, registration: &ServiceRegistration);

	/// Called when the registration starts unregistering, before its object is cleared.
	fn notify_unregistered(&self, registration: &ServiceRegistration);
}

/// Lifecycle state of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
	Active,
	Unregistered,
}

/// Behavior knobs for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationOptions {
	/// Release factory objects still tracked for consumers when unregistering.
	pub release_outstanding_on_unregister: bool,
}

impl Default for RegistrationOptions {
	fn default() -> Self {
		Self {
			release_outstanding_on_unregister: true,
		}
	}
}

/// One published service.
pub struct ServiceRegistration {
	registry: Weak<dyn Registry>,
	classes: Arc<[String]>,
	service_id: ServiceId,
	resolver: ArcSwapOption<ServiceObjectResolver>,
	unregister_claimed: AtomicBool,
	properties: PropertyTable,
	reference: Arc<ServiceReference>,
	options: RegistrationOptions,
}

impl ServiceRegistration {
	/// Builds an active registration with default options.
	///
	/// `properties` of `None` publishes only the framework keys.
	pub fn new<C, S>(
		registry: Weak<dyn Registry>,
		instance: Weak<dyn ComponentInstance>,
		classes: C,
		service_id: ServiceId,
		publication: Publication,
		properties: Option<&Properties>,
	) -> Arc<Self>
	where
		C: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::with_options(
			registry,
			instance,
			classes,
			service_id,
			publication,
			properties,
			RegistrationOptions::default(),
		)
	}

	/// Builds an active registration.
	pub fn with_options<C, S>(
		registry: Weak<dyn Registry>,
		instance: Weak<dyn ComponentInstance>,
		classes: C,
		service_id: ServiceId,
		publication: Publication,
		properties: Option<&Properties>,
		options: RegistrationOptions,
	) -> Arc<Self>
	where
		C: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let classes: Arc<[String]> = classes.into_iter().map(Into::<String>::into).collect();
		let properties = PropertyTable::new(properties, &classes, service_id);
		let resolver = ServiceObjectResolver::from(publication);

		Arc::new_cyclic(|this| Self {
			registry,
			classes,
			service_id,
			resolver: ArcSwapOption::from_pointee(resolver),
			unregister_claimed: AtomicBool::new(false),
			properties,
			reference: Arc::new(ServiceReference::new(this.clone(), instance, service_id)),
			options,
		})
	}

	/// Returns the framework-assigned id.
	pub fn service_id(&self) -> ServiceId {
		self.service_id
	}

	/// Returns the published interface names, in publication order.
	pub fn classes(&self) -> &[String] {
		&self.classes
	}

	/// Returns the reusable reference handle.
	pub fn reference(&self) -> Arc<ServiceReference> {
		Arc::clone(&self.reference)
	}

	/// Returns true while the registration is active.
	pub fn is_valid(&self) -> bool {
		self.resolver.load().is_some()
	}

	/// Returns the lifecycle state.
	pub fn state(&self) -> RegistrationState {
		if self.is_valid() {
			RegistrationState::Active
		} else {
			RegistrationState::Unregistered
		}
	}

	/// Replaces the published properties and notifies the registry.
	///
	/// # Errors
	///
	/// [`RegistrationError::InvalidState`] once unregistered; the table is left
	/// untouched.
	pub fn set_properties(&self, properties: Option<&Properties>) -> Result<(), RegistrationError> {
		if !self.is_valid() {
			return Err(self.invalid_state("set properties"));
		}

		self.properties
			.replace(properties, &self.classes, self.service_id);
		trace!(service_id = %self.service_id, "service properties replaced");

		match self.registry.upgrade() {
			Some(registry) => registry.notify_properties_changed(self),
			None => warn!(service_id = %self.service_id, "registry dropped; property change not reported"),
		}
		Ok(())
	}

	/// Withdraws the service.
	///
	/// The registry is told first; the published object (and any factory) is
	/// dropped afterwards.
	///
	/// # Errors
	///
	/// [`RegistrationError::InvalidState`] if the registration was already
	/// unregistered or another caller is unregistering it.
	pub fn unregister(&self) -> Result<(), RegistrationError> {
		if !self.is_valid()
			|| self
				.unregister_claimed
				.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
				.is_err()
		{
			return Err(self.invalid_state("unregister"));
		}

		match self.registry.upgrade() {
			Some(registry) => registry.notify_unregistered(self),
			None => warn!(service_id = %self.service_id, "registry dropped; unregistration not reported"),
		}

		let resolver = self.resolver.swap(None);
		debug!(service_id = %self.service_id, classes = ?self.classes, "service unregistered");

		if self.options.release_outstanding_on_unregister
			&& let Some(resolver) = resolver
		{
			resolver.release_outstanding(self);
		}
		Ok(())
	}

	/// Case-insensitive property lookup. Readable in any state.
	pub fn property(&self, key: &str) -> Option<PropertyValue> {
		self.properties.get(key)
	}

	/// Returns a fresh snapshot of the property keys.
	pub fn property_keys(&self) -> Vec<String> {
		self.properties.snapshot_keys()
	}

	/// Returns a copy of all published properties.
	pub fn properties(&self) -> Properties {
		self.properties.snapshot()
	}

	/// Returns the `service.ranking` property, or 0 when absent or not an integer.
	pub fn ranking(&self) -> i64 {
		self.property(SERVICE_RANKING)
			.and_then(|value| value.as_int())
			.unwrap_or(0)
	}

	/// Returns the service object without consumer accounting.
	///
	/// A direct publication yields the same object every call. A factory is
	/// invoked with no bundle and its result is returned unchanged. `None` once
	/// unregistered.
	pub fn service(&self) -> Option<ServiceObject> {
		let resolver = self.resolver.load_full()?;
		resolver.resolve(self)
	}

	/// Returns the service object for `instance`, tracking factory objects so
	/// they are released on [`ServiceRegistration::unget_service`] or unregistration.
	pub fn service_for(&self, instance: &dyn ComponentInstance) -> Option<ServiceObject> {
		let resolver = self.resolver.load_full()?;
		resolver.resolve_for(self, instance)
	}

	/// Releases a service object obtained by `instance`.
	///
	/// A no-op for direct publications. For factories the release reaches the
	/// factory only when `instance` exposes a bundle.
	pub fn unget_service(&self, instance: &dyn ComponentInstance, service: &ServiceObject) {
		if let Some(resolver) = self.resolver.load_full() {
			resolver.release(self, instance, service);
		}
	}

	/// Number of factory objects currently tracked for `instance_name`.
	pub fn outstanding(&self, instance_name: &str) -> usize {
		match &*self.resolver.load() {
			Some(resolver) => resolver.outstanding(instance_name),
			None => 0,
		}
	}

	fn invalid_state(&self, operation: &'static str) -> RegistrationError {
		RegistrationError::InvalidState {
			service_id: self.service_id,
			operation,
		}
	}
}

impl PartialEq for ServiceRegistration {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self, other)
	}
}

impl Eq for ServiceRegistration {}

impl Hash for ServiceRegistration {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::ptr::hash(self, state);
	}
}

impl fmt::Debug for ServiceRegistration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServiceRegistration")
			.field("service_id", &self.service_id)
			.field("classes", &self.classes)
			.field("state", &self.state())
			.finish()
	}
}
