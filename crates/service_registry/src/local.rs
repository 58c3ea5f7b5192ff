//! In-process registry.
//!
//! # Invariants
//!
//! - Service ids are allocated from a monotonic counter and never reused.
//! - A registration is indexed from [`LocalRegistry::register_service`] until its
//!   unregistration notification arrives.
//! - Notifications never call back into the registration's mutating operations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use svcreg_registration::{
	ComponentInstance, Properties, Publication, Registry, ServiceId, ServiceRegistration,
};
use tracing::debug;

use crate::{RegistryConfig, RegistryError};

/// Index state kept under one lock so records and counters move together.
#[derive(Default)]
struct RegistryState {
	records: FxHashMap<ServiceId, Arc<ServiceRegistration>>,
	/// Property-change notifications received per live registration.
	modifications: FxHashMap<ServiceId, u64>,
}

/// Minimal in-process registry.
pub struct LocalRegistry {
	this: Weak<LocalRegistry>,
	config: RegistryConfig,
	/// Ids handed out so far, counted from `config.first_service_id`.
	issued: AtomicU64,
	state: RwLock<RegistryState>,
}

impl LocalRegistry {
	/// Creates an empty registry.
	pub fn new(config: RegistryConfig) -> Arc<Self> {
		Arc::new_cyclic(|this| Self {
			this: this.clone(),
			issued: AtomicU64::new(0),
			config,
			state: RwLock::new(RegistryState::default()),
		})
	}

	/// Creates an empty registry with [`RegistryConfig::default`].
	pub fn with_defaults() -> Arc<Self> {
		Self::new(RegistryConfig::default())
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Publishes a service and returns its registration.
	///
	/// # Errors
	///
	/// [`RegistryError::NoClasses`] when `classes` is empty;
	/// [`RegistryError::IdsExhausted`] once every id up to `i64::MAX` was issued.
	pub fn register_service<C, S>(
		&self,
		instance: Weak<dyn ComponentInstance>,
		classes: C,
		publication: Publication,
		properties: Option<&Properties>,
	) -> Result<Arc<ServiceRegistration>, RegistryError>
	where
		C: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
		if classes.is_empty() {
			return Err(RegistryError::NoClasses);
		}

		let service_id = self.allocate_id()?;
		let registry: Weak<dyn Registry> = self.this.clone();
		let registration = ServiceRegistration::with_options(
			registry,
			instance,
			classes,
			service_id,
			publication,
			properties,
			self.config.registration_options(),
		);

		self.state
			.write()
			.records
			.insert(service_id, Arc::clone(&registration));
		debug!(service_id = %service_id, classes = ?registration.classes(), "service registered");
		Ok(registration)
	}

	fn allocate_id(&self) -> Result<ServiceId, RegistryError> {
		let offset = self.issued.fetch_add(1, Ordering::AcqRel);
		i64::try_from(offset)
			.ok()
			.and_then(|offset| self.config.first_service_id.checked_add(offset))
			.map(ServiceId::new)
			.ok_or(RegistryError::IdsExhausted)
	}

	/// Unregisters the service with `id`.
	///
	/// # Errors
	///
	/// [`RegistryError::UnknownService`] if no live registration has `id`;
	/// [`RegistryError::Registration`] if it is already being unregistered.
	pub fn unregister_service(&self, id: ServiceId) -> Result<(), RegistryError> {
		let registration = self.get(id).ok_or(RegistryError::UnknownService(id))?;
		registration.unregister()?;
		Ok(())
	}

	/// Unregisters every live registration and returns how many this call withdrew.
	pub fn unregister_all(&self) -> usize {
		let live: Vec<_> = self.state.read().records.values().cloned().collect();
		live.iter().filter(|reg| reg.unregister().is_ok()).count()
	}

	/// Returns the live registration with `id`.
	pub fn get(&self, id: ServiceId) -> Option<Arc<ServiceRegistration>> {
		self.state.read().records.get(&id).cloned()
	}

	/// Returns the ids of live registrations, ascending.
	pub fn service_ids(&self) -> Vec<ServiceId> {
		let mut ids: Vec<_> = self.state.read().records.keys().copied().collect();
		ids.sort_unstable();
		ids
	}

	/// Returns how many property changes the live registration `id` reported.
	pub fn modification_count(&self, id: ServiceId) -> u64 {
		self.state
			.read()
			.modifications
			.get(&id)
			.copied()
			.unwrap_or(0)
	}

	/// Returns the number of live registrations.
	pub fn len(&self) -> usize {
		self.state.read().records.len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Registry for LocalRegistry {
	fn notify_properties_changed(&self, registration: &ServiceRegistration) {
		let id = registration.service_id();
		let mut state = self.state.write();
		if state.records.contains_key(&id) {
			*state.modifications.entry(id).or_default() += 1;
		}
	}

	fn notify_unregistered(&self, registration: &ServiceRegistration) {
		let id = registration.service_id();
		let removed = {
			let mut state = self.state.write();
			state.modifications.remove(&id);
			state.records.remove(&id)
		};
		if removed.is_some() {
			debug!(service_id = %id, "service removed from registry");
		}
	}
}

impl std::fmt::Debug for LocalRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LocalRegistry")
			.field("config", &self.config)
			.field("live", &self.len())
			.finish()
	}
}
