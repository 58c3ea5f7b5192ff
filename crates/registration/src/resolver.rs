//! Service object resolution.
//!
//! A registration either publishes one shared object or a [`ServiceFactory`]
//! that creates objects on request. The resolver is built once from the
//! [`Publication`] and dropped when the registration is unregistered.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::context::{Bundle, ComponentInstance};
use crate::registration::ServiceRegistration;
use crate::value::ServiceObject;

/// Per-request service object creation capability.
pub trait ServiceFactory: Send + Sync {
	/// Creates a service object for `bundle`, or for no particular consumer when
	/// `bundle` is `None`. A `None` result is handed to the caller as-is.
	fn create(
		&self,
		bundle: Option<&Bundle>,
		registration: &ServiceRegistration,
	) -> Option<ServiceObject>;

	/// Releases an object previously created for `bundle`.
	fn release(&self, bundle: &Bundle, registration: &ServiceRegistration, service: &ServiceObject);
}

/// What a component publishes.
#[derive(Clone)]
pub enum Publication {
	/// One object shared by every consumer.
	Direct(ServiceObject),
	/// A factory invoked per request.
	Factory(Arc<dyn ServiceFactory>),
}

impl Publication {
	/// Publishes `service` directly.
	pub fn direct<T: Any + Send + Sync>(service: T) -> Self {
		Publication::Direct(Arc::new(service))
	}

	/// Publishes through `factory`.
	pub fn factory<F: ServiceFactory + 'static>(factory: F) -> Self {
		Publication::Factory(Arc::new(factory))
	}

	/// Returns true for [`Publication::Factory`].
	pub fn is_factory(&self) -> bool {
		matches!(self, Publication::Factory(_))
	}
}

impl fmt::Debug for Publication {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Publication::Direct(_) => f.write_str("Publication::Direct(..)"),
			Publication::Factory(_) => f.write_str("Publication::Factory(..)"),
		}
	}
}

/// An object created for a tracked consumer.
pub(crate) struct Handout {
	object: ServiceObject,
	bundle: Option<Bundle>,
}

/// Tracked objects, keyed by consuming instance name.
#[derive(Default)]
pub(crate) struct Handouts {
	by_instance: FxHashMap<String, Vec<Handout>>,
	/// Set once outstanding objects were released on unregistration. Later
	/// releases are no-ops so no object reaches the factory twice.
	drained: bool,
}

impl Handouts {
	fn track(&mut self, instance: String, handout: Handout) {
		if !self.drained {
			self.by_instance.entry(instance).or_default().push(handout);
		}
	}

	fn untrack(&mut self, instance: &str, service: &ServiceObject) {
		let Some(handouts) = self.by_instance.get_mut(instance) else {
			return;
		};
		if let Some(pos) = handouts
			.iter()
			.position(|h| Arc::ptr_eq(&h.object, service))
		{
			handouts.swap_remove(pos);
		}
		if handouts.is_empty() {
			self.by_instance.remove(instance);
		}
	}
}

pub(crate) enum ServiceObjectResolver {
	Direct(ServiceObject),
	Factory {
		factory: Arc<dyn ServiceFactory>,
		/// Objects handed out through [`ServiceObjectResolver::resolve_for`].
		handed_out: Mutex<Handouts>,
	},
}

impl fmt::Debug for ServiceObjectResolver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ServiceObjectResolver::Direct(_) => f.write_str("Direct(..)"),
			ServiceObjectResolver::Factory { handed_out, .. } => f
				.debug_struct("Factory")
				.field("consumers", &handed_out.lock().by_instance.len())
				.finish(),
		}
	}
}

impl From<Publication> for ServiceObjectResolver {
	fn from(publication: Publication) -> Self {
		match publication {
			Publication::Direct(object) => ServiceObjectResolver::Direct(object),
			Publication::Factory(factory) => ServiceObjectResolver::Factory {
				factory,
				handed_out: Mutex::new(Handouts::default()),
			},
		}
	}
}

impl ServiceObjectResolver {
	/// Resolves without consumer identity. Factory objects obtained here are not
	/// tracked.
	pub(crate) fn resolve(&self, registration: &ServiceRegistration) -> Option<ServiceObject> {
		match self {
			ServiceObjectResolver::Direct(object) => Some(Arc::clone(object)),
			ServiceObjectResolver::Factory { factory, .. } => factory.create(None, registration),
		}
	}

	/// Resolves for `instance`, recording factory objects so they can be released later.
	pub(crate) fn resolve_for(
		&self,
		registration: &ServiceRegistration,
		instance: &dyn ComponentInstance,
	) -> Option<ServiceObject> {
		match self {
			ServiceObjectResolver::Direct(object) => Some(Arc::clone(object)),
			ServiceObjectResolver::Factory {
				factory,
				handed_out,
			} => {
				let bundle = instance.bundle();
				let name = instance.instance_name().to_string();
				let object = factory.create(bundle.as_ref(), registration)?;
				handed_out.lock().track(
					name,
					Handout {
						object: Arc::clone(&object),
						bundle,
					},
				);
				Some(object)
			}
		}
	}

	/// Releases `service` on behalf of `instance`.
	///
	/// Acquisition always reaches the factory, but release only does when the
	/// instance exposes a bundle. Kept for compatibility until it is settled
	/// whether instances without a bundle leak factory objects.
	pub(crate) fn release(
		&self,
		registration: &ServiceRegistration,
		instance: &dyn ComponentInstance,
		service: &ServiceObject,
	) {
		let ServiceObjectResolver::Factory {
			factory,
			handed_out,
		} = self
		else {
			return;
		};

		let name = instance.instance_name();
		let drained = {
			let mut handouts = handed_out.lock();
			handouts.untrack(name, service);
			handouts.drained
		};
		if drained {
			trace!(
				service_id = %registration.service_id(),
				instance = name,
				"release skipped: outstanding objects already released"
			);
			return;
		}

		match instance.bundle() {
			Some(bundle) => factory.release(&bundle, registration, service),
			None => trace!(
				service_id = %registration.service_id(),
				instance = name,
				"release skipped: instance has no bundle"
			),
		}
	}

	/// Number of tracked objects held by `instance_name`.
	pub(crate) fn outstanding(&self, instance_name: &str) -> usize {
		match self {
			ServiceObjectResolver::Direct(_) => 0,
			ServiceObjectResolver::Factory { handed_out, .. } => handed_out
				.lock()
				.by_instance
				.get(instance_name)
				.map_or(0, Vec::len),
		}
	}

	/// Releases every tracked object that was created with a bundle.
	pub(crate) fn release_outstanding(&self, registration: &ServiceRegistration) {
		let ServiceObjectResolver::Factory {
			factory,
			handed_out,
		} = self
		else {
			return;
		};

		let drained = {
			let mut handouts = handed_out.lock();
			handouts.drained = true;
			std::mem::take(&mut handouts.by_instance)
		};
		for (instance, handouts) in drained {
			for handout in handouts {
				match handout.bundle {
					Some(bundle) => factory.release(&bundle, registration, &handout.object),
					None => trace!(
						service_id = %registration.service_id(),
						instance = %instance,
						"outstanding object dropped without release"
					),
				}
			}
		}
	}
}
