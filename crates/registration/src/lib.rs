//! Service registration records.
//!
//! A [`ServiceRegistration`] is what a component gets back when it publishes an
//! implementation under one or more interface names. It owns the published
//! [`PropertyTable`], hands out the single [`ServiceReference`] consumers key on,
//! and resolves the service object either directly or through a
//! [`ServiceFactory`].
//!
//! The owning registry is an injected collaborator (see [`Registry`]); records
//! can be built and exercised without one.

/// Bundle and component-instance collaborators.
pub mod context;
/// Registration error types.
pub mod error;
/// Case-insensitive property dictionaries and the locked property table.
pub mod properties;
/// The reusable reference handle.
pub mod reference;
/// The registration record and its lifecycle.
pub mod registration;
/// Direct and factory-backed service object resolution.
pub mod resolver;
/// Property values and identifiers.
pub mod value;

#[cfg(test)]
mod test_fixtures;

pub use context::{Bundle, BundleId, ComponentInstance};
pub use error::RegistrationError;
pub use properties::{OBJECTCLASS, Properties, PropertyTable, SERVICE_ID, SERVICE_RANKING};
pub use reference::ServiceReference;
pub use registration::{Registry, RegistrationOptions, RegistrationState, ServiceRegistration};
pub use resolver::{Publication, ServiceFactory};
pub use value::{PropertyValue, ServiceId, ServiceObject};
