//! In-process registry for service registration records.
//!
//! [`LocalRegistry`] allocates service ids, indexes live registrations by id and
//! receives their change and removal notifications. It does no filtering and
//! fans out no events.

/// Registry configuration.
pub mod config;
/// Registry errors.
pub mod error;
/// The registry itself.
pub mod local;

pub use config::{ConfigError, RegistryConfig};
pub use error::RegistryError;
pub use local::LocalRegistry;
