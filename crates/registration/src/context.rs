use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleId(pub u64);

impl fmt::Display for BundleId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Execution context a component instance runs in.
///
/// Factories receive it so they can account objects per consuming module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bundle {
	pub id: BundleId,
	pub symbolic_name: String,
}

impl Bundle {
	/// Creates a bundle context.
	pub fn new(id: u64, symbolic_name: impl Into<String>) -> Self {
		Self {
			id: BundleId(id),
			symbolic_name: symbolic_name.into(),
		}
	}
}

impl fmt::Display for Bundle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} [{}]", self.symbolic_name, self.id)
	}
}

/// A component instance that publishes or consumes services.
pub trait ComponentInstance: Send + Sync {
	/// Returns the instance name. Unique among live instances.
	fn instance_name(&self) -> &str;

	/// Returns the bundle context of this instance, when it has one.
	///
	/// Instances managed outside a bundle return `None`; factory releases are
	/// skipped for them.
	fn bundle(&self) -> Option<Bundle>;
}
