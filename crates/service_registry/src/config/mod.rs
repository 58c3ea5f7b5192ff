use serde::{Deserialize, Serialize};
use svcreg_registration::RegistrationOptions;

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Parsed but semantically invalid.
	#[error("invalid registry config: {0}")]
	Invalid(String),
}

/// Settings for a [`crate::LocalRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Id given to the first registration. Must be positive.
	pub first_service_id: i64,
	/// Release factory objects still held by consumers when a registration is withdrawn.
	pub release_outstanding_on_unregister: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			first_service_id: 1,
			release_outstanding_on_unregister: true,
		}
	}
}

impl RegistryConfig {
	/// Parses and validates a TOML document. Missing fields take their defaults.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks semantic constraints.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.first_service_id < 1 {
			return Err(ConfigError::Invalid(format!(
				"first_service_id must be at least 1, got {}",
				self.first_service_id
			)));
		}
		Ok(())
	}

	/// Options applied to every registration built by the registry.
	pub fn registration_options(&self) -> RegistrationOptions {
		RegistrationOptions {
			release_outstanding_on_unregister: self.release_outstanding_on_unregister,
		}
	}
}

#[cfg(test)]
mod tests;
