use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_empty_document_uses_defaults() {
	let config = RegistryConfig::from_toml_str("").expect("empty config parses");
	assert_eq!(config, RegistryConfig::default());
	assert_eq!(config.first_service_id, 1);
	assert!(config.release_outstanding_on_unregister);
}

#[test]
fn test_parses_all_fields() {
	const CONFIG: &str = r#"
first_service_id = 100
release_outstanding_on_unregister = false
"#;
	let config = RegistryConfig::from_toml_str(CONFIG).expect("valid config");
	assert_eq!(
		config,
		RegistryConfig {
			first_service_id: 100,
			release_outstanding_on_unregister: false,
		}
	);
	assert_eq!(
		config.registration_options(),
		RegistrationOptions {
			release_outstanding_on_unregister: false,
		}
	);
}

#[test]
fn test_rejects_unknown_fields() {
	let err = RegistryConfig::from_toml_str("first_id = 3").expect_err("unknown field");
	assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_rejects_wrong_type() {
	let err =
		RegistryConfig::from_toml_str("first_service_id = \"one\"").expect_err("string id");
	assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_rejects_non_positive_first_id() {
	let err = RegistryConfig::from_toml_str("first_service_id = 0").expect_err("zero id");
	assert!(matches!(err, ConfigError::Invalid(_)));
	assert_eq!(
		err.to_string(),
		"invalid registry config: first_service_id must be at least 1, got 0"
	);
}
