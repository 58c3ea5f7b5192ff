use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Type-erased service object handed to consumers.
///
/// Direct publications hand out clones of one `Arc`, so consumers can compare
/// them with [`Arc::ptr_eq`].
pub type ServiceObject = Arc<dyn Any + Send + Sync>;

/// Framework-assigned identifier of a registration. Never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(i64);

impl ServiceId {
	/// Wraps a raw id.
	pub const fn new(raw: i64) -> Self {
		Self(raw)
	}

	/// Returns the raw id.
	pub const fn get(self) -> i64 {
		self.0
	}
}

impl fmt::Display for ServiceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<i64> for ServiceId {
	fn from(raw: i64) -> Self {
		Self(raw)
	}
}

/// The value of a published service property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
	/// Boolean value.
	Bool(bool),
	/// Integer value. Service ids and rankings use this variant.
	Int(i64),
	/// Floating point value.
	Float(f64),
	/// String value.
	String(String),
	/// Array of strings, e.g. the published interface names.
	StringArray(Vec<String>),
	/// Heterogeneous list.
	List(Vec<PropertyValue>),
}

impl PropertyValue {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			PropertyValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			PropertyValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value if this is a `Float` variant.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			PropertyValue::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string value if this is a `String` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			PropertyValue::String(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the strings if this is a `StringArray` variant.
	pub fn as_string_array(&self) -> Option<&[String]> {
		match self {
			PropertyValue::StringArray(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			PropertyValue::Bool(_) => "bool",
			PropertyValue::Int(_) => "int",
			PropertyValue::Float(_) => "float",
			PropertyValue::String(_) => "string",
			PropertyValue::StringArray(_) => "string[]",
			PropertyValue::List(_) => "list",
		}
	}
}

impl From<bool> for PropertyValue {
	fn from(v: bool) -> Self {
		PropertyValue::Bool(v)
	}
}

impl From<i64> for PropertyValue {
	fn from(v: i64) -> Self {
		PropertyValue::Int(v)
	}
}

impl From<i32> for PropertyValue {
	fn from(v: i32) -> Self {
		PropertyValue::Int(i64::from(v))
	}
}

impl From<f64> for PropertyValue {
	fn from(v: f64) -> Self {
		PropertyValue::Float(v)
	}
}

impl From<String> for PropertyValue {
	fn from(v: String) -> Self {
		PropertyValue::String(v)
	}
}

impl From<&str> for PropertyValue {
	fn from(v: &str) -> Self {
		PropertyValue::String(v.to_string())
	}
}

impl From<Vec<String>> for PropertyValue {
	fn from(v: Vec<String>) -> Self {
		PropertyValue::StringArray(v)
	}
}

impl From<&[&str]> for PropertyValue {
	fn from(v: &[&str]) -> Self {
		PropertyValue::StringArray(v.iter().map(|s| s.to_string()).collect())
	}
}

impl From<Vec<PropertyValue>> for PropertyValue {
	fn from(v: Vec<PropertyValue>) -> Self {
		PropertyValue::List(v)
	}
}

impl From<ServiceId> for PropertyValue {
	fn from(id: ServiceId) -> Self {
		PropertyValue::Int(id.get())
	}
}
