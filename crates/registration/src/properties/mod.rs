//! Published service properties.
//!
//! # Invariants
//!
//! - Keys differing only in letter case address one entry.
//! - A [`PropertyTable`] always carries [`OBJECTCLASS`] and [`SERVICE_ID`] with
//!   the framework-assigned values; caller data never overrides them.
//! - Readers of a [`PropertyTable`] never observe a partially replaced table.

use std::collections::BTreeMap;
use std::collections::btree_map;

use parking_lot::RwLock;

use crate::value::{PropertyValue, ServiceId};

/// Property holding the published interface names.
pub const OBJECTCLASS: &str = "objectClass";
/// Property holding the framework-assigned service id.
pub const SERVICE_ID: &str = "service.id";
/// Property holding the optional ranking used to order references.
pub const SERVICE_RANKING: &str = "service.ranking";

#[derive(Debug, Clone, PartialEq)]
struct Entry {
	key: String,
	value: PropertyValue,
}

/// Case-insensitive property dictionary.
///
/// The first spelling written for a key is the one reported by [`Properties::keys`];
/// later writes under another casing replace only the value. Iteration follows
/// case-folded key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
	entries: BTreeMap<String, Entry>,
}

fn fold(key: &str) -> String {
	key.to_lowercase()
}

impl Properties {
	/// Creates an empty dictionary.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style [`Properties::insert`].
	pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
		self.insert(key, value);
		self
	}

	/// Inserts a value, returning the previous value stored under any casing of `key`.
	pub fn insert(
		&mut self,
		key: impl Into<String>,
		value: impl Into<PropertyValue>,
	) -> Option<PropertyValue> {
		let key = key.into();
		let value = value.into();
		match self.entries.entry(fold(&key)) {
			btree_map::Entry::Occupied(mut slot) => {
				Some(std::mem::replace(&mut slot.get_mut().value, value))
			}
			btree_map::Entry::Vacant(slot) => {
				slot.insert(Entry { key, value });
				None
			}
		}
	}

	/// Inserts a value and makes `key` the stored spelling.
	pub fn force_insert(&mut self, key: &str, value: impl Into<PropertyValue>) {
		self.entries.insert(
			fold(key),
			Entry {
				key: key.to_string(),
				value: value.into(),
			},
		);
	}

	/// Removes the entry stored under any casing of `key`.
	pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
		self.entries.remove(&fold(key)).map(|entry| entry.value)
	}

	/// Looks up a value case-insensitively.
	pub fn get(&self, key: &str) -> Option<&PropertyValue> {
		self.entries.get(&fold(key)).map(|entry| &entry.value)
	}

	/// Returns true if any casing of `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(&fold(key))
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if the dictionary is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns the stored key spellings.
	pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
		self.entries.values().map(|entry| entry.key.as_str())
	}

	/// Returns `(key, value)` pairs using the stored key spellings.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> + '_ {
		self.entries
			.values()
			.map(|entry| (entry.key.as_str(), &entry.value))
	}

	/// Removes every entry.
	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Clears the dictionary and copies every entry of `dict`. `None` leaves it empty.
	pub fn replace_all(&mut self, dict: Option<&Properties>) {
		self.entries.clear();
		if let Some(dict) = dict {
			for (key, value) in dict.iter() {
				self.insert(key, value.clone());
			}
		}
	}

	/// Force-writes [`OBJECTCLASS`] and [`SERVICE_ID`], replacing caller values
	/// stored under any casing of those keys.
	pub fn inject_framework_keys(&mut self, classes: &[String], service_id: ServiceId) {
		self.force_insert(OBJECTCLASS, PropertyValue::StringArray(classes.to_vec()));
		self.force_insert(SERVICE_ID, service_id);
	}
}

impl<K, V> FromIterator<(K, V)> for Properties
where
	K: Into<String>,
	V: Into<PropertyValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut props = Properties::new();
		props.extend(iter);
		props
	}
}

impl<K, V> Extend<(K, V)> for Properties
where
	K: Into<String>,
	V: Into<PropertyValue>,
{
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key, value);
		}
	}
}

/// Lock-guarded property table owned by one registration.
///
/// Every read and the single replace path take the same lock, so a reader sees
/// either the table before a replace or after it, framework keys included.
#[derive(Debug, Default)]
pub struct PropertyTable {
	inner: RwLock<Properties>,
}

impl PropertyTable {
	/// Builds a table from `initial` plus the framework keys.
	pub fn new(initial: Option<&Properties>, classes: &[String], service_id: ServiceId) -> Self {
		let table = Self::default();
		table.replace(initial, classes, service_id);
		table
	}

	/// Replaces the contents wholesale and re-injects the framework keys under
	/// one write guard.
	pub fn replace(&self, dict: Option<&Properties>, classes: &[String], service_id: ServiceId) {
		let mut guard = self.inner.write();
		guard.replace_all(dict);
		guard.inject_framework_keys(classes, service_id);
	}

	/// Looks up a value case-insensitively.
	pub fn get(&self, key: &str) -> Option<PropertyValue> {
		self.inner.read().get(key).cloned()
	}

	/// Returns a freshly allocated list of the current keys.
	pub fn snapshot_keys(&self) -> Vec<String> {
		self.inner.read().keys().map(str::to_owned).collect()
	}

	/// Returns a copy of the current contents.
	pub fn snapshot(&self) -> Properties {
		self.inner.read().clone()
	}

	/// Returns the number of entries, framework keys included.
	pub fn len(&self) -> usize {
		self.inner.read().len()
	}

	/// Always false once built through [`PropertyTable::new`].
	pub fn is_empty(&self) -> bool {
		self.inner.read().is_empty()
	}
}
