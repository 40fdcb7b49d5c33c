//! Ordered key/value table with the host's object-key enumeration order.

use std::fmt;
use std::ops::ControlFlow;

use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::guard::Guarded;
use crate::key::{IntoKey, Key};
use crate::source::Source;
use crate::table::Record;
use crate::value::Value;


/// One key/value pair of a [`Map`], detached from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapEntry {
	key: Key,
	#[serde(skip_serializing_if = "Value::is_undefined")]
	value: Value,
}

impl MapEntry {
	/// Creates an entry, coercing `key` to its canonical form.
	pub fn new(key: impl IntoKey, value: impl Into<Value>) -> Self {
		Self {
			key: key.into_key(),
			value: value.into(),
		}
	}

	/// Returns the entry's key.
	pub fn key(&self) -> &Key {
		&self.key
	}

	/// Returns the entry's value.
	pub fn value(&self) -> &Value {
		&self.value
	}

	/// Splits the entry into its key and value.
	pub fn into_parts(self) -> (Key, Value) {
		(self.key, self.value)
	}

	/// Returns `{"key": .., "value": ..}`.
	pub fn to_object(&self) -> Record {
		let mut record = Record::new();
		record.insert(Key::new("key"), self.key.to_value());
		record.insert(Key::new("value"), self.value.clone());
		record
	}
}

impl From<MapEntry> for Value {
	fn from(entry: MapEntry) -> Self {
		Value::Object(entry.to_object())
	}
}

impl fmt::Display for MapEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&Value::Object(self.to_object()).to_json())
	}
}

/// Key/value table enumerating index-like keys first (ascending), then the
/// remaining keys in first-insertion order.
///
/// Mutators take `&self` and return `&Self` so calls chain; all of them fail
/// with `ConcurrentModification` while a traversal of this map is running.
#[derive(Default)]
pub struct Map {
	table: Guarded<Record>,
}

impl Map {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a map from a map, a set, an object or key/value pairs.
	pub fn from_source<'a>(source: impl Into<Source<'a>>) -> Result<Self> {
		let entries = source.into().entries("Map(object)")?;
		Ok(Self::from_iter(entries))
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.table.read().len()
	}

	/// Returns true if the map holds no entries.
	pub fn is_empty(&self) -> bool {
		self.table.read().is_empty()
	}

	/// Returns true while a traversal of this container is running.
	pub fn is_iterating(&self) -> bool {
		self.table.is_traversing()
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: impl IntoKey) -> Option<Value> {
		self.table.read().get(key.into_key().as_str()).cloned()
	}

	/// Looks up several keys at once; absent keys yield `None`.
	pub fn get_many<K: IntoKey>(&self, keys: impl IntoIterator<Item = K>) -> Vec<Option<Value>> {
		let table = self.table.read();
		keys.into_iter()
			.map(|k| table.get(k.into_key().as_str()).cloned())
			.collect()
	}

	/// Returns true if `key` is present.
	pub fn has(&self, key: impl IntoKey) -> bool {
		self.table.read().contains_key(key.into_key().as_str())
	}

	/// Tests several keys at once, in argument order.
	pub fn has_many<K: IntoKey>(&self, keys: impl IntoIterator<Item = K>) -> Vec<bool> {
		let table = self.table.read();
		keys.into_iter()
			.map(|k| table.contains_key(k.into_key().as_str()))
			.collect()
	}

	/// Returns the entry at a position of the enumeration order.
	pub fn get_at(&self, index: usize) -> Option<MapEntry> {
		let table = self.table.read();
		table.get_index(index).map(|(k, v)| MapEntry {
			key: k.clone(),
			value: v.clone(),
		})
	}

	/// Returns the entries at several positions; out-of-range positions yield `None`.
	pub fn get_at_many(&self, indexes: impl IntoIterator<Item = usize>) -> Vec<Option<MapEntry>> {
		indexes.into_iter().map(|i| self.get_at(i)).collect()
	}

	/// Returns the keys in enumeration order.
	pub fn keys(&self) -> Vec<Key> {
		self.table.read().keys().cloned().collect()
	}

	/// Inserts or overwrites; an overwritten key keeps its position.
	pub fn set(&self, key: impl IntoKey, value: impl Into<Value>) -> Result<&Self> {
		self.table.write("set")?.insert(key.into_key(), value.into());
		Ok(self)
	}

	/// Merges every entry of `source`, as repeated [`Map::set`].
	pub fn set_all<'a>(&self, source: impl Into<Source<'a>>) -> Result<&Self> {
		let entries = source.into().entries("setAll(object)")?;
		self.table.write("setAll")?.extend(entries);
		Ok(self)
	}

	/// Removes `key`; absent keys are ignored.
	pub fn remove(&self, key: impl IntoKey) -> Result<&Self> {
		self.table.write("remove")?.remove(key.into_key().as_str());
		Ok(self)
	}

	/// Removes several keys; absent keys are ignored.
	pub fn remove_many<K: IntoKey>(&self, keys: impl IntoIterator<Item = K>) -> Result<&Self> {
		let mut table = self.table.write("remove")?;
		for key in keys {
			table.remove(key.into_key().as_str());
		}
		Ok(self)
	}

	/// Removes the entry at a position; out-of-range positions are ignored.
	pub fn remove_at(&self, index: usize) -> Result<&Self> {
		self.remove_at_many([index])
	}

	/// Removes the entries at positions of the order before the call.
	pub fn remove_at_many(&self, indexes: impl IntoIterator<Item = usize>) -> Result<&Self> {
		self.table.write("removeAt")?.remove_positions(indexes);
		Ok(self)
	}

	/// Removes positions `start..end`; `end` is clamped to the size.
	pub fn remove_range(&self, start: usize, end: usize) -> Result<&Self> {
		self.table.write("removeRange")?.remove_range(start, end);
		Ok(self)
	}

	/// Removes the entry that enumerates last; no-op when empty.
	pub fn remove_last(&self) -> Result<&Self> {
		self.table.write("removeLast")?.pop_last();
		Ok(self)
	}

	/// Removes every entry.
	pub fn clear(&self) -> Result<&Self> {
		self.table.write("clear")?.clear();
		Ok(self)
	}

	/// Calls `f` for each entry in order.
	///
	/// The callback may read this map and traverse it again, but any
	/// mutation of it fails with `ConcurrentModification` until `each`
	/// returns. A callback error stops the traversal and is returned as is.
	pub fn each<E>(&self, mut f: impl FnMut(&Key, &Value) -> std::result::Result<(), E>) -> std::result::Result<(), E> {
		self.table
			.fold(false, (), |(), k, v| f(k, v).map(ControlFlow::Continue))
	}

	/// Returns the entries for which `predicate` holds, in order.
	pub fn filter<E>(
		&self,
		mut predicate: impl FnMut(&Key, &Value) -> std::result::Result<bool, E>,
	) -> std::result::Result<Vec<MapEntry>, E> {
		self.table.fold(false, Vec::new(), |mut kept, k, v| {
			if predicate(k, v)? {
				kept.push(MapEntry::new(k, v.clone()));
			}
			Ok(ControlFlow::Continue(kept))
		})
	}

	/// Returns the first entry for which `predicate` holds.
	pub fn find<E>(
		&self,
		mut predicate: impl FnMut(&Key, &Value) -> std::result::Result<bool, E>,
	) -> std::result::Result<Option<MapEntry>, E> {
		self.table.fold(false, None, |_, k, v| {
			Ok(if predicate(k, v)? {
				ControlFlow::Break(Some(MapEntry::new(k, v.clone())))
			} else {
				ControlFlow::Continue(None)
			})
		})
	}

	/// Left fold in enumeration order.
	pub fn reduce<T, E>(
		&self,
		seed: T,
		mut f: impl FnMut(T, &Key, &Value) -> std::result::Result<T, E>,
	) -> std::result::Result<T, E> {
		self.table
			.fold(false, seed, |acc, k, v| f(acc, k, v).map(ControlFlow::Continue))
	}

	/// Left fold in reverse enumeration order.
	pub fn reduce_right<T, E>(
		&self,
		seed: T,
		mut f: impl FnMut(T, &Key, &Value) -> std::result::Result<T, E>,
	) -> std::result::Result<T, E> {
		self.table
			.fold(true, seed, |acc, k, v| f(acc, k, v).map(ControlFlow::Continue))
	}

	/// Returns true if both maps hold the same entry set.
	pub fn equals(&self, other: &Map) -> bool {
		std::ptr::eq(self, other) || *self.table.read() == *other.table.read()
	}

	/// Returns true if this map holds exactly the entries of `record`.
	pub fn equals_record(&self, record: &Record) -> bool {
		*self.table.read() == *record
	}

	/// Copies the entries into a plain record.
	pub fn to_object(&self) -> Record {
		self.table.read().clone()
	}

	/// Copies the entries out, in order.
	pub fn to_array(&self) -> Vec<MapEntry> {
		self.table
			.read()
			.iter()
			.map(|(k, v)| MapEntry::new(k, v.clone()))
			.collect()
	}

	pub(crate) fn entries(&self) -> Vec<(Key, Value)> {
		self.table
			.read()
			.iter()
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect()
	}
}

impl Clone for Map {
	fn clone(&self) -> Self {
		Self {
			table: Guarded::new(self.to_object()),
		}
	}
}

impl PartialEq for Map {
	fn eq(&self, other: &Self) -> bool {
		self.equals(other)
	}
}

impl fmt::Debug for Map {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Map").field(&*self.table.read()).finish()
	}
}

/// Renders the host's `toString()`: the JSON object text.
impl fmt::Display for Map {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = serde_json::to_string(&*self.table.read()).map_err(|_| fmt::Error)?;
		f.write_str(&text)
	}
}

impl Serialize for Map {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		self.table.read().serialize(serializer)
	}
}

impl From<Record> for Map {
	fn from(record: Record) -> Self {
		Self {
			table: Guarded::new(record),
		}
	}
}

impl From<&Map> for Value {
	fn from(map: &Map) -> Self {
		Value::Object(map.to_object())
	}
}

impl<K: IntoKey, V: Into<Value>> FromIterator<(K, V)> for Map {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::from(iter.into_iter().map(|(k, v)| (k, v.into())).collect::<Record>())
	}
}
