//! Membership collection over the ordered table.
//!
//! Members are stored under their canonical key, so `9` and `"9"` are the
//! same member; the first-added spelling is the one kept and returned.

use std::fmt;
use std::ops::ControlFlow;

use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::guard::Guarded;
use crate::key::{IntoKey, Key};
use crate::source::Source;
use crate::table::Record;
use crate::value::{self, Value};


/// Ordered set of values. Enumerates in the same key order as [`crate::Map`].
#[derive(Default)]
pub struct Set {
	members: Guarded<Record>,
}

impl Set {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a set from an array, a vector or another set.
	pub fn from_source<'a>(source: impl Into<Source<'a>>) -> Result<Self> {
		let values = source.into().values("Set(array)")?;
		Ok(Self::from_iter(values))
	}

	/// Returns the number of members.
	pub fn len(&self) -> usize {
		self.members.read().len()
	}

	/// Returns true if the set holds no members.
	pub fn is_empty(&self) -> bool {
		self.members.read().is_empty()
	}

	/// Returns true while a traversal of this container is running.
	pub fn is_iterating(&self) -> bool {
		self.members.is_traversing()
	}

	/// Adds a member; adding a present member changes nothing.
	pub fn add(&self, member: impl Into<Value>) -> Result<&Self> {
		let member = member.into();
		self.members.write("add")?.insert_if_absent(Key::from_value(&member), member);
		Ok(self)
	}

	/// Adds several members in order; present members are skipped.
	pub fn add_many<V: Into<Value>>(&self, members: impl IntoIterator<Item = V>) -> Result<&Self> {
		let mut table = self.members.write("add")?;
		for member in members {
			let member = member.into();
			table.insert_if_absent(Key::from_value(&member), member);
		}
		Ok(self)
	}

	/// Adds every element of an array, a vector or a set.
	pub fn add_all<'a>(&self, source: impl Into<Source<'a>>) -> Result<&Self> {
		let values = source.into().values("addAll(collection)")?;
		let mut table = self.members.write("addAll")?;
		for member in values {
			table.insert_if_absent(Key::from_value(&member), member);
		}
		Ok(self)
	}

	/// Returns the member at a position.
	pub fn get(&self, index: usize) -> Option<Value> {
		self.members.read().get_index(index).map(|(_, member)| member.clone())
	}

	/// Returns the members at several positions; out-of-range positions yield `None`.
	pub fn get_many(&self, indexes: impl IntoIterator<Item = usize>) -> Vec<Option<Value>> {
		let table = self.members.read();
		indexes
			.into_iter()
			.map(|i| table.get_index(i).map(|(_, member)| member.clone()))
			.collect()
	}

	/// Returns true if `member` is present.
	pub fn has(&self, member: impl IntoKey) -> bool {
		self.members.read().contains_key(member.into_key().as_str())
	}

	/// Tests several members at once, in argument order.
	pub fn has_many<K: IntoKey>(&self, members: impl IntoIterator<Item = K>) -> Vec<bool> {
		let table = self.members.read();
		members
			.into_iter()
			.map(|m| table.contains_key(m.into_key().as_str()))
			.collect()
	}

	/// Returns the position of a member.
	pub fn index_of(&self, member: impl IntoKey) -> Option<usize> {
		self.members.read().position(member.into_key().as_str())
	}

	/// Returns the positions of several members; absent members yield `None`.
	pub fn index_of_many<K: IntoKey>(&self, members: impl IntoIterator<Item = K>) -> Vec<Option<usize>> {
		let table = self.members.read();
		members
			.into_iter()
			.map(|m| table.position(m.into_key().as_str()))
			.collect()
	}

	/// Removes a member; absent members are ignored.
	pub fn remove(&self, member: impl IntoKey) -> Result<&Self> {
		self.members.write("remove")?.remove(member.into_key().as_str());
		Ok(self)
	}

	/// Removes several members; absent members are ignored.
	pub fn remove_many<K: IntoKey>(&self, members: impl IntoIterator<Item = K>) -> Result<&Self> {
		let mut table = self.members.write("remove")?;
		for member in members {
			table.remove(member.into_key().as_str());
		}
		Ok(self)
	}

	/// Removes the member at a position; out-of-range positions are ignored.
	pub fn remove_at(&self, index: usize) -> Result<&Self> {
		self.remove_at_many([index])
	}

	/// Removes the members at positions of the order before the call.
	pub fn remove_at_many(&self, indexes: impl IntoIterator<Item = usize>) -> Result<&Self> {
		self.members.write("removeAt")?.remove_positions(indexes);
		Ok(self)
	}

	/// Removes positions `start..end`; `end` is clamped to the size.
	pub fn remove_range(&self, start: usize, end: usize) -> Result<&Self> {
		self.members.write("removeRange")?.remove_range(start, end);
		Ok(self)
	}

	/// Removes the member that enumerates last; no-op when empty.
	pub fn remove_last(&self) -> Result<&Self> {
		self.members.write("removeLast")?.pop_last();
		Ok(self)
	}

	/// Removes every member.
	pub fn clear(&self) -> Result<&Self> {
		self.members.write("clear")?.clear();
		Ok(self)
	}

	/// Calls `f` for each member in order; mutators fail until it returns.
	pub fn each<E>(&self, mut f: impl FnMut(&Value) -> std::result::Result<(), E>) -> std::result::Result<(), E> {
		self.members
			.fold(false, (), |(), _, member| f(member).map(ControlFlow::Continue))
	}

	/// Returns the members for which `predicate` holds, in order.
	pub fn filter<E>(
		&self,
		mut predicate: impl FnMut(&Value) -> std::result::Result<bool, E>,
	) -> std::result::Result<Vec<Value>, E> {
		self.members.fold(false, Vec::new(), |mut kept, _, member| {
			if predicate(member)? {
				kept.push(member.clone());
			}
			Ok(ControlFlow::Continue(kept))
		})
	}

	/// Returns the first member for which `predicate` holds.
	pub fn find<E>(
		&self,
		mut predicate: impl FnMut(&Value) -> std::result::Result<bool, E>,
	) -> std::result::Result<Option<Value>, E> {
		self.members.fold(false, None, |_, _, member| {
			Ok(if predicate(member)? {
				ControlFlow::Break(Some(member.clone()))
			} else {
				ControlFlow::Continue(None)
			})
		})
	}

	/// Left fold in enumeration order.
	pub fn reduce<T, E>(
		&self,
		seed: T,
		mut f: impl FnMut(T, &Value) -> std::result::Result<T, E>,
	) -> std::result::Result<T, E> {
		self.members
			.fold(false, seed, |acc, _, member| f(acc, member).map(ControlFlow::Continue))
	}

	/// Left fold in reverse enumeration order.
	pub fn reduce_right<T, E>(
		&self,
		seed: T,
		mut f: impl FnMut(T, &Value) -> std::result::Result<T, E>,
	) -> std::result::Result<T, E> {
		self.members
			.fold(true, seed, |acc, _, member| f(acc, member).map(ControlFlow::Continue))
	}

	/// Returns true if both sets hold the same members, in any order.
	pub fn equals(&self, other: &Set) -> bool {
		std::ptr::eq(self, other) || self.members.read().same_keys(&*other.members.read())
	}

	/// Returns true if this set holds exactly the distinct members of `values`.
	pub fn equals_values(&self, values: &[Value]) -> bool {
		let table = self.members.read();
		let other: Record = values.iter().map(|v| (v, Value::Bool(true))).collect();
		table.same_keys(&other)
	}

	/// Copies the members out, in order.
	pub fn to_array(&self) -> Vec<Value> {
		self.members.read().values().cloned().collect()
	}

	/// Returns a record mapping every member's key to `true`.
	pub fn to_object(&self) -> Record {
		self.members
			.read()
			.keys()
			.map(|k| (k, Value::Bool(true)))
			.collect()
	}
}

impl Clone for Set {
	fn clone(&self) -> Self {
		Self {
			members: Guarded::new(self.members.read().clone()),
		}
	}
}

impl PartialEq for Set {
	fn eq(&self, other: &Self) -> bool {
		self.equals(other)
	}
}

impl fmt::Debug for Set {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.members.read().values()).finish()
	}
}

/// Renders the host's `toString()`: the JSON array of members.
impl fmt::Display for Set {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
		f.write_str(&text)
	}
}

impl Serialize for Set {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		value::serialize_values(&self.to_array(), serializer)
	}
}

impl From<&Set> for Value {
	fn from(set: &Set) -> Self {
		Value::Array(set.to_array())
	}
}

impl<V: Into<Value>> FromIterator<V> for Set {
	fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
		let mut members = Record::new();
		for member in iter {
			let member = member.into();
			members.insert_if_absent(Key::from_value(&member), member);
		}
		Self {
			members: Guarded::new(members),
		}
	}
}
