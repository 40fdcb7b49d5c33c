//! Index-addressed sequence with an in-place editing traversal.
//!
//! [`Vector::each`] hands the callback a [`Cursor`] for every element. The
//! cursor records a fate for that element plus values to splice around it,
//! and the whole traversal is applied as one [`SpliceSet`] after the last
//! element has been visited.
//!
//! # Invariants
//!
//! - A traversal that returns an error leaves the vector unchanged.
//!   - Enforced in: [`Vector::each`], which only writes after the loop completes.
//!   - Tested by: `vector::tests::callback_error_discards_edits`.
//! - Values queued through a cursor are never visited by the traversal that queued them.
//!   - Enforced in: [`Vector::each`], which iterates a snapshot.
//!   - Tested by: `vector::tests::inserted_values_are_not_revisited`.
//! - Edits requested from a nested traversal of the same vector are rejected.
//!   - Enforced in: [`Vector::each`] via [`Traversal::is_outermost`](crate::guard::Traversal).
//!   - Tested by: `vector::tests::nested_each_cannot_edit`.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{ArgumentProblem, CollectionError, Result};
use crate::guard::Guarded;
use crate::source::Source;
use crate::value::{self, Value};

mod cursor;
mod splice;

#[cfg(test)]
mod tests;

pub use cursor::{Cursor, Disposition};
use splice::SpliceSet;

/// Growable sequence of values.
#[derive(Default)]
pub struct Vector {
	items: Guarded<Vec<Value>>,
}

impl Vector {
	/// Creates an empty vector.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a vector from an array, another vector or a set.
	pub fn from_source<'a>(source: impl Into<Source<'a>>) -> Result<Self> {
		let values = source.into().values("Vector(array)")?;
		Ok(Self::from(values))
	}

	/// Returns the number of elements.
	pub fn len(&self) -> usize {
		self.items.read().len()
	}

	/// Returns true if the vector holds no elements.
	pub fn is_empty(&self) -> bool {
		self.items.read().is_empty()
	}

	/// Returns true while a traversal of this container is running.
	pub fn is_iterating(&self) -> bool {
		self.items.is_traversing()
	}

	/// Returns the element at `index`.
	pub fn get(&self, index: usize) -> Option<Value> {
		self.items.read().get(index).cloned()
	}

	/// Returns the elements at several positions; out-of-range positions yield `None`.
	pub fn get_many(&self, indexes: impl IntoIterator<Item = usize>) -> Vec<Option<Value>> {
		let items = self.items.read();
		indexes.into_iter().map(|i| items.get(i).cloned()).collect()
	}

	/// Returns true if some element equals `value`.
	pub fn has(&self, value: &Value) -> bool {
		self.items.read().contains(value)
	}

	/// Tests several values at once, in argument order.
	pub fn has_many<'v>(&self, values: impl IntoIterator<Item = &'v Value>) -> Vec<bool> {
		let items = self.items.read();
		values.into_iter().map(|v| items.contains(v)).collect()
	}

	/// Returns the first position holding `value`.
	pub fn index_of(&self, value: &Value) -> Option<usize> {
		self.items.read().iter().position(|item| item == value)
	}

	/// Returns the first positions of several values; absent values yield `None`.
	pub fn index_of_many<'v>(&self, values: impl IntoIterator<Item = &'v Value>) -> Vec<Option<usize>> {
		let items = self.items.read();
		values
			.into_iter()
			.map(|v| items.iter().position(|item| item == v))
			.collect()
	}

	/// Appends a value.
	pub fn add(&self, value: impl Into<Value>) -> Result<&Self> {
		self.items.write("add")?.push(value.into());
		Ok(self)
	}

	/// Appends several values in order.
	pub fn add_many<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Result<&Self> {
		self.items.write("add")?.extend(values.into_iter().map(Into::into));
		Ok(self)
	}

	/// Appends every element of an array, a vector or a set.
	pub fn add_all<'a>(&self, source: impl Into<Source<'a>>) -> Result<&Self> {
		let values = source.into().values("addAll(collection)")?;
		self.items.write("addAll")?.extend(values);
		Ok(self)
	}

	/// Overwrites the element at `index`, or appends when `index` equals the length.
	pub fn set(&self, index: usize, value: impl Into<Value>) -> Result<&Self> {
		let mut items = self.items.write("set")?;
		match index.cmp(&items.len()) {
			std::cmp::Ordering::Less => items[index] = value.into(),
			std::cmp::Ordering::Equal => items.push(value.into()),
			std::cmp::Ordering::Greater => {
				return Err(CollectionError::argument(
					"set(index, value)",
					ArgumentProblem::IndexPastEnd,
				));
			}
		}
		Ok(self)
	}

	/// Removes the first occurrence of `value`, if any.
	pub fn remove(&self, value: &Value) -> Result<&Self> {
		self.remove_many([value])
	}

	/// Removes the first occurrence of each value, in argument order.
	pub fn remove_many<'v>(&self, values: impl IntoIterator<Item = &'v Value>) -> Result<&Self> {
		let mut items = self.items.write("remove")?;
		for value in values {
			if let Some(position) = items.iter().position(|item| item == value) {
				items.remove(position);
			}
		}
		Ok(self)
	}

	/// Removes the element at a position; out-of-range positions are ignored.
	pub fn remove_at(&self, index: usize) -> Result<&Self> {
		self.remove_at_many([index])
	}

	/// Removes the elements at positions of the sequence before the call;
	/// duplicates and out-of-range positions are ignored.
	pub fn remove_at_many(&self, indexes: impl IntoIterator<Item = usize>) -> Result<&Self> {
		let mut items = self.items.write("removeAt")?;
		let mut doomed = vec![false; items.len()];
		for index in indexes {
			if let Some(slot) = doomed.get_mut(index) {
				*slot = true;
			}
		}
		let mut doomed = doomed.into_iter();
		items.retain(|_| !doomed.next().unwrap_or(false));
		Ok(self)
	}

	/// Removes positions `start..end`; `end` is clamped to the length.
	pub fn remove_range(&self, start: usize, end: usize) -> Result<&Self> {
		let mut items = self.items.write("removeRange")?;
		let end = end.min(items.len());
		if start < end {
			items.drain(start..end);
		}
		Ok(self)
	}

	/// Removes the last element; no-op when empty.
	pub fn remove_last(&self) -> Result<&Self> {
		self.items.write("removeLast")?.pop();
		Ok(self)
	}

	/// Removes every element.
	pub fn clear(&self) -> Result<&Self> {
		self.items.write("clear")?.clear();
		Ok(self)
	}

	/// Reverses the elements in place.
	pub fn reverse(&self) -> Result<&Self> {
		self.items.write("reverse")?.reverse();
		Ok(self)
	}

	/// Visits every element with an edit [`Cursor`], then applies all edits
	/// at once.
	///
	/// The callback sees the elements as they were when `each` started. Any
	/// mutator called on this vector from inside the callback fails with
	/// `ConcurrentModification`. If the callback fails, no edit is applied
	/// and the error is returned unchanged.
	pub fn each<E, F>(&self, mut f: F) -> std::result::Result<(), E>
	where
		E: From<CollectionError>,
		F: FnMut(&Value, &mut Cursor) -> std::result::Result<(), E>,
	{
		let traversal = self.items.enter();
		let snapshot = self.items.read().clone();
		let len = snapshot.len();
		let mut splice = SpliceSet::new();

		for (position, value) in snapshot.iter().enumerate() {
			let mut cursor = Cursor::new(position, len);
			if let Err(error) = f(value, &mut cursor) {
				tracing::trace!(position, len, "traversal aborted, discarding cursor edits");
				return Err(error);
			}
			let stopped = cursor.is_stopped();
			cursor.record_into(&mut splice);
			if stopped {
				break;
			}
		}

		if splice.is_identity() {
			return Ok(());
		}
		if !traversal.is_outermost() {
			tracing::debug!(method = "each", "cursor edits rejected inside an enclosing traversal");
			return Err(CollectionError::ConcurrentModification { method: "each" }.into());
		}

		let visited = splice.len();
		let len_after = splice.len_after() + (len - visited);
		let output = splice.apply(snapshot);
		tracing::trace!(visited, len_before = len, len_after, "materialized cursor edits");
		drop(traversal);
		*self.items.write("each")? = output;
		Ok(())
	}

	/// Returns a new vector holding `transform` of each element.
	pub fn map<E>(
		&self,
		mut transform: impl FnMut(&Value) -> std::result::Result<Value, E>,
	) -> std::result::Result<Vector, E> {
		let _traversal = self.items.enter();
		let items = self.items.read();
		let mapped = items.iter().map(&mut transform).collect::<std::result::Result<Vec<_>, E>>()?;
		Ok(Vector::from(mapped))
	}

	/// Returns the elements for which `predicate` holds, in order.
	pub fn filter<E>(
		&self,
		mut predicate: impl FnMut(&Value) -> std::result::Result<bool, E>,
	) -> std::result::Result<Vec<Value>, E> {
		let _traversal = self.items.enter();
		let items = self.items.read();
		let mut kept = Vec::new();
		for item in items.iter() {
			if predicate(item)? {
				kept.push(item.clone());
			}
		}
		Ok(kept)
	}

	/// Returns the first element for which `predicate` holds.
	pub fn find<E>(
		&self,
		mut predicate: impl FnMut(&Value) -> std::result::Result<bool, E>,
	) -> std::result::Result<Option<Value>, E> {
		let _traversal = self.items.enter();
		let items = self.items.read();
		for item in items.iter() {
			if predicate(item)? {
				return Ok(Some(item.clone()));
			}
		}
		Ok(None)
	}

	/// Left fold from the first element.
	pub fn reduce<T, E>(
		&self,
		seed: T,
		mut f: impl FnMut(T, &Value) -> std::result::Result<T, E>,
	) -> std::result::Result<T, E> {
		let _traversal = self.items.enter();
		let items = self.items.read();
		items.iter().try_fold(seed, |acc, item| f(acc, item))
	}

	/// Left fold from the last element.
	pub fn reduce_right<T, E>(
		&self,
		seed: T,
		mut f: impl FnMut(T, &Value) -> std::result::Result<T, E>,
	) -> std::result::Result<T, E> {
		let _traversal = self.items.enter();
		let items = self.items.read();
		items.iter().rev().try_fold(seed, |acc, item| f(acc, item))
	}

	/// Returns true if both vectors hold equal elements in the same order.
	pub fn equals(&self, other: &Vector) -> bool {
		std::ptr::eq(self, other) || *self.items.read() == *other.items.read()
	}

	/// Returns true if the elements equal `values`, in order.
	pub fn equals_values(&self, values: &[Value]) -> bool {
		self.items.read().as_slice() == values
	}

	/// Copies the elements out.
	pub fn to_array(&self) -> Vec<Value> {
		self.items.read().clone()
	}
}

impl Clone for Vector {
	fn clone(&self) -> Self {
		Self::from(self.to_array())
	}
}

impl PartialEq for Vector {
	fn eq(&self, other: &Self) -> bool {
		self.equals(other)
	}
}

impl fmt::Debug for Vector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.items.read().iter()).finish()
	}
}

/// Renders the host's `toString()`: the JSON array of elements.
impl fmt::Display for Vector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
		f.write_str(&text)
	}
}

impl Serialize for Vector {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		value::serialize_values(&self.items.read(), serializer)
	}
}

impl From<Vec<Value>> for Vector {
	fn from(items: Vec<Value>) -> Self {
		Self {
			items: Guarded::new(items),
		}
	}
}

impl From<&Vector> for Value {
	fn from(vector: &Vector) -> Self {
		Value::Array(vector.to_array())
	}
}

impl<V: Into<Value>> FromIterator<V> for Vector {
	fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
		Self::from(iter.into_iter().map(Into::into).collect::<Vec<_>>())
	}
}
