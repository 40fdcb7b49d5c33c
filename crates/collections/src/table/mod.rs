//! Keyed storage that enumerates in the canonical key order.
//!
//! [`OrderedTable`] pairs a hash index with an order list. The order list is
//! split in two runs: index-like keys, kept sorted numerically at the front,
//! followed by ordinary keys in first-insertion order. Overwriting a value
//! never moves its key; removing a key and inserting it again appends it to
//! the end of its run.
//!
//! # Invariants
//!
//! - `order[..indexed]` holds exactly the index-like keys, strictly ascending.
//!   - Enforced in: [`OrderedTable::insert`], [`OrderedTable::remove`], [`OrderedTable::remove_positions`].
//!   - Tested by: `table::tests::prop_ordering_invariant`.
//! - `order` and the hash index hold the same key set.
//!   - Enforced in: every mutator below.
//!   - Tested by: `table::tests::prop_ordering_invariant`.
//!   - Failure symptom: panics from `Iter` indexing a missing key.

use std::fmt;
use std::ops::ControlFlow;

use rustc_hash::FxHashMap as HashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::guard::Guarded;
use crate::key::{IntoKey, Key, KeyClass};
use crate::value::Value;


/// A plain string-keyed mapping of values, enumerated in key order.
pub type Record = OrderedTable<Value>;

/// Hash map that enumerates its keys in the canonical key order.
#[derive(Clone)]
pub struct OrderedTable<V> {
	entries: HashMap<Key, V>,
	order: Vec<Key>,
	/// Count of index-like keys, which occupy `order[..indexed]`.
	indexed: usize,
}

impl<V> Default for OrderedTable<V> {
	fn default() -> Self {
		Self {
			entries: HashMap::default(),
			order: Vec::new(),
			indexed: 0,
		}
	}
}

impl<V> OrderedTable<V> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	pub fn get(&self, key: &str) -> Option<&V> {
		self.entries.get(key)
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
		self.entries.get_mut(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Inserts or overwrites an entry, returning the previous value.
	///
	/// An overwritten key keeps its position.
	pub fn insert(&mut self, key: Key, value: V) -> Option<V> {
		if let Some(slot) = self.entries.get_mut(key.as_str()) {
			return Some(std::mem::replace(slot, value));
		}
		self.place(key.clone());
		self.entries.insert(key, value);
		None
	}

	/// Inserts an entry only if the key is absent. Returns whether it was inserted.
	pub fn insert_if_absent(&mut self, key: Key, value: V) -> bool {
		if self.entries.contains_key(key.as_str()) {
			return false;
		}
		self.place(key.clone());
		self.entries.insert(key, value);
		true
	}

	fn place(&mut self, key: Key) {
		match key.class() {
			KeyClass::Index(n) => {
				let at = self.order[..self.indexed].partition_point(|k| k.index().is_some_and(|m| m < n));
				self.order.insert(at, key);
				self.indexed += 1;
			}
			KeyClass::Ordinary => self.order.push(key),
		}
	}

	/// Removes an entry, returning its value.
	pub fn remove(&mut self, key: &str) -> Option<V> {
		let position = self.position(key)?;
		let key = self.order.remove(position);
		if key.is_index() {
			self.indexed -= 1;
		}
		self.entries.remove(key.as_str())
	}

	/// Returns the position of a key in the enumeration order.
	pub fn position(&self, key: &str) -> Option<usize> {
		if !self.entries.contains_key(key) {
			return None;
		}
		match crate::key::classify(key) {
			KeyClass::Index(n) => self.order[..self.indexed]
				.binary_search_by(|k| k.index().unwrap_or(u32::MAX).cmp(&n))
				.ok(),
			KeyClass::Ordinary => self.order[self.indexed..]
				.iter()
				.position(|k| k.as_str() == key)
				.map(|p| p + self.indexed),
		}
	}

	/// Returns the entry at a position of the enumeration order.
	pub fn get_index(&self, position: usize) -> Option<(&Key, &V)> {
		let key = self.order.get(position)?;
		self.entries.get_key_value(key.as_str())
	}

	/// Removes the entries at the given positions of the current order.
	///
	/// Positions refer to the order before the call; duplicates and
	/// out-of-range positions are ignored. Returns the number removed.
	pub fn remove_positions(&mut self, positions: impl IntoIterator<Item = usize>) -> usize {
		let len = self.order.len();
		let mut doomed = vec![false; len];
		let mut count = 0;
		for position in positions {
			if position < len && !doomed[position] {
				doomed[position] = true;
				count += 1;
			}
		}
		if count == 0 {
			return 0;
		}

		let order = std::mem::replace(&mut self.order, Vec::with_capacity(len - count));
		for (key, doomed) in order.into_iter().zip(doomed) {
			if !doomed {
				self.order.push(key);
				continue;
			}
			if key.is_index() {
				self.indexed -= 1;
			}
			self.entries.remove(key.as_str());
		}
		count
	}

	/// Removes positions `start..end`, clamping `end` to the length.
	///
	/// Returns the number removed; `start >= len` or `end <= start` removes nothing.
	pub fn remove_range(&mut self, start: usize, end: usize) -> usize {
		let end = end.min(self.order.len());
		if start >= end {
			return 0;
		}
		for key in self.order.drain(start..end) {
			if key.is_index() {
				self.indexed -= 1;
			}
			self.entries.remove(key.as_str());
		}
		end - start
	}

	/// Removes the entry that enumerates last.
	pub fn pop_last(&mut self) -> Option<(Key, V)> {
		let key = self.order.pop()?;
		if key.is_index() {
			self.indexed -= 1;
		}
		let value = self.entries.remove(key.as_str())?;
		Some((key, value))
	}

	pub fn clear(&mut self) {
		self.entries.clear();
		self.order.clear();
		self.indexed = 0;
	}

	/// Iterates entries in key order.
	pub fn iter(&self) -> Iter<'_, V> {
		Iter {
			order: self.order.iter(),
			entries: &self.entries,
		}
	}

	/// Iterates keys in key order.
	pub fn keys(&self) -> std::slice::Iter<'_, Key> {
		self.order.iter()
	}

	/// Iterates values in key order.
	pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
		self.iter().map(|(_, v)| v)
	}

	/// Returns true if both tables hold the same key set, ignoring values.
	pub fn same_keys<W>(&self, other: &OrderedTable<W>) -> bool {
		self.len() == other.len() && self.order.iter().all(|k| other.contains_key(k.as_str()))
	}
}

/// Borrowing iterator over the entries of an [`OrderedTable`].
pub struct Iter<'a, V> {
	order: std::slice::Iter<'a, Key>,
	entries: &'a HashMap<Key, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
	type Item = (&'a Key, &'a V);

	fn next(&mut self) -> Option<Self::Item> {
		let key = self.order.next()?;
		Some((key, &self.entries[key]))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.order.size_hint()
	}
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
	fn next_back(&mut self) -> Option<Self::Item> {
		let key = self.order.next_back()?;
		Some((key, &self.entries[key]))
	}
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a OrderedTable<V> {
	type Item = (&'a Key, &'a V);
	type IntoIter = Iter<'a, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<K: IntoKey, V> FromIterator<(K, V)> for OrderedTable<V> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut table = Self::new();
		table.extend(iter);
		table
	}
}

impl<K: IntoKey, V> Extend<(K, V)> for OrderedTable<V> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (key, value) in iter {
			self.insert(key.into_key(), value);
		}
	}
}

/// Equality of entry sets; enumeration order is not compared.
impl<V: PartialEq> PartialEq for OrderedTable<V> {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().all(|(k, v)| other.get(k.as_str()) == Some(v))
	}
}

impl<V: fmt::Debug> fmt::Debug for OrderedTable<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

/// Serializes as a JSON object in key order, omitting `undefined` values.
impl Serialize for OrderedTable<Value> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let defined = self.values().filter(|v| !v.is_undefined()).count();
		let mut map = serializer.serialize_map(Some(defined))?;
		for (key, value) in self.iter().filter(|(_, v)| !v.is_undefined()) {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

impl Guarded<Record> {
	/// Folds over the entries under a traversal token.
	///
	/// The callback may read the table and may start nested traversals, but
	/// every mutator fails until the fold returns.
	pub(crate) fn fold<T, E>(
		&self,
		reverse: bool,
		init: T,
		mut f: impl FnMut(T, &Key, &Value) -> Result<ControlFlow<T, T>, E>,
	) -> Result<T, E> {
		let _traversal = self.enter();
		let table = self.read();
		let entries: Box<dyn Iterator<Item = (&Key, &Value)>> = if reverse {
			Box::new(table.iter().rev())
		} else {
			Box::new(table.iter())
		};
		let mut acc = init;
		for (key, value) in entries {
			match f(acc, key, value)? {
				ControlFlow::Continue(next) => acc = next,
				ControlFlow::Break(done) => return Ok(done),
			}
		}
		Ok(acc)
	}
}

/// Builds a [`Record`] from `key => value` pairs.
///
/// Keys go through [`IntoKey`](crate::IntoKey) and values through
/// `Value::from`, so literals of mixed types can be written directly.
#[macro_export]
macro_rules! record {
	() => {
		$crate::Record::new()
	};
	($($key:expr => $value:expr),+ $(,)?) => {{
		let mut record = $crate::Record::new();
		$(
			record.insert($crate::IntoKey::into_key($key), $crate::Value::from($value));
		)+
		record
	}};
}
