//! Key classification and the canonical key order.
//!
//! Every key is reduced to its canonical string form before it is stored, so
//! the number `9` and the string `"9"` name the same entry. A key whose form is
//! an array index (`0`, or a digit run without a leading zero that does not
//! exceed [`MAX_INDEX`]) is *index-like*; anything else, negative numbers
//! included, is *ordinary*.
//!
//! # Invariants
//!
//! - Index-like keys precede ordinary keys, and sort by numeric value.
//!   - Enforced in: [`KeyClass`]'s derived `Ord`, [`crate::OrderedTable::insert`].
//!   - Tested by: `key::tests::class_order_puts_indexes_first`, `table::tests::prop_ordering_invariant`.
//! - Two keys are equal iff their canonical strings are equal.
//!   - Enforced in: the `PartialEq`/`Hash` impls of [`Key`].
//!   - Tested by: `key::tests::number_and_string_keys_collide`.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::value::Value;


/// Largest numeric value an index-like key may carry (`2^32 - 2`).
///
/// Matches the array-index range of the host's object-key enumeration; the
/// string `"4294967295"` is already an ordinary key.
pub const MAX_INDEX: u32 = u32::MAX - 1;

/// Classification of a key under the canonical order.
///
/// The derived `Ord` is the key order itself, except that ordinary keys all
/// compare equal: their relative order is their insertion order, which only
/// the owning table knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyClass {
	/// Canonical form is an array index.
	Index(u32),
	/// Any other key.
	Ordinary,
}

/// Classifies a canonical key string.
pub fn classify(text: &str) -> KeyClass {
	let bytes = text.as_bytes();
	match bytes {
		[b'0'] => KeyClass::Index(0),
		[b'1'..=b'9', rest @ ..] if rest.iter().all(u8::is_ascii_digit) => match text.parse::<u32>() {
			Ok(n) if n <= MAX_INDEX => KeyClass::Index(n),
			_ => KeyClass::Ordinary,
		},
		_ => KeyClass::Ordinary,
	}
}

/// An immutable map key: a canonical string plus its cached classification.
#[derive(Clone)]
pub struct Key {
	text: Box<str>,
	class: KeyClass,
}

impl Key {
	/// Creates a key from a canonical string.
	pub fn new(text: impl Into<String>) -> Self {
		let text: Box<str> = text.into().into_boxed_str();
		let class = classify(&text);
		Self { text, class }
	}

	/// Creates the key for a value, via the value's canonical string form.
	pub fn from_value(value: &Value) -> Self {
		match value {
			Value::String(s) => Self::new(s.as_str()),
			other => Self::new(other.to_string()),
		}
	}

	/// Returns the canonical string form.
	pub fn as_str(&self) -> &str {
		&self.text
	}

	/// Returns the classification.
	pub fn class(&self) -> KeyClass {
		self.class
	}

	/// Returns the numeric value of an index-like key.
	pub fn index(&self) -> Option<u32> {
		match self.class {
			KeyClass::Index(n) => Some(n),
			KeyClass::Ordinary => None,
		}
	}

	/// Returns true if this key is index-like.
	pub fn is_index(&self) -> bool {
		matches!(self.class, KeyClass::Index(_))
	}

	/// Returns the key as a string value.
	pub fn to_value(&self) -> Value {
		Value::String(self.text.to_string())
	}
}

impl PartialEq for Key {
	fn eq(&self, other: &Self) -> bool {
		self.text == other.text
	}
}

impl Eq for Key {}

impl Hash for Key {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.text.hash(state);
	}
}

impl Borrow<str> for Key {
	fn borrow(&self) -> &str {
		&self.text
	}
}

impl fmt::Debug for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Key({:?})", &*self.text)
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}

impl Serialize for Key {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.text)
	}
}

impl From<Key> for Value {
	fn from(key: Key) -> Self {
		Value::String(key.text.into_string())
	}
}

/// Conversion into a [`Key`] through the canonical string form.
///
/// Implemented for keys, strings, values and the numeric scalars, so callers
/// can write `map.set(9, "x")` and `map.get("9")` against the same entry.
pub trait IntoKey {
	/// Performs the conversion.
	fn into_key(self) -> Key;
}

impl IntoKey for Key {
	fn into_key(self) -> Key {
		self
	}
}

impl IntoKey for &Key {
	fn into_key(self) -> Key {
		self.clone()
	}
}

impl IntoKey for &str {
	fn into_key(self) -> Key {
		Key::new(self)
	}
}

impl IntoKey for String {
	fn into_key(self) -> Key {
		Key::new(self)
	}
}

impl IntoKey for &String {
	fn into_key(self) -> Key {
		Key::new(self.as_str())
	}
}

impl IntoKey for Value {
	fn into_key(self) -> Key {
		match self {
			Value::String(s) => Key::new(s),
			other => Key::from_value(&other),
		}
	}
}

impl IntoKey for &Value {
	fn into_key(self) -> Key {
		Key::from_value(self)
	}
}

macro_rules! scalar_into_key {
	($($ty:ty),* $(,)?) => {
		$(
			impl IntoKey for $ty {
				fn into_key(self) -> Key {
					Key::from_value(&Value::from(self))
				}
			}
		)*
	};
}

scalar_into_key!(bool, i32, i64, u32, u64, usize, f64);
