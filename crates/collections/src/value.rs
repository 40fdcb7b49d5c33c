//! The opaque payload type stored by every container.
//!
//! [`Value`] mirrors the host's dynamic values closely enough to reproduce
//! its key coercion and its JSON rendering: `Undefined` is the absence
//! marker, distinct from `Null`, and numbers are always `f64`.

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::table::Record;


/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A dynamic value.
#[derive(Debug, Clone, Default)]
pub enum Value {
	/// The absence marker, returned for missing keys and positions.
	#[default]
	Undefined,
	Null,
	Bool(bool),
	Number(f64),
	String(String),
	Array(Vec<Value>),
	Object(Record),
}

impl Value {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Self::Undefined)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Returns true for `Undefined` and `Null`.
	pub fn is_nullish(&self) -> bool {
		matches!(self, Self::Undefined | Self::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&Record> {
		match self {
			Self::Object(record) => Some(record),
			_ => None,
		}
	}

	/// Returns the value as a position, if it is a non-negative integral
	/// number that fits in `u32`.
	pub fn as_index(&self) -> Option<u32> {
		match self {
			Self::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX) => Some(*n as u32),
			_ => None,
		}
	}

	/// Renders the value as JSON, following the host's `JSON.stringify`.
	pub fn to_json(&self) -> String {
		serde_json::to_string(self).unwrap_or_else(|_| String::from("null"))
	}
}

/// Structural equality. `NaN` equals `NaN`, so a container holding it still
/// equals its own copy and can find the element again.
impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
			(Self::String(a), Self::String(b)) => a == b,
			(Self::Array(a), Self::Array(b)) => a == b,
			(Self::Object(a), Self::Object(b)) => a == b,
			_ => false,
		}
	}
}

/// Formats a number the way the host's `Number.prototype.toString` does.
pub fn format_number(n: f64) -> String {
	if n.is_nan() {
		return String::from("NaN");
	}
	if n.is_infinite() {
		return String::from(if n > 0.0 { "Infinity" } else { "-Infinity" });
	}
	if n == 0.0 {
		return String::from("0");
	}
	let magnitude = n.abs();
	if (1e-6..1e21).contains(&magnitude) {
		return n.to_string();
	}
	let text = format!("{n:e}");
	match text.split_once('e') {
		Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
		_ => text,
	}
}

/// Canonical string form, the coercion used for map keys.
impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Undefined => f.write_str("undefined"),
			Self::Null => f.write_str("null"),
			Self::Bool(b) => write!(f, "{b}"),
			Self::Number(n) => f.write_str(&format_number(*n)),
			Self::String(s) => f.write_str(s),
			Self::Array(items) => {
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(",")?;
					}
					if !item.is_nullish() {
						write!(f, "{item}")?;
					}
				}
				Ok(())
			}
			Self::Object(_) => f.write_str("[object Object]"),
		}
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Undefined | Self::Null => serializer.serialize_unit(),
			Self::Bool(b) => serializer.serialize_bool(*b),
			Self::Number(n) if !n.is_finite() => serializer.serialize_unit(),
			Self::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => serializer.serialize_i64(*n as i64),
			Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e21 => match format_number(*n).parse::<i128>() {
				Ok(digits) => serializer.serialize_i128(digits),
				Err(_) => serializer.serialize_f64(*n),
			},
			Self::Number(n) => serializer.serialize_f64(*n),
			Self::String(s) => serializer.serialize_str(s),
			Self::Array(items) => serialize_values(items, serializer),
			Self::Object(record) => record.serialize(serializer),
		}
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		serde_json::Value::deserialize(deserializer).map(Self::from)
	}
}

impl From<serde_json::Value> for Value {
	fn from(json: serde_json::Value) -> Self {
		match json {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(b) => Self::Bool(b),
			serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
			serde_json::Value::String(s) => Self::String(s),
			serde_json::Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
			serde_json::Value::Object(entries) => {
				Self::Object(entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
			}
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

macro_rules! number_from {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				fn from(n: $ty) -> Self {
					Self::Number(n as f64)
				}
			}
		)*
	};
}

number_from!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Self::String(s.to_owned())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::String(s)
	}
}

impl From<&String> for Value {
	fn from(s: &String) -> Self {
		Self::String(s.clone())
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Self::Array(items)
	}
}

impl From<Record> for Value {
	fn from(record: Record) -> Self {
		Self::Object(record)
	}
}

impl FromIterator<Value> for Value {
	fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
		Self::Array(iter.into_iter().collect())
	}
}

/// Serializes a slice of values as a JSON array.
pub(crate) fn serialize_values<S: Serializer>(values: &[Value], serializer: S) -> Result<S::Ok, S::Error> {
	let mut seq = serializer.serialize_seq(Some(values.len()))?;
	for value in values {
		seq.serialize_element(value)?;
	}
	seq.end()
}
