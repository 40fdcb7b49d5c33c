//! Inputs accepted by constructors and bulk operations.

use crate::error::{ArgumentProblem, CollectionError, Result};
use crate::key::{IntoKey, Key};
use crate::map::Map;
use crate::set::Set;
use crate::table::Record;
use crate::value::Value;
use crate::vector::Vector;

/// A borrowed collection to build from or merge in.
///
/// Which variants a container accepts depends on the container: tables take
/// keyed sources, sequences take positional ones. Everything is copied out
/// before the receiving container is touched, so a container may be merged
/// into itself.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
	Map(&'a Map),
	Set(&'a Set),
	Vector(&'a Vector),
	Object(&'a Record),
	Array(&'a [Value]),
	Pairs(&'a [(Value, Value)]),
}

impl Source<'_> {
	/// Copies out the entries of a keyed source.
	///
	/// Set members become keys mapped to `true`; an array must hold
	/// `[key, value]` pairs.
	pub(crate) fn entries(self, signature: &'static str) -> Result<Vec<(Key, Value)>> {
		match self {
			Self::Map(map) => Ok(map.entries()),
			Self::Object(record) => Ok(record.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
			Self::Set(set) => Ok(set.to_array().into_iter().map(|m| (m.into_key(), Value::Bool(true))).collect()),
			Self::Pairs(pairs) => Ok(pairs.iter().map(|(k, v)| (k.into_key(), v.clone())).collect()),
			Self::Array(items) => items
				.iter()
				.map(|item| match item.as_array() {
					Some([key, value]) => Ok((key.into_key(), value.clone())),
					_ => Err(CollectionError::argument(signature, ArgumentProblem::NotAPair)),
				})
				.collect(),
			Self::Vector(_) => Err(CollectionError::argument(
				signature,
				ArgumentProblem::UnsupportedSource {
					expected: "a map, a set, an object, or [key, value] pairs",
				},
			)),
		}
	}

	/// Copies out the elements of a positional source.
	pub(crate) fn values(self, signature: &'static str) -> Result<Vec<Value>> {
		match self {
			Self::Array(items) => Ok(items.to_vec()),
			Self::Vector(vector) => Ok(vector.to_array()),
			Self::Set(set) => Ok(set.to_array()),
			Self::Map(_) | Self::Object(_) | Self::Pairs(_) => Err(CollectionError::argument(
				signature,
				ArgumentProblem::UnsupportedSource {
					expected: "an array, a vector, or a set",
				},
			)),
		}
	}
}

impl<'a> From<&'a Map> for Source<'a> {
	fn from(map: &'a Map) -> Self {
		Self::Map(map)
	}
}

impl<'a> From<&'a Set> for Source<'a> {
	fn from(set: &'a Set) -> Self {
		Self::Set(set)
	}
}

impl<'a> From<&'a Vector> for Source<'a> {
	fn from(vector: &'a Vector) -> Self {
		Self::Vector(vector)
	}
}

impl<'a> From<&'a Record> for Source<'a> {
	fn from(record: &'a Record) -> Self {
		Self::Object(record)
	}
}

impl<'a> From<&'a [Value]> for Source<'a> {
	fn from(items: &'a [Value]) -> Self {
		Self::Array(items)
	}
}

impl<'a> From<&'a Vec<Value>> for Source<'a> {
	fn from(items: &'a Vec<Value>) -> Self {
		Self::Array(items)
	}
}

impl<'a, const N: usize> From<&'a [Value; N]> for Source<'a> {
	fn from(items: &'a [Value; N]) -> Self {
		Self::Array(items)
	}
}

impl<'a> From<&'a [(Value, Value)]> for Source<'a> {
	fn from(pairs: &'a [(Value, Value)]) -> Self {
		Self::Pairs(pairs)
	}
}

impl<'a> From<&'a Vec<(Value, Value)>> for Source<'a> {
	fn from(pairs: &'a Vec<(Value, Value)>) -> Self {
		Self::Pairs(pairs)
	}
}
