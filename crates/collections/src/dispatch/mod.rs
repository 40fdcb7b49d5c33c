//! Dynamic, name-based entry point over the typed container API.
//!
//! Callers that only have a method name and a list of [`Value`] arguments
//! go through [`Dispatch::call`]. This is the one place where argument
//! counts and types are checked at runtime, and where single-key and
//! multi-key calls share one method name: `get("a")` answers with
//! [`Reply::Value`], `get("a", "b")` with [`Reply::Batch`].
//!
//! Callback-taking methods are not reachable from here; a closure cannot be
//! expressed as a [`Value`].

use std::str::FromStr;

use strum_macros::{EnumString, IntoStaticStr};

use crate::error::{ArgumentProblem, CollectionError, Result};
use crate::key::MAX_INDEX;
use crate::map::Map;
use crate::set::Set;
use crate::source::Source;
use crate::value::Value;
use crate::vector::Vector;

#[cfg(test)]
mod tests;

/// Method names understood by the dispatcher, in their host spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum Method {
	Add,
	AddAll,
	Clear,
	Equals,
	Get,
	GetAt,
	Has,
	Index,
	IsEmpty,
	Keys,
	Remove,
	RemoveAt,
	RemoveLast,
	RemoveRange,
	Reverse,
	Set,
	SetAll,
	Size,
	ToArray,
	ToObject,
	ToString,
}

impl Method {
	pub fn name(self) -> &'static str {
		self.into()
	}
}

/// Result of a dispatched call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
	/// The call mutated the receiver; the host returns the receiver itself.
	Chain,
	/// Answer to a single-argument lookup or an accessor.
	Value(Value),
	/// One answer per argument of a multi-argument lookup.
	Batch(Vec<Value>),
}

impl Reply {
	/// Flattens the reply into one value; `Chain` becomes `Undefined`.
	pub fn into_value(self) -> Value {
		match self {
			Self::Chain => Value::Undefined,
			Self::Value(value) => value,
			Self::Batch(values) => Value::Array(values),
		}
	}
}

/// Name-based invocation of a container method.
pub trait Dispatch {
	/// Invokes `method` with `args`, validating both first.
	fn call(&self, method: &str, args: &[Value]) -> Result<Reply>;
}

fn parse(method: &str) -> Result<Method> {
	Method::from_str(method).map_err(|_| CollectionError::UnknownMethod(method.to_owned()))
}

fn unknown(method: Method) -> CollectionError {
	CollectionError::UnknownMethod(method.name().to_owned())
}

/// Arguments of one call, with the signature used in error messages.
#[derive(Clone, Copy)]
struct Args<'a> {
	signature: &'static str,
	values: &'a [Value],
}

impl<'a> Args<'a> {
	fn new(signature: &'static str, values: &'a [Value]) -> Self {
		Self { signature, values }
	}

	fn error(self, problem: ArgumentProblem) -> CollectionError {
		CollectionError::argument(self.signature, problem)
	}

	fn none(self) -> Result<()> {
		match self.values {
			[] => Ok(()),
			_ => Err(self.error(ArgumentProblem::NoArguments)),
		}
	}

	fn at_least_one(self) -> Result<&'a [Value]> {
		match self.values {
			[] => Err(self.error(ArgumentProblem::AtLeastOne)),
			values => Ok(values),
		}
	}

	fn one(self) -> Result<&'a Value> {
		match self.values {
			[value] => Ok(value),
			_ => Err(self.error(ArgumentProblem::ExactlyOne)),
		}
	}

	fn two(self, problem: ArgumentProblem) -> Result<(&'a Value, &'a Value)> {
		match self.values {
			[first, second] => Ok((first, second)),
			_ => Err(self.error(problem)),
		}
	}

	/// A position argument: a non-negative integral number within the
	/// array-index range.
	fn index(self, value: &Value, problem: ArgumentProblem) -> Result<usize> {
		value
			.as_index()
			.filter(|n| *n <= MAX_INDEX)
			.map(|n| n as usize)
			.ok_or_else(|| self.error(problem))
	}

	/// Like [`Args::index`], but `undefined` and `null` mean "no position".
	fn optional_index(self, value: &Value) -> Result<Option<usize>> {
		if value.is_nullish() {
			return Ok(None);
		}
		self.index(value, ArgumentProblem::NotAnIndex).map(Some)
	}

	fn indexes(self) -> Result<Vec<usize>> {
		let mut indexes = Vec::with_capacity(self.values.len());
		for value in self.at_least_one()? {
			indexes.extend(self.optional_index(value)?);
		}
		Ok(indexes)
	}

	fn range(self) -> Result<(usize, usize)> {
		let (start, end) = self.two(ArgumentProblem::ExactlyTwo)?;
		Ok((
			self.index(start, ArgumentProblem::NotAnIndex)?,
			self.index(end, ArgumentProblem::NotAnIndex)?,
		))
	}

	fn keyed_source(self) -> Result<Source<'a>> {
		match self.one()? {
			Value::Object(record) => Ok(Source::Object(record)),
			Value::Array(items) => Ok(Source::Array(items)),
			_ => Err(self.error(ArgumentProblem::UnsupportedSource {
				expected: "an object or an array of [key, value] pairs",
			})),
		}
	}

	fn positional_source(self) -> Result<Source<'a>> {
		match self.one()? {
			Value::Array(items) => Ok(Source::Array(items)),
			_ => Err(self.error(ArgumentProblem::UnsupportedSource {
				expected: "an array, a vector, or a set",
			})),
		}
	}

	/// Answers one lookup per argument; a single argument gets a single answer.
	fn lookup(self, mut answer: impl FnMut(&Value) -> Result<Value>) -> Result<Reply> {
		let mut answers = self
			.at_least_one()?
			.iter()
			.map(&mut answer)
			.collect::<Result<Vec<_>>>()?;
		Ok(match answers.len() {
			1 => Reply::Value(answers.swap_remove(0)),
			_ => Reply::Batch(answers),
		})
	}
}

fn position(index: Option<usize>) -> Value {
	index.map_or(Value::Undefined, Value::from)
}

impl Dispatch for Map {
	fn call(&self, method: &str, args: &[Value]) -> Result<Reply> {
		let method = parse(method)?;
		match method {
			Method::Get => Args::new("get(key, ...)", args).lookup(|key| Ok(self.get(key).unwrap_or_default())),
			Method::Has => Args::new("has(key, ...)", args).lookup(|key| Ok(Value::Bool(self.has(key)))),
			Method::GetAt => {
				let args = Args::new("getAt(index, ...)", args);
				args.lookup(|index| {
					let entry = args.optional_index(index)?.and_then(|i| self.get_at(i));
					Ok(entry.map_or(Value::Undefined, Value::from))
				})
			}
			Method::Keys => {
				Args::new("keys()", args).none()?;
				Ok(Reply::Value(self.keys().into_iter().map(Value::from).collect()))
			}
			Method::Set => {
				let (key, value) = Args::new("set(key, value)", args).two(ArgumentProblem::KeyAndValue)?;
				self.set(key, value.clone())?;
				Ok(Reply::Chain)
			}
			Method::SetAll => {
				let source = Args::new("setAll(object)", args).keyed_source()?;
				self.set_all(source)?;
				Ok(Reply::Chain)
			}
			Method::Remove => {
				let keys = Args::new("remove(key, ...)", args).at_least_one()?;
				self.remove_many(keys)?;
				Ok(Reply::Chain)
			}
			Method::RemoveAt => {
				let indexes = Args::new("removeAt(index, ...)", args).indexes()?;
				self.remove_at_many(indexes)?;
				Ok(Reply::Chain)
			}
			Method::RemoveRange => {
				let (start, end) = Args::new("removeRange(start, end)", args).range()?;
				self.remove_range(start, end)?;
				Ok(Reply::Chain)
			}
			Method::RemoveLast => {
				Args::new("removeLast()", args).none()?;
				self.remove_last()?;
				Ok(Reply::Chain)
			}
			Method::Clear => {
				Args::new("clear()", args).none()?;
				self.clear()?;
				Ok(Reply::Chain)
			}
			Method::Equals => {
				let other = Args::new("equals(value)", args).one()?;
				let equal = other.as_object().is_some_and(|record| self.equals_record(record));
				Ok(Reply::Value(Value::Bool(equal)))
			}
			Method::IsEmpty => {
				Args::new("isEmpty()", args).none()?;
				Ok(Reply::Value(Value::Bool(self.is_empty())))
			}
			Method::Size => {
				Args::new("size()", args).none()?;
				Ok(Reply::Value(Value::from(self.len())))
			}
			Method::ToArray => {
				Args::new("toArray()", args).none()?;
				Ok(Reply::Value(self.to_array().into_iter().map(Value::from).collect()))
			}
			Method::ToObject => {
				Args::new("toObject()", args).none()?;
				Ok(Reply::Value(Value::Object(self.to_object())))
			}
			Method::ToString => {
				Args::new("toString()", args).none()?;
				Ok(Reply::Value(Value::String(self.to_string())))
			}
			Method::Add | Method::AddAll | Method::Index | Method::Reverse => Err(unknown(method)),
		}
	}
}

impl Dispatch for Set {
	fn call(&self, method: &str, args: &[Value]) -> Result<Reply> {
		let method = parse(method)?;
		match method {
			Method::Add => {
				let members = Args::new("add(value, ...)", args).at_least_one()?;
				self.add_many(members.iter().cloned())?;
				Ok(Reply::Chain)
			}
			Method::AddAll => {
				let source = Args::new("addAll(collection)", args).positional_source()?;
				self.add_all(source)?;
				Ok(Reply::Chain)
			}
			Method::Get => {
				let args = Args::new("get(index, ...)", args);
				args.lookup(|index| Ok(args.optional_index(index)?.and_then(|i| self.get(i)).unwrap_or_default()))
			}
			Method::Has => Args::new("has(value, ...)", args).lookup(|member| Ok(Value::Bool(self.has(member)))),
			Method::Index => Args::new("index(value, ...)", args).lookup(|member| Ok(position(self.index_of(member)))),
			Method::Remove => {
				let members = Args::new("remove(value, ...)", args).at_least_one()?;
				self.remove_many(members)?;
				Ok(Reply::Chain)
			}
			Method::RemoveAt => {
				let indexes = Args::new("removeAt(index, ...)", args).indexes()?;
				self.remove_at_many(indexes)?;
				Ok(Reply::Chain)
			}
			Method::RemoveRange => {
				let (start, end) = Args::new("removeRange(start, end)", args).range()?;
				self.remove_range(start, end)?;
				Ok(Reply::Chain)
			}
			Method::RemoveLast => {
				Args::new("removeLast()", args).none()?;
				self.remove_last()?;
				Ok(Reply::Chain)
			}
			Method::Clear => {
				Args::new("clear()", args).none()?;
				self.clear()?;
				Ok(Reply::Chain)
			}
			Method::Equals => {
				let other = Args::new("equals(value)", args).one()?;
				let equal = other.as_array().is_some_and(|values| self.equals_values(values));
				Ok(Reply::Value(Value::Bool(equal)))
			}
			Method::IsEmpty => {
				Args::new("isEmpty()", args).none()?;
				Ok(Reply::Value(Value::Bool(self.is_empty())))
			}
			Method::Size => {
				Args::new("size()", args).none()?;
				Ok(Reply::Value(Value::from(self.len())))
			}
			Method::ToArray => {
				Args::new("toArray()", args).none()?;
				Ok(Reply::Value(Value::Array(self.to_array())))
			}
			Method::ToObject => {
				Args::new("toObject()", args).none()?;
				Ok(Reply::Value(Value::Object(self.to_object())))
			}
			Method::ToString => {
				Args::new("toString()", args).none()?;
				Ok(Reply::Value(Value::String(self.to_string())))
			}
			Method::GetAt | Method::Keys | Method::Reverse | Method::Set | Method::SetAll => Err(unknown(method)),
		}
	}
}

impl Dispatch for Vector {
	fn call(&self, method: &str, args: &[Value]) -> Result<Reply> {
		let method = parse(method)?;
		match method {
			Method::Add => {
				let values = Args::new("add(value, ...)", args).at_least_one()?;
				self.add_many(values.iter().cloned())?;
				Ok(Reply::Chain)
			}
			Method::AddAll => {
				let source = Args::new("addAll(collection)", args).positional_source()?;
				self.add_all(source)?;
				Ok(Reply::Chain)
			}
			Method::Get => {
				let args = Args::new("get(index, ...)", args);
				args.lookup(|index| Ok(args.optional_index(index)?.and_then(|i| self.get(i)).unwrap_or_default()))
			}
			Method::Has => Args::new("has(value, ...)", args).lookup(|value| Ok(Value::Bool(self.has(value)))),
			Method::Index => Args::new("index(value, ...)", args).lookup(|value| Ok(position(self.index_of(value)))),
			Method::Set => {
				let args = Args::new("set(index, value)", args);
				let (index, value) = args.two(ArgumentProblem::IndexAndValue)?;
				self.set(args.index(index, ArgumentProblem::IndexAndValue)?, value.clone())?;
				Ok(Reply::Chain)
			}
			Method::Remove => {
				let values = Args::new("remove(value, ...)", args).at_least_one()?;
				self.remove_many(values)?;
				Ok(Reply::Chain)
			}
			Method::RemoveAt => {
				let indexes = Args::new("removeAt(index, ...)", args).indexes()?;
				self.remove_at_many(indexes)?;
				Ok(Reply::Chain)
			}
			Method::RemoveRange => {
				let (start, end) = Args::new("removeRange(start, end)", args).range()?;
				self.remove_range(start, end)?;
				Ok(Reply::Chain)
			}
			Method::RemoveLast => {
				Args::new("removeLast()", args).none()?;
				self.remove_last()?;
				Ok(Reply::Chain)
			}
			Method::Clear => {
				Args::new("clear()", args).none()?;
				self.clear()?;
				Ok(Reply::Chain)
			}
			Method::Reverse => {
				Args::new("reverse()", args).none()?;
				self.reverse()?;
				Ok(Reply::Chain)
			}
			Method::Equals => {
				let other = Args::new("equals(value)", args).one()?;
				let equal = other.as_array().is_some_and(|values| self.equals_values(values));
				Ok(Reply::Value(Value::Bool(equal)))
			}
			Method::IsEmpty => {
				Args::new("isEmpty()", args).none()?;
				Ok(Reply::Value(Value::Bool(self.is_empty())))
			}
			Method::Size => {
				Args::new("size()", args).none()?;
				Ok(Reply::Value(Value::from(self.len())))
			}
			Method::ToArray => {
				Args::new("toArray()", args).none()?;
				Ok(Reply::Value(Value::Array(self.to_array())))
			}
			Method::ToString => {
				Args::new("toString()", args).none()?;
				Ok(Reply::Value(Value::String(self.to_string())))
			}
			Method::GetAt | Method::Keys | Method::SetAll | Method::ToObject => Err(unknown(method)),
		}
	}
}
