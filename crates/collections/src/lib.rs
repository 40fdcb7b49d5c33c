#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Ordered containers for dynamically typed host values.
//!
//! Three containers share one value model ([`Value`]) and one key model
//! ([`Key`]):
//!
//! - [`Map`]: key/value table. Index-like keys (`"0"`, `"17"`) enumerate
//!   first in ascending numeric order, every other key follows in the order
//!   it was first inserted. Overwriting a key keeps its position.
//! - [`Set`]: membership by canonical key with the same ordering rule.
//! - [`Vector`]: growable sequence whose [`Vector::each`] traversal can
//!   replace, remove and insert elements through a [`Cursor`].
//!
//! Every mutator fails with [`CollectionError::ConcurrentModification`] while
//! a traversal of the same container is running, so callbacks can read the
//! container freely but never observe it changing underneath them.
//!
//! Typed methods are the primary API. [`Dispatch`] exposes the same
//! operations by name with runtime argument checking, for callers holding
//! only a method name and a list of values.
//!
//! ```
//! use orca_collections::{Map, Value, record};
//!
//! let map = Map::from(record! { "b" => 1, "2" => "two", "a" => 3 });
//! map.set("0", Value::Null)?;
//! let keys: Vec<_> = map.keys().iter().map(|k| k.as_str().to_owned()).collect();
//! assert_eq!(keys, ["0", "2", "b", "a"]);
//! # Ok::<(), orca_collections::CollectionError>(())
//! ```

mod dispatch;
mod error;
mod guard;
mod key;
mod map;
mod set;
mod source;
mod table;
mod value;
mod vector;

pub use dispatch::{Dispatch, Method, Reply};
pub use error::{ArgumentProblem, CollectionError, Result};
pub use key::{IntoKey, Key, KeyClass, MAX_INDEX, classify};
pub use map::{Map, MapEntry};
pub use set::Set;
pub use source::Source;
pub use table::{OrderedTable, Record};
pub use value::{Value, format_number};
pub use vector::{Cursor, Disposition, Vector};
