use std::convert::Infallible;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::{fixture, rstest};

use super::splice::{Operation, SpliceSet};
use super::*;
use crate::{Map, Set};

fn nums(items: &[i32]) -> Vec<Value> {
	items.iter().copied().map(Value::from).collect()
}

fn num(value: &Value) -> f64 {
	value.as_f64().unwrap_or(f64::NAN)
}

#[fixture]
fn v1() -> Vector {
	Vector::from_iter(1..=10)
}

#[fixture]
fn v2() -> Vector {
	Vector::from_iter(["abc", "def", "g"])
}

#[test]
fn splice_merges_adjacent_operations() {
	let mut splice = SpliceSet::new();
	splice.retain(1);
	splice.retain(2);
	splice.delete(1);
	splice.insert([Value::from("a")]);
	splice.insert([Value::from("b")]);
	splice.delete(1);
	assert_eq!(
		splice.changes(),
		&[
			Operation::Retain(3),
			Operation::Insert(vec![Value::from("a"), Value::from("b")]),
			Operation::Delete(2),
		]
	);
	assert_eq!(splice.len(), 5);
	assert_eq!(splice.len_after(), 5);
	assert!(!splice.is_identity());
}

#[test]
fn splice_apply_keeps_trailing_source() {
	let mut splice = SpliceSet::new();
	splice.delete(1);
	splice.insert(nums(&[9]));
	splice.retain(1);
	assert_eq!(splice.apply(nums(&[1, 2, 3, 4])), nums(&[9, 2, 3, 4]));

	let mut identity = SpliceSet::new();
	identity.retain(2);
	identity.insert(Vec::new());
	assert!(identity.is_identity());
}

#[rstest]
fn add_appends(v1: Vector, v2: Vector) {
	v1.add_many(11..=15).unwrap();
	assert_eq!(v1.to_array(), nums(&(1..=15).collect::<Vec<_>>()));
	let nested = Value::from(nums(&[1, 2, 3]));
	v2.add(nested.clone()).unwrap();
	assert_eq!(v2.get(3), Some(nested));
}

#[rstest]
fn add_all_keeps_duplicates(v2: Vector) {
	let expected: Vec<Value> = ["abc", "def", "g", "f", "g", "h"].map(Value::from).to_vec();
	let tail: Vec<Value> = ["f", "g", "h"].map(Value::from).to_vec();
	assert_eq!(Vector::from_iter(["abc", "def", "g"]).add_all(&tail).unwrap().to_array(), expected);
	assert_eq!(Vector::from_iter(["abc", "def", "g"]).add_all(&Vector::from(tail.clone())).unwrap().to_array(), expected);
	assert_eq!(v2.add_all(&Set::from_iter(tail)).unwrap().to_array(), expected);
	assert!(v2.add_all(&Map::new()).is_err());
	assert_eq!(v2.len(), 6);
}

#[rstest]
fn each_visits_in_order_with_cursor_introspection(v1: Vector) {
	let mut visited = Vec::new();
	v1.each(|v, m| {
		assert_eq!(m.is_first(), m.index() == 0);
		assert_eq!(m.is_last(), m.index() == 9);
		visited.push((m.index(), v.clone()));
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	let expected: Vec<(usize, Value)> = nums(&(1..=10).collect::<Vec<_>>()).into_iter().enumerate().collect();
	assert_eq!(visited, expected);

	Vector::new()
		.each(|_, _| -> std::result::Result<(), CollectionError> { panic!("empty vector visited") })
		.unwrap();
}

#[rstest]
fn cursor_set_replaces(v1: Vector, v2: Vector) {
	v1.each(|v, m| {
		m.set(11.0 - num(v));
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(v1.to_array(), nums(&[10, 9, 8, 7, 6, 5, 4, 3, 2, 1]));

	let reversed = ["g", "def", "abc"];
	v2.each(|_, m| {
		m.set(reversed[m.index()]);
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(v2.to_array(), reversed.map(Value::from).to_vec());
}

#[rstest]
fn last_disposition_wins(v1: Vector) {
	v1.each(|v, m| {
		m.remove().set(0).set(11.0 - num(v));
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(v1.to_array(), nums(&[10, 9, 8, 7, 6, 5, 4, 3, 2, 1]));

	v1.each(|v, m| {
		m.set(0).set(num(v) + 1.0).remove();
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert!(v1.is_empty());
}

#[test]
fn repeated_remove_is_idempotent() {
	let vector = Vector::from_iter(1..=3);
	vector
		.each(|v, m| {
			m.set(0).set(num(v) - 1.0).remove().remove();
			Ok::<_, CollectionError>(())
		})
		.unwrap();
	assert!(vector.is_empty());
}

#[rstest]
fn insert_before_composes_across_passes(v1: Vector) {
	v1.each(|v, m| {
		let v = num(v);
		if v % 2.0 == 0.0 {
			m.insert_before(v / 2.0);
		}
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(v1.to_array(), nums(&[1, 1, 2, 3, 2, 4, 5, 3, 6, 7, 4, 8, 9, 5, 10]));

	v1.each(|v, m| {
		let v = num(v);
		if v % 3.0 == 0.0 {
			m.insert_before_all([v / 3.0, v * 2.0 / 3.0]);
		}
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(
		v1.to_array(),
		nums(&[1, 1, 2, 1, 2, 3, 2, 4, 5, 1, 2, 3, 2, 4, 6, 7, 4, 8, 3, 6, 9, 5, 10])
	);

	v1.each(|v, m| {
		let v = num(v);
		if v % 4.0 == 0.0 {
			m.insert_before(v / 4.0).insert_before(v / 2.0).insert_before(v * 3.0 / 4.0);
		}
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(
		v1.to_array(),
		nums(&[
			1, 1, 2, 1, 2, 3, 2, 1, 2, 3, 4, 5, 1, 2, 3, 2, 1, 2, 3, 4, 6, 7, 1, 2, 3, 4, 2, 4, 6, 8, 3, 6, 9, 5, 10
		])
	);
}

#[rstest]
fn insert_after_composes_across_passes(v1: Vector) {
	v1.each(|v, m| {
		let v = num(v);
		if v % 2.0 == 0.0 {
			m.insert_after(v / 2.0);
		}
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(v1.to_array(), nums(&[1, 2, 1, 3, 4, 2, 5, 6, 3, 7, 8, 4, 9, 10, 5]));

	v1.each(|v, m| {
		let v = num(v);
		if v % 3.0 == 0.0 {
			m.insert_after_all([v * 2.0 / 3.0, v / 3.0]);
		}
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(
		v1.to_array(),
		nums(&[1, 2, 1, 3, 2, 1, 4, 2, 5, 6, 4, 2, 3, 2, 1, 7, 8, 4, 9, 6, 3, 10, 5])
	);

	v1.each(|v, m| {
		let v = num(v);
		if v % 4.0 == 0.0 {
			m.insert_after(v * 3.0 / 4.0).insert_before(v / 2.0).insert_before(v / 4.0);
		}
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(
		v1.to_array(),
		nums(&[
			1, 2, 1, 3, 2, 1, 2, 1, 4, 3, 2, 5, 6, 2, 1, 4, 3, 2, 3, 2, 1, 7, 4, 2, 8, 6, 2, 1, 4, 3, 9, 6, 3, 10, 5
		])
	);
}

#[rstest]
fn inserts_combine_with_dispositions(v1: Vector) {
	v1.each(|v, m| {
		let v = num(v);
		if v % 3.0 == 0.0 {
			m.insert_before_all([v / 3.0, v * 2.0 / 3.0]);
			m.insert_after_all([v * 2.0 / 3.0, v / 3.0]);
			m.remove();
		}
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(
		v1.to_array(),
		nums(&[1, 2, 1, 2, 2, 1, 4, 5, 2, 4, 4, 2, 7, 8, 3, 6, 6, 3, 10])
	);

	v1.each(|v, m| {
		let v = num(v);
		if v % 2.0 == 0.0 {
			m.insert_before(v / 2.0);
			m.insert_after(v / 2.0);
			m.set(0);
		}
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(
		v1.to_array(),
		nums(&[
			1, 1, 0, 1, 1, 1, 0, 1, 1, 0, 1, 1, 2, 0, 2, 5, 1, 0, 1, 2, 0, 2, 2, 0, 2, 1, 0, 1, 7, 4, 0, 4, 3, 3, 0, 3,
			3, 0, 3, 3, 5, 0, 5
		])
	);
}

#[rstest]
fn inserted_values_are_not_revisited(v1: Vector) {
	let mut visits = 0;
	v1.each(|_, m| {
		visits += 1;
		m.insert_before(0).insert_after(0);
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(visits, 10);
	assert_eq!(v1.len(), 30);
}

#[rstest]
fn stop_ends_traversal_and_keeps_edits(v1: Vector) {
	let mut visits = 0;
	v1.each(|_, m| {
		visits += 1;
		m.set(0);
		if m.index() == 2 {
			m.insert_after(-1).stop();
		}
		Ok::<_, CollectionError>(())
	})
	.unwrap();
	assert_eq!(visits, 3);
	assert_eq!(v1.to_array(), nums(&[0, 0, 0, -1, 4, 5, 6, 7, 8, 9, 10]));
}

#[derive(Debug, PartialEq)]
enum Failure {
	Callback,
	Collection(CollectionError),
}

impl From<CollectionError> for Failure {
	fn from(error: CollectionError) -> Self {
		Self::Collection(error)
	}
}

#[rstest]
fn callback_error_discards_edits(v1: Vector) {
	let result = v1.each(|_, m| {
		m.set(0).insert_before(1);
		if m.index() == 5 { Err(Failure::Callback) } else { Ok(()) }
	});
	assert_eq!(result, Err(Failure::Callback));
	assert_eq!(v1.to_array(), nums(&(1..=10).collect::<Vec<_>>()));
	assert!(v1.add(11).is_ok());
}

#[rstest]
fn mutators_fail_during_each(v1: Vector) {
	let result = v1.each(|_, _| {
		assert!(v1.add(1).is_err());
		assert!(v1.add_all(&nums(&[1])).is_err());
		assert!(v1.clear().is_err());
		assert!(v1.set(0, 0).is_err());
		assert!(v1.reverse().is_err());
		assert!(v1.remove(&Value::from(1)).is_err());
		assert!(v1.remove_at(1).is_err());
		assert!(v1.remove_range(0, 1).is_err());
		v1.remove_last()?;
		Ok::<_, Failure>(())
	});
	assert_eq!(
		result,
		Err(Failure::Collection(CollectionError::ConcurrentModification { method: "removeLast" }))
	);
	assert_eq!(v1.len(), 10);
}

#[rstest]
fn nested_each_cannot_edit(v1: Vector) {
	let result = v1.each(|_, _| {
		v1.each(|_, inner| {
			inner.remove();
			Ok::<_, CollectionError>(())
		})
	});
	assert_eq!(result, Err(CollectionError::ConcurrentModification { method: "each" }));
	assert_eq!(v1.len(), 10);

	let mut reads = 0;
	v1.each(|_, _| {
		v1.each(|_, _| {
			reads += 1;
			Ok::<_, CollectionError>(())
		})
	})
	.unwrap();
	assert_eq!(reads, 100);
}

#[rstest]
fn equals_is_sequence_equality(v1: Vector, v2: Vector) {
	assert!(v1.equals(&Vector::from_iter(1..=10)));
	assert!(!v1.equals(&Vector::from_iter(1..=3)));
	assert!(!v1.equals(&Vector::new()));
	assert!(v1.equals(&v1));
	assert!(v2.equals(&Vector::from(v2.to_array())));
	assert!(!v1.equals(&Vector::from_iter((1..=10).rev())));

	let nested = Vector::from_iter(1..=3);
	v1.add(&nested).unwrap();
	let mut expected = nums(&(1..=10).collect::<Vec<_>>());
	expected.push(Value::from(&nested));
	assert!(v1.equals_values(&expected));
}

#[rstest]
fn filter_find_map_reduce(v1: Vector, v2: Vector) {
	let even = |v: &Value| Ok::<_, Infallible>(num(v) % 2.0 == 0.0);
	assert_eq!(v1.filter(even).unwrap(), nums(&[2, 4, 6, 8, 10]));
	assert_eq!(v1.find(even).unwrap(), Some(Value::from(2)));
	assert_eq!(v1.find(|v| Ok::<_, Infallible>(num(v) > 10.0)).unwrap(), None);

	let squares = v1.map(|v| Ok::<_, Infallible>(Value::from(num(v) * num(v)))).unwrap();
	assert_eq!(squares.to_array(), nums(&[1, 4, 9, 16, 25, 36, 49, 64, 81, 100]));
	let capped = squares
		.map(|v| Ok::<_, Infallible>(if num(v) < 20.0 { v.clone() } else { Value::Undefined }))
		.unwrap();
	assert_eq!(capped.len(), 10);
	assert_eq!(capped.get(4), Some(Value::Undefined));
	let lengths = v2
		.map(|v| Ok::<_, Infallible>(Value::from(v.as_str().map_or(0, str::len))))
		.unwrap();
	assert_eq!(lengths.to_array(), nums(&[3, 3, 1]));
	assert_eq!(v1.len(), 10);

	assert_eq!(v1.reduce(0.0, |acc, v| Ok::<_, Infallible>(acc + num(v))).unwrap(), 55.0);
	let concat = |acc: String, v: &Value| Ok::<_, Infallible>(acc + &v.to_string());
	assert_eq!(v2.reduce(String::new(), concat).unwrap(), "abcdefg");
	assert_eq!(v2.reduce_right(String::new(), concat).unwrap(), "gdefabc");
}

#[rstest]
fn positional_access(v1: Vector, v2: Vector) {
	for i in 0..10 {
		assert_eq!(v1.get(i), Some(Value::from(i + 1)));
		assert_eq!(v1.index_of(&Value::from(i + 1)), Some(i));
	}
	assert_eq!(v1.get(10), None);
	assert_eq!(v1.get_many([1, 3, 999]), vec![Some(Value::from(2)), Some(Value::from(4)), None]);
	let probes = ["a", "g", "abc"].map(Value::from);
	assert_eq!(v2.index_of_many(&probes), vec![None, Some(2), Some(0)]);
	assert_eq!(v2.has_many(&probes), vec![false, true, true]);
	assert!(v1.has(&Value::from(10)) && !v1.has(&Value::from("10")));
}

#[rstest]
fn remove_by_value_takes_first_occurrence(v1: Vector) {
	let targets = nums(&[1, 3, 5]);
	v1.remove_many(&targets).unwrap().remove_many(&nums(&[7, 9])).unwrap();
	assert_eq!(v1.to_array(), nums(&[2, 4, 6, 8, 10]));

	let repeated = Vector::from_iter([1, 2, 1, 2]);
	repeated.remove(&Value::from(1)).unwrap();
	assert_eq!(repeated.to_array(), nums(&[2, 1, 2]));

	let before = v1.to_array();
	v1.add(Value::Undefined).unwrap().remove(&Value::Undefined).unwrap();
	v1.add(Value::Null).unwrap().remove(&Value::Null).unwrap();
	assert_eq!(v1.to_array(), before);
}

#[rstest]
fn remove_at_uses_pre_call_positions(v1: Vector, v2: Vector) {
	v1.remove_at_many([1, 3, 5]).unwrap().remove_at_many([7, 9]).unwrap();
	assert_eq!(v1.to_array(), nums(&[1, 3, 5, 7, 8, 9, 10]));
	assert!(v2.remove_at_many([0, 1, 2]).unwrap().is_empty());
	assert!(Vector::new().remove_at_many([0, 1]).unwrap().is_empty());
}

#[rstest]
fn remove_last_and_range(v1: Vector) {
	let mut expected = v1.to_array();
	while expected.pop().is_some() {
		assert_eq!(v1.remove_last().unwrap().to_array(), expected);
	}
	assert!(v1.remove_last().unwrap().is_empty());

	let v = Vector::from_iter(1..=10);
	assert_eq!(v.remove_range(2, 5).unwrap().to_array(), nums(&[1, 2, 6, 7, 8, 9, 10]));
	assert_eq!(v.remove_range(5, 100).unwrap().to_array(), nums(&[1, 2, 6, 7, 8]));
	assert_eq!(v.remove_range(3, 3).unwrap().len(), 5);
	assert_eq!(v.remove_range(9, 12).unwrap().len(), 5);
}

#[rstest]
fn reverse_in_place(v1: Vector) {
	assert_eq!(v1.reverse().unwrap().to_array(), nums(&[10, 9, 8, 7, 6, 5, 4, 3, 2, 1]));
	assert!(Vector::new().reverse().unwrap().is_empty());
}

#[rstest]
fn set_overwrites_or_appends(v1: Vector, v2: Vector) {
	v1.set(0, "a").unwrap().set(1, "b").unwrap().set(2, "c").unwrap();
	assert_eq!(v1.get_many([0, 1, 2, 3]), vec![
		Some(Value::from("a")),
		Some(Value::from("b")),
		Some(Value::from("c")),
		Some(Value::from(4))
	]);
	assert_eq!(v2.set(3, 999).unwrap().to_array().last(), Some(&Value::from(999)));
	let v3 = Vector::new();
	v3.set(0, 1).unwrap().set(1, 2).unwrap().set(2, 3).unwrap();
	assert_eq!(v3.to_array(), nums(&[1, 2, 3]));

	let past_end = v1.set(v1.len() + 1, 0);
	assert_eq!(
		past_end.unwrap_err(),
		CollectionError::Argument {
			signature: "set(index, value)",
			problem: ArgumentProblem::IndexPastEnd,
		}
	);
	assert_eq!(v1.len(), 10);
}

#[rstest]
fn rendering(v1: Vector, v2: Vector) {
	assert_eq!(v1.to_string(), "[1,2,3,4,5,6,7,8,9,10]");
	assert_eq!(v2.to_string(), r#"["abc","def","g"]"#);
	assert_eq!(Vector::new().to_string(), "[]");
	assert_eq!(format!("{:?}", Vector::from_iter([1])), "[Number(1.0)]");
}

proptest! {
	/// Repeated set/remove calls on one cursor resolve to the last one.
	#[test]
	fn prop_last_disposition_wins(
		items in prop::collection::vec(-50i32..50, 0..20),
		calls in prop::collection::vec(prop::option::of(-9i32..9), 1..6),
	) {
		let vector = Vector::from_iter(items.iter().copied());
		vector.each(|_, m| {
			for call in &calls {
				match call {
					Some(n) => m.set(*n),
					None => m.remove(),
				};
			}
			Ok::<_, CollectionError>(())
		}).unwrap();

		let expected: Vec<Value> = match calls.last() {
			Some(Some(n)) => vec![Value::from(*n); items.len()],
			_ => Vec::new(),
		};
		prop_assert_eq!(vector.to_array(), expected);
	}

	/// The output length is the input length plus queued inserts minus removals.
	#[test]
	fn prop_output_length(
		items in prop::collection::vec(0i32..100, 0..20),
		before in 0usize..3,
		after in 0usize..3,
	) {
		let vector = Vector::from_iter(items.iter().copied());
		vector.each(|v, m| {
			m.insert_before_all(std::iter::repeat_n(-1, before));
			m.insert_after_all(std::iter::repeat_n(-2, after));
			if num(v) % 2.0 == 0.0 {
				m.remove();
			}
			Ok::<_, CollectionError>(())
		}).unwrap();

		let removed = items.iter().filter(|n| *n % 2 == 0).count();
		prop_assert_eq!(vector.len(), items.len() * (1 + before + after) - removed);
	}
}
