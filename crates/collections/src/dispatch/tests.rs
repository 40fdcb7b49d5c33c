use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::record;

fn strs(values: &[&str]) -> Vec<Value> {
	values.iter().copied().map(Value::from).collect()
}

fn message(result: Result<Reply>) -> String {
	match result {
		Ok(reply) => panic!("expected an error, got {reply:?}"),
		Err(error) => error.to_string(),
	}
}

fn sample_map() -> Map {
	Map::from(record! { "a" => 1, "b" => 2, "c" => 3 })
}

#[rstest]
#[case::add("add", Method::Add)]
#[case::add_all("addAll", Method::AddAll)]
#[case::get_at("getAt", Method::GetAt)]
#[case::is_empty("isEmpty", Method::IsEmpty)]
#[case::remove_range("removeRange", Method::RemoveRange)]
#[case::to_string("toString", Method::ToString)]
fn method_names_use_host_spelling(#[case] name: &str, #[case] method: Method) {
	assert_eq!(parse(name), Ok(method));
	assert_eq!(method.name(), name);
}

#[test]
fn unknown_names_are_rejected() {
	let map = sample_map();
	assert_eq!(
		map.call("frobnicate", &[]),
		Err(CollectionError::UnknownMethod("frobnicate".into()))
	);
	assert_eq!(map.call("reverse", &[]), Err(CollectionError::UnknownMethod("reverse".into())));
	assert_eq!(
		Vector::new().call("toObject", &[]),
		Err(CollectionError::UnknownMethod("toObject".into()))
	);
	assert_eq!(Set::new().call("keys", &[]), Err(CollectionError::UnknownMethod("keys".into())));
}

#[rstest]
#[case::clear_with_argument("clear", vec![Value::from(1)], "clear() does not take any argument.")]
#[case::get_without_keys("get", vec![], "get(key, ...) takes at least one argument.")]
#[case::get_at_string("getAt", strs(&["abc"]), "getAt(index, ...) takes only integer arguments.")]
#[case::get_at_negative("getAt", vec![Value::from(-1)], "getAt(index, ...) takes only integer arguments.")]
#[case::get_at_fraction("getAt", vec![Value::from(1.5)], "getAt(index, ...) takes only integer arguments.")]
#[case::range_missing_end(
	"removeRange",
	vec![Value::from(1), Value::Undefined],
	"removeRange(start, end) takes only integer arguments."
)]
#[case::range_one_argument("removeRange", vec![Value::from(1)], "removeRange(start, end) takes two arguments.")]
#[case::set_one_argument("set", vec![Value::from(1)], "set(key, value) takes a key and a value.")]
#[case::set_all_scalar("setAll", vec![Value::from(1)], "setAll(object) argument must be an object or an array of [key, value] pairs.")]
#[case::set_all_two("setAll", vec![Value::from(1), Value::from(2)], "setAll(object) takes one argument.")]
#[case::set_all_not_pairs("setAll", vec![Value::Array(strs(&["a"]))], "setAll(object) entries must be [key, value] pairs.")]
#[case::equals_nothing("equals", vec![], "equals(value) takes one argument.")]
fn map_argument_errors(#[case] method: &str, #[case] args: Vec<Value>, #[case] expected: &str) {
	let map = sample_map();
	assert_eq!(message(map.call(method, &args)), expected);
	assert!(map.equals_record(&record! { "a" => 1, "b" => 2, "c" => 3 }));
}

#[rstest]
#[case::vector_set_string_index(strs(&["x", "y"]), "set(index, value) takes an integer index and a value.")]
#[case::vector_set_one(vec![Value::from(0)], "set(index, value) takes an integer index and a value.")]
#[case::vector_set_past_end(
	vec![Value::from(5), Value::from("y")],
	"set(index, value) index is greater than the size of this vector."
)]
fn vector_set_errors(#[case] args: Vec<Value>, #[case] expected: &str) {
	let vector = Vector::from_iter([1, 2, 3]);
	assert_eq!(message(vector.call("set", &args)), expected);
	assert!(vector.equals_values(&[1.into(), 2.into(), 3.into()]));
}

#[test]
fn add_all_accepts_only_arrays() {
	let set = Set::new();
	assert_eq!(
		message(set.call("addAll", &[Value::Object(record! { "a" => 1 })])),
		"addAll(collection) argument must be an array, a vector, or a set."
	);
	assert_eq!(message(set.call("addAll", &[])), "addAll(collection) takes one argument.");
	assert!(set.is_empty());
}

#[test]
fn single_lookup_answers_with_a_value() {
	let map = sample_map();
	assert_eq!(map.call("get", &strs(&["b"])), Ok(Reply::Value(2.into())));
	assert_eq!(map.call("get", &strs(&["z"])), Ok(Reply::Value(Value::Undefined)));
	assert_eq!(map.call("has", &strs(&["a"])), Ok(Reply::Value(true.into())));
}

#[test]
fn several_lookups_answer_with_a_batch() {
	let map = Map::from(record! { "x" => 1, "y" => 2, "z" => 3, "a" => 4, "b" => 5, "c" => 6 });
	assert_eq!(
		map.call("get", &strs(&["x", "y", "z", "a", "b", "c"])),
		Ok(Reply::Batch(vec![1.into(), 2.into(), 3.into(), 4.into(), 5.into(), 6.into()]))
	);
	assert_eq!(
		map.call("has", &strs(&["x", "q"])),
		Ok(Reply::Batch(vec![true.into(), false.into()]))
	);
}

#[test]
fn missing_positions_read_as_undefined() {
	let map = sample_map();
	assert_eq!(map.call("getAt", &[Value::Undefined]), Ok(Reply::Value(Value::Undefined)));
	assert_eq!(map.call("getAt", &[Value::from(9)]), Ok(Reply::Value(Value::Undefined)));
	assert_eq!(
		map.call("getAt", &[Value::from(1)]).map(Reply::into_value),
		Ok(Value::Object(record! { "key" => "b", "value" => 2 }))
	);
}

#[test]
fn mutators_chain() {
	let map = sample_map();
	assert_eq!(map.call("set", &[Value::from("d"), Value::from(4)]), Ok(Reply::Chain));
	assert_eq!(map.call("remove", &strs(&["a", "nope"])), Ok(Reply::Chain));
	assert_eq!(map.call("removeAt", &[Value::from(0), Value::Null]), Ok(Reply::Chain));
	assert_eq!(map.call("size", &[]), Ok(Reply::Value(2.into())));
	assert_eq!(map.call("toString", &[]), Ok(Reply::Value(r#"{"c":3,"d":4}"#.into())));
	assert_eq!(map.call("setAll", &[Value::Object(record! { "1" => "one" })]), Ok(Reply::Chain));
	assert_eq!(map.call("keys", &[]), Ok(Reply::Value(strs(&["1", "c", "d"]).into())));
	assert_eq!(map.call("removeRange", &[Value::from(0), Value::from(2)]), Ok(Reply::Chain));
	assert_eq!(map.call("removeLast", &[]), Ok(Reply::Chain));
	assert_eq!(map.call("isEmpty", &[]), Ok(Reply::Value(true.into())));
}

#[test]
fn equals_compares_against_plain_values() {
	let map = sample_map();
	assert_eq!(
		map.call("equals", &[Value::Object(record! { "c" => 3, "b" => 2, "a" => 1 })]),
		Ok(Reply::Value(true.into()))
	);
	assert_eq!(map.call("equals", &[Value::from(1)]), Ok(Reply::Value(false.into())));

	let set = Set::from_iter(["a", "b"]);
	assert_eq!(set.call("equals", &[strs(&["b", "a"]).into()]), Ok(Reply::Value(true.into())));
	assert_eq!(set.call("equals", &[Value::Object(set.to_object())]), Ok(Reply::Value(false.into())));

	let vector = Vector::from_iter(["a", "b"]);
	assert_eq!(vector.call("equals", &[strs(&["a", "b"]).into()]), Ok(Reply::Value(true.into())));
	assert_eq!(vector.call("equals", &[strs(&["b", "a"]).into()]), Ok(Reply::Value(false.into())));
}

#[test]
fn set_dispatch() {
	let set = Set::new();
	assert_eq!(set.call("add", &strs(&["abc", "def", "abc"])), Ok(Reply::Chain));
	assert_eq!(set.call("addAll", &[strs(&["g", "def"]).into()]), Ok(Reply::Chain));
	assert_eq!(set.call("toArray", &[]), Ok(Reply::Value(strs(&["abc", "def", "g"]).into())));
	assert_eq!(set.call("index", &strs(&["g"])), Ok(Reply::Value(2.into())));
	assert_eq!(
		set.call("index", &strs(&["abc", "zzz"])),
		Ok(Reply::Batch(vec![0.into(), Value::Undefined]))
	);
	assert_eq!(set.call("get", &[Value::from(1)]), Ok(Reply::Value("def".into())));
	assert_eq!(set.call("remove", &strs(&["def"])), Ok(Reply::Chain));
	assert_eq!(set.call("toString", &[]), Ok(Reply::Value(r#"["abc","g"]"#.into())));
	assert_eq!(
		set.call("toObject", &[]),
		Ok(Reply::Value(Value::Object(record! { "abc" => true, "g" => true })))
	);
}

#[test]
fn vector_dispatch() {
	let vector = Vector::new();
	assert_eq!(vector.call("add", &strs(&["a", "b", "a"])), Ok(Reply::Chain));
	assert_eq!(vector.call("set", &[Value::from(3), Value::from("c")]), Ok(Reply::Chain));
	assert_eq!(vector.call("reverse", &[]), Ok(Reply::Chain));
	assert_eq!(vector.call("toArray", &[]), Ok(Reply::Value(strs(&["c", "a", "b", "a"]).into())));
	assert_eq!(vector.call("remove", &strs(&["a"])), Ok(Reply::Chain));
	assert_eq!(vector.call("index", &strs(&["a"])), Ok(Reply::Value(2.into())));
	assert_eq!(vector.call("has", &strs(&["a", "z"])), Ok(Reply::Batch(vec![true.into(), false.into()])));
	assert_eq!(vector.call("removeAt", &[Value::from(0), Value::from(0)]), Ok(Reply::Chain));
	assert_eq!(vector.call("size", &[]), Ok(Reply::Value(2.into())));
}

#[test]
fn reply_flattens_to_a_value() {
	assert_eq!(Reply::Chain.into_value(), Value::Undefined);
	assert_eq!(Reply::Value(1.into()).into_value(), Value::from(1));
	assert_eq!(
		Reply::Batch(vec![1.into(), 2.into()]).into_value(),
		Value::Array(vec![1.into(), 2.into()])
	);
}
