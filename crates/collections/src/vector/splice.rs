use crate::value::Value;

/// A single step of a [`SpliceSet`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operation {
	/// Keep the next `n` source elements.
	Retain(usize),
	/// Drop the next `n` source elements.
	Delete(usize),
	/// Emit new elements at the current position.
	Insert(Vec<Value>),
}

/// Retain/delete/insert edit list over a sequence of values.
///
/// Built left to right while a traversal visits each position, then applied
/// in one pass. Source elements past the last operation are retained.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct SpliceSet {
	changes: Vec<Operation>,
	/// Source elements covered by the operations.
	len: usize,
	/// Elements produced by the operations.
	len_after: usize,
}

impl SpliceSet {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn len(&self) -> usize {
		self.len
	}

	pub(crate) fn len_after(&self) -> usize {
		self.len_after
	}

	#[cfg(test)]
	pub(crate) fn changes(&self) -> &[Operation] {
		&self.changes
	}

	/// Returns true if applying this set leaves any source unchanged.
	pub(crate) fn is_identity(&self) -> bool {
		self.changes.iter().all(|op| matches!(op, Operation::Retain(_)))
	}

	/// Keeps `n` source elements; consecutive retains merge.
	pub(crate) fn retain(&mut self, n: usize) {
		if n == 0 {
			return;
		}

		self.len += n;
		self.len_after += n;

		if let Some(Operation::Retain(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Retain(n));
		}
	}

	/// Drops `n` source elements; consecutive deletes merge.
	pub(crate) fn delete(&mut self, n: usize) {
		if n == 0 {
			return;
		}

		self.len += n;

		if let Some(Operation::Delete(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Delete(n));
		}
	}

	/// Emits `values` at the current position.
	///
	/// Adjacent inserts merge, and an insert that follows a delete is moved
	/// ahead of it; neither changes the applied result.
	pub(crate) fn insert(&mut self, values: impl IntoIterator<Item = Value>) {
		let mut values = values.into_iter().peekable();
		if values.peek().is_none() {
			return;
		}

		match self.changes.as_mut_slice() {
			[.., Operation::Insert(prev)] | [.., Operation::Insert(prev), Operation::Delete(_)] => {
				let before = prev.len();
				prev.extend(values);
				self.len_after += prev.len() - before;
			}
			[.., last @ Operation::Delete(_)] => {
				let values: Vec<Value> = values.collect();
				self.len_after += values.len();
				let del = std::mem::replace(last, Operation::Insert(values));
				self.changes.push(del);
			}
			_ => {
				let values: Vec<Value> = values.collect();
				self.len_after += values.len();
				self.changes.push(Operation::Insert(values));
			}
		}
	}

	/// Applies the edits to `source`, which must hold at least `len()` elements.
	pub(crate) fn apply(self, source: Vec<Value>) -> Vec<Value> {
		debug_assert!(source.len() >= self.len, "splice longer than its source");
		let trailing = source.len().saturating_sub(self.len);
		let mut output = Vec::with_capacity(self.len_after + trailing);
		let mut source = source.into_iter();

		for op in self.changes {
			match op {
				Operation::Retain(n) => output.extend(source.by_ref().take(n)),
				Operation::Delete(n) => source.by_ref().take(n).for_each(drop),
				Operation::Insert(values) => output.extend(values),
			}
		}
		output.extend(source);
		output
	}
}
