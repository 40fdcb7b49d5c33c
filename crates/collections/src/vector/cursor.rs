use smallvec::SmallVec;

use super::splice::SpliceSet;
use crate::value::Value;

/// Fate of the visited element once the traversal materializes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Disposition {
	#[default]
	Keep,
	Replaced(Value),
	Removed,
}

/// Edit handle for the element currently visited by [`Vector::each`].
///
/// `set` and `remove` decide the element's fate, and the last one called
/// wins. `insert_before` and `insert_after` accumulate in call order and
/// are independent of that fate. Nothing touches the vector until the
/// traversal has visited every position.
///
/// [`Vector::each`]: super::Vector::each
#[derive(Debug)]
pub struct Cursor {
	position: usize,
	len: usize,
	disposition: Disposition,
	before: SmallVec<[Value; 2]>,
	after: SmallVec<[Value; 2]>,
	stopped: bool,
}

impl Cursor {
	pub(crate) fn new(position: usize, len: usize) -> Self {
		Self {
			position,
			len,
			disposition: Disposition::Keep,
			before: SmallVec::new(),
			after: SmallVec::new(),
			stopped: false,
		}
	}

	/// Position of the visited element in the vector as it was when the
	/// traversal began.
	pub fn index(&self) -> usize {
		self.position
	}

	/// Returns true for the first position of the traversal.
	pub fn is_first(&self) -> bool {
		self.position == 0
	}

	/// Returns true for the last position of the traversal.
	pub fn is_last(&self) -> bool {
		self.position + 1 == self.len
	}

	/// Returns the fate recorded so far for the visited element.
	pub fn disposition(&self) -> &Disposition {
		&self.disposition
	}

	/// Replaces the visited element.
	pub fn set(&mut self, value: impl Into<Value>) -> &mut Self {
		self.disposition = Disposition::Replaced(value.into());
		self
	}

	/// Removes the visited element.
	pub fn remove(&mut self) -> &mut Self {
		self.disposition = Disposition::Removed;
		self
	}

	/// Queues a value to land immediately before the visited element.
	pub fn insert_before(&mut self, value: impl Into<Value>) -> &mut Self {
		self.before.push(value.into());
		self
	}

	/// Queues several values before the visited element, in order.
	pub fn insert_before_all<V: Into<Value>>(&mut self, values: impl IntoIterator<Item = V>) -> &mut Self {
		self.before.extend(values.into_iter().map(Into::into));
		self
	}

	/// Queues a value to land immediately after the visited element.
	pub fn insert_after(&mut self, value: impl Into<Value>) -> &mut Self {
		self.after.push(value.into());
		self
	}

	/// Queues several values after the visited element, in order.
	pub fn insert_after_all<V: Into<Value>>(&mut self, values: impl IntoIterator<Item = V>) -> &mut Self {
		self.after.extend(values.into_iter().map(Into::into));
		self
	}

	/// Ends the traversal after this element. Edits made so far, this
	/// element's included, are still applied; later elements are kept as is.
	pub fn stop(&mut self) -> &mut Self {
		self.stopped = true;
		self
	}

	pub(crate) fn is_stopped(&self) -> bool {
		self.stopped
	}

	/// Appends this position's edits to `splice`.
	pub(crate) fn record_into(self, splice: &mut SpliceSet) {
		splice.insert(self.before);
		match self.disposition {
			Disposition::Keep => splice.retain(1),
			Disposition::Replaced(value) => {
				splice.delete(1);
				splice.insert([value]);
			}
			Disposition::Removed => splice.delete(1),
		}
		splice.insert(self.after);
	}
}
