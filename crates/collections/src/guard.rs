//! Reentrancy protection for container traversals.
//!
//! Each container owns one [`IterationGuard`]. Traversals hold a
//! [`Traversal`] token for their whole duration; mutators call
//! [`IterationGuard::ensure_idle`] before touching storage.
//!
//! # Invariants
//!
//! - While any traversal of a container is active, every mutator of that
//!   container fails with `ConcurrentModification` and leaves it unchanged.
//!   - Enforced in: [`IterationGuard::ensure_idle`], checked before any `borrow_mut`.
//!   - Tested by: `tests/reentrancy.rs`.
//! - The depth returns to its prior value when a traversal ends, whether the
//!   callback returned, failed, or panicked.
//!   - Enforced in: `Drop for Traversal`.
//!   - Tested by: `guard::tests::depth_restored_after_panic`.

use std::cell::{Cell, Ref, RefCell, RefMut};

use crate::error::{CollectionError, Result};

/// Nesting counter of active traversals over one container.
#[derive(Debug, Default)]
pub(crate) struct IterationGuard {
	depth: Cell<usize>,
}

impl IterationGuard {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Returns true while at least one traversal is active.
	pub(crate) fn is_active(&self) -> bool {
		self.depth.get() > 0
	}

	/// Enters a traversal, returning a token that must be held until it ends.
	pub(crate) fn enter(&self) -> Traversal<'_> {
		self.depth.set(self.depth.get() + 1);
		Traversal { guard: self }
	}

	/// Fails if a traversal is active.
	pub(crate) fn ensure_idle(&self, method: &'static str) -> Result<()> {
		if self.is_active() {
			tracing::debug!(method, depth = self.depth.get(), "mutation rejected during traversal");
			return Err(CollectionError::ConcurrentModification { method });
		}
		Ok(())
	}
}

/// Scope token for one active traversal.
#[must_use]
pub(crate) struct Traversal<'a> {
	guard: &'a IterationGuard,
}

impl Traversal<'_> {
	/// Returns true if no enclosing traversal of the same container exists.
	pub(crate) fn is_outermost(&self) -> bool {
		self.guard.depth.get() == 1
	}
}

impl Drop for Traversal<'_> {
	fn drop(&mut self) {
		let prev = self.guard.depth.get();
		debug_assert!(prev > 0, "iteration depth underflow");
		self.guard.depth.set(prev.saturating_sub(1));
	}
}

/// Container storage paired with its guard.
///
/// Exclusive access is only handed out once the guard reports idle, so a
/// callback that reenters a mutator gets an error instead of a borrow panic.
#[derive(Debug, Default)]
pub(crate) struct Guarded<T> {
	cell: RefCell<T>,
	guard: IterationGuard,
}

impl<T> Guarded<T> {
	pub(crate) fn new(value: T) -> Self {
		Self {
			cell: RefCell::new(value),
			guard: IterationGuard::new(),
		}
	}

	pub(crate) fn read(&self) -> Ref<'_, T> {
		self.cell.borrow()
	}

	/// Returns mutable access for `method`, or fails if a traversal is active.
	pub(crate) fn write(&self, method: &'static str) -> Result<RefMut<'_, T>> {
		self.guard.ensure_idle(method)?;
		Ok(self.cell.borrow_mut())
	}

	pub(crate) fn enter(&self) -> Traversal<'_> {
		self.guard.enter()
	}

	pub(crate) fn is_traversing(&self) -> bool {
		self.guard.is_active()
	}
}
