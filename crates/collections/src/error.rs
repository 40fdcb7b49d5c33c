use thiserror::Error;

/// Errors raised by container operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
	/// An argument had the wrong count, type or range. Raised before any
	/// mutation takes place.
	#[error("{signature} {problem}.")]
	Argument {
		signature: &'static str,
		problem: ArgumentProblem,
	},
	/// A mutator was invoked while a traversal of the same container is in
	/// progress.
	#[error("{method}() cannot be called while the collection is being iterated.")]
	ConcurrentModification { method: &'static str },
	/// The dispatcher does not know the method name for this container kind.
	#[error("unknown method: {0}")]
	UnknownMethod(String),
}

impl CollectionError {
	pub(crate) fn argument(signature: &'static str, problem: ArgumentProblem) -> Self {
		Self::Argument { signature, problem }
	}

	/// Returns true for [`CollectionError::ConcurrentModification`].
	pub fn is_concurrent_modification(&self) -> bool {
		matches!(self, Self::ConcurrentModification { .. })
	}
}

/// What was wrong with the arguments of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArgumentProblem {
	#[error("does not take any argument")]
	NoArguments,
	#[error("takes at least one argument")]
	AtLeastOne,
	#[error("takes one argument")]
	ExactlyOne,
	#[error("takes two arguments")]
	ExactlyTwo,
	#[error("takes a key and a value")]
	KeyAndValue,
	#[error("takes an integer index and a value")]
	IndexAndValue,
	#[error("takes only integer arguments")]
	NotAnIndex,
	#[error("index is greater than the size of this vector")]
	IndexPastEnd,
	#[error("argument must be {expected}")]
	UnsupportedSource { expected: &'static str },
	#[error("entries must be [key, value] pairs")]
	NotAPair,
}

pub type Result<T> = std::result::Result<T, CollectionError>;
