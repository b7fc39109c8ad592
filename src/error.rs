use crate::op::Key;
use thiserror::Error;

/// Everything a reconciliation pass or operation tree construction can fail with.
///
/// Failures inside component code (setup, render or predicate closures) are not represented here.
/// They panic through the reconciler untouched.
#[derive(Debug, Error)]
pub enum Error {
	/// A keyed list was constructed with the same key more than once.
	#[error("duplicate key {0} in keyed list")]
	DuplicateKey(Key),

	/// The DOM backend rejected a mutation.
	///
	/// The DOM is left in whatever state the pass reached. There is no rollback.
	#[error("DOM operation `{operation}` failed: {message}")]
	Dom { operation: &'static str, message: String },

	/// The operation tree nests deeper than [`Config::depth_limit`](`crate::Config::depth_limit`).
	#[error("depth limit of {0} reached")]
	DepthLimit(usize),
}

impl Error {
	pub(crate) fn dom(operation: &'static str, message: impl Into<String>) -> Self {
		Self::Dom {
			operation,
			message: message.into(),
		}
	}
}
