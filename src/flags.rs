//! Bookkeeping bits stored on every [`StateNode`](`crate::StateNode`).
//!
//! *Self* flags describe the node itself, *deep* flags summarise its descendants so that whole subtrees
//! can be skipped by the dirty-check and unmount walks.

use bitflags::bitflags;

bitflags! {
	#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
	pub struct NodeFlags: u8 {
		/// The component must re-render on its next visit.
		const DIRTY = 1 << 0;
		/// The component has a dirty-check predicate or can be invalidated.
		const DIRTY_CHECK = 1 << 1;
		/// Unmounting this node runs side effects (unmount callbacks, ref clearing).
		const UNMOUNT = 1 << 2;

		/// Some descendant has [`Self::DIRTY_CHECK`].
		const DEEP_DIRTY_CHECK = 1 << 5;
		/// Some descendant has [`Self::UNMOUNT`].
		const DEEP_UNMOUNT = 1 << 6;
	}
}

impl NodeFlags {
	const SELF_PROPAGATED: Self = Self::DIRTY_CHECK.union(Self::UNMOUNT);
	const DEEP: Self = Self::DEEP_DIRTY_CHECK.union(Self::DEEP_UNMOUNT);
	const DEEP_SHIFT: u8 = 4;

	/// Only the self flags.
	#[must_use]
	pub const fn own(self) -> Self {
		self.difference(Self::DEEP)
	}

	/// Only the deep flags.
	#[must_use]
	pub const fn deep(self) -> Self {
		self.intersection(Self::DEEP)
	}

	/// What a parent has to fold into its deep flags for a child with these flags.
	#[must_use]
	pub const fn propagated(self) -> Self {
		let lifted = Self::from_bits_retain(self.intersection(Self::SELF_PROPAGATED).bits() << Self::DEEP_SHIFT);
		self.deep().union(lifted)
	}
}
