//! Mount, update, keyed-list reconciliation, unmount and dirty checking.
//!
//! Every pass walks the state tree recursively and threads two things through the recursion explicitly:
//! a [`Cursor`] naming the DOM position new and moved nodes are inserted at, and an [`Env`] with the context.
//! Siblings are always visited right to left, so after a node was visited the cursor points at its first DOM node.

use crate::{
	component::UnmountReason,
	config::Config,
	context::Context,
	dom::Dom,
	op::{ElementProto, Op},
	state::StateNode,
	Error,
};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{debug, instrument};

mod dirty_check;
mod keyed;
mod mount;
mod unmount;
mod update;

/// Insert position for the current sibling list: before `next`, or at the end of `parent` if there is none.
#[derive(Debug)]
pub(crate) struct Cursor<N> {
	pub(crate) parent: N,
	pub(crate) next: Option<N>,
}

impl<N> Cursor<N> {
	pub(crate) fn new(parent: N) -> Self {
		Self { parent, next: None }
	}
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Env<'a> {
	pub(crate) context: &'a Context,
	/// Set below a context provider whose value changed during this pass.
	pub(crate) dirty_context: bool,
	depth: usize,
}

impl<'a> Env<'a> {
	fn new(context: &'a Context) -> Self {
		Self {
			context,
			dirty_context: false,
			depth: 0,
		}
	}

	fn enter(self, config: &Config) -> Result<Self, Error> {
		if self.depth >= config.depth_limit {
			return Err(Error::DepthLimit(config.depth_limit));
		}
		Ok(Self { depth: self.depth + 1, ..self })
	}
}

/// Drives a [`Dom`] from operation trees and keeps the resulting state trees consistent with it.
///
/// Most applications use [`Root`](`crate::Root`), which owns one state tree, instead of calling these methods directly.
/// The methods here operate on detached state trees and always treat `parent`'s end as the insert position.
#[derive(Debug)]
pub struct Reconciler<D: Dom> {
	dom: D,
	config: Config,
	/// Keeps each prototype alive until [`Reconciler::clear_prototypes`].
	protos: HashMap<*const ElementProto, (Rc<ElementProto>, D::Node)>,
}

impl<D: Dom> Reconciler<D> {
	#[must_use]
	pub fn new(dom: D) -> Self {
		Self::with_config(dom, Config::default())
	}

	#[must_use]
	pub fn with_config(dom: D, config: Config) -> Self {
		Self {
			dom,
			config,
			protos: HashMap::new(),
		}
	}

	#[must_use]
	pub fn dom(&self) -> &D {
		&self.dom
	}

	pub fn dom_mut(&mut self) -> &mut D {
		&mut self.dom
	}

	#[must_use]
	pub fn into_dom(self) -> D {
		self.dom
	}

	#[must_use]
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Forgets the template nodes created for [`ElementProto`]s so far, along with the prototypes themselves.
	///
	/// The cache otherwise grows with every distinct prototype for as long as the reconciler lives.
	/// Mounted clones are unaffected, the next mount of a forgotten prototype creates a fresh template.
	pub fn clear_prototypes(&mut self) {
		debug!(count = self.protos.len(), "Clearing prototype cache");
		self.protos.clear();
	}

	/// Creates the DOM for `op` and appends it to `parent`.
	///
	/// # Errors
	///
	/// Iff the DOM backend fails or `op` nests deeper than [`Config::depth_limit`].
	#[instrument(skip_all)]
	pub fn mount(&mut self, parent: &D::Node, op: Option<&Op>, context: &Context) -> Result<Option<StateNode<D::Node>>, Error> {
		let mut at = Cursor::new(parent.clone());
		self.mount_optional(&mut at, op, Env::new(context))
	}

	/// Brings `state` (mounted into `parent`) up to date with `next` and returns the new state.
	///
	/// `move_node` additionally re-inserts every DOM node of the subtree at the end of `parent`.
	/// `single_child` promises that the subtree is the only content of `parent`, which allows removing it by
	/// clearing `parent`.
	///
	/// # Errors
	///
	/// Iff the DOM backend fails or `next` nests deeper than [`Config::depth_limit`].
	/// Both are fatal for the state tree, which is dropped without running unmount callbacks.
	#[instrument(skip_all)]
	pub fn update(
		&mut self,
		parent: &D::Node,
		state: Option<StateNode<D::Node>>,
		next: Option<&Op>,
		context: &Context,
		move_node: bool,
		single_child: bool,
	) -> Result<Option<StateNode<D::Node>>, Error> {
		let mut at = Cursor::new(parent.clone());
		let mut slot = state;
		self.update_at(&mut at, &mut slot, next, Env::new(context), move_node, single_child)?;
		Ok(slot)
	}

	/// Re-renders the invalidated and dirty-checked components of `state` without new input.
	///
	/// # Errors
	///
	/// See [`Reconciler::update`].
	#[instrument(skip_all)]
	pub fn dirty_check(&mut self, parent: &D::Node, state: &mut StateNode<D::Node>, context: &Context, move_node: bool, single_child: bool) -> Result<(), Error> {
		let mut at = Cursor::new(parent.clone());
		self.dirty_check_at(&mut at, state, Env::new(context), move_node, single_child)
	}

	/// Removes the DOM of `state` from `parent`, then runs the unmount callbacks below it.
	///
	/// # Errors
	///
	/// Iff the DOM backend fails, in which case no callbacks run.
	#[instrument(skip_all)]
	pub fn unmount(&mut self, parent: &D::Node, mut state: StateNode<D::Node>, single_child: bool) -> Result<(), Error> {
		self.unmount_node(parent, &mut state, single_child, UnmountReason::Removed)
	}
}
