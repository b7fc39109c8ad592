use super::{Cursor, Env, Reconciler};
use crate::{
	dom::Dom,
	flags::NodeFlags,
	op::OpKind,
	state::{StateKind, StateNode},
	Error,
};
use tracing::{trace, trace_span};

impl<D: Dom> Reconciler<D> {
	/// Visits `state` without new input: re-renders components that are dirty, invalidated or whose dirty-check
	/// predicate asks for it, and descends only into subtrees that contain such components.
	///
	/// Skipped subtrees still move the cursor onto their first DOM node, or are moved wholesale if `move_node` is set.
	pub(crate) fn dirty_check_at(&mut self, at: &mut Cursor<D::Node>, state: &mut StateNode<D::Node>, env: Env<'_>, move_node: bool, single_child: bool) -> Result<(), Error> {
		let env = env.enter(&self.config)?;
		self.dirty_check_entered(at, state, env, move_node, single_child)
	}

	/// [`Reconciler::dirty_check_at`] with `env` already counting `state` towards the depth limit.
	pub(crate) fn dirty_check_entered(&mut self, at: &mut Cursor<D::Node>, state: &mut StateNode<D::Node>, env: Env<'_>, move_node: bool, single_child: bool) -> Result<(), Error> {
		if let StateKind::Component { instance, .. } = &mut state.kind {
			if instance.take_invalidated() || instance.run_dirty_check(env.context) {
				state.flags.insert(NodeFlags::DIRTY);
			}
		}
		if state.flags.contains(NodeFlags::DIRTY) {
			let span = trace_span!("Re-rendering dirty component");
			let _enter = span.enter();
			return self.render_component(at, state, env, move_node, single_child);
		}

		if !state.flags.contains(NodeFlags::DEEP_DIRTY_CHECK) {
			return self.skip(at, state, move_node);
		}

		match &mut state.kind {
			StateKind::Text(node) => {
				if move_node {
					self.dom.insert_before(&at.parent, node, at.next.as_ref())?;
				}
				at.next = Some(node.clone());
			}

			StateKind::Element { node, children } => {
				if move_node {
					self.dom.insert_before(&at.parent, node, at.next.as_ref())?;
				}
				if let Some(children) = children.as_deref_mut() {
					let mut inner = Cursor::new(node.clone());
					self.dirty_check_at(&mut inner, children, env, false, true)?;
				}
				at.next = Some(node.clone());
			}

			StateKind::Component { child, .. } | StateKind::Stateless { child } | StateKind::Events { child, .. } => {
				if let Some(child) = child.as_deref_mut() {
					self.dirty_check_at(at, child, env, move_node, single_child)?;
				}
			}

			StateKind::Ref { cell, child } => {
				if let Some(child) = child.as_deref_mut() {
					self.dirty_check_at(at, child, env, move_node, single_child)?;
				}
				cell.set(child.as_deref().and_then(StateNode::dom_node).cloned());
			}

			StateKind::Context { context, child } => {
				if env.dirty_context {
					if let OpKind::Context(provider) = state.op.kind() {
						trace!("Re-merging context");
						*context = env.context.merge(&provider.value);
					}
				}
				if let Some(child) = child.as_deref_mut() {
					self.dirty_check_at(at, child, Env { context: &*context, ..env }, move_node, single_child)?;
				}
			}

			StateKind::Fragment(children) | StateKind::Keyed(children) => {
				for child in children.iter_mut().rev().flatten() {
					self.dirty_check_at(at, child, env, move_node, false)?;
				}
			}
		}

		state.refresh_deep_flags();
		Ok(())
	}

	/// Passes over a subtree that doesn't need to be visited.
	fn skip(&mut self, at: &mut Cursor<D::Node>, state: &StateNode<D::Node>, move_node: bool) -> Result<(), Error> {
		if move_node {
			self.move_nodes(at, state)
		} else {
			if let Some(node) = state.dom_node() {
				at.next = Some(node.clone());
			}
			Ok(())
		}
	}

	/// Re-inserts every DOM node of `state` before the cursor, keeping their order.
	pub(crate) fn move_nodes(&mut self, at: &mut Cursor<D::Node>, state: &StateNode<D::Node>) -> Result<(), Error> {
		match &state.kind {
			StateKind::Text(node) | StateKind::Element { node, .. } => {
				self.dom.insert_before(&at.parent, node, at.next.as_ref())?;
				at.next = Some(node.clone());
			}
			StateKind::Fragment(children) | StateKind::Keyed(children) => {
				for child in children.iter().rev().flatten() {
					self.move_nodes(at, child)?;
				}
			}
			StateKind::Component { child, .. }
			| StateKind::Stateless { child }
			| StateKind::Events { child, .. }
			| StateKind::Ref { child, .. }
			| StateKind::Context { child, .. } => {
				if let Some(child) = child {
					self.move_nodes(at, child)?;
				}
			}
		}
		Ok(())
	}
}
