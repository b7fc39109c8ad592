use super::Reconciler;
use crate::{
	component::UnmountReason,
	dom::Dom,
	flags::NodeFlags,
	state::{StateKind, StateNode},
	Error,
};
use tracing::{trace, trace_span};

impl<D: Dom> Reconciler<D> {
	/// Removes the DOM of `state`, then runs its unmount side effects.
	pub(crate) fn unmount_node(&mut self, parent: &D::Node, state: &mut StateNode<D::Node>, single_child: bool, reason: UnmountReason) -> Result<(), Error> {
		let span = trace_span!("Unmounting", ?reason, single_child);
		let _enter = span.enter();

		self.remove_dom(parent, state, single_child)?;
		run_unmount_hooks(state, reason);
		Ok(())
	}

	/// [`Reconciler::unmount_node`] for all entries of a fragment or keyed list. Leaves `children` empty.
	pub(crate) fn unmount_children(&mut self, parent: &D::Node, children: &mut Vec<Option<StateNode<D::Node>>>, single_child: bool, reason: UnmountReason) -> Result<(), Error> {
		let span = trace_span!("Unmounting list", "children.len()" = children.len(), ?reason, single_child);
		let _enter = span.enter();

		if single_child {
			self.dom.clear_children(parent)?;
		} else {
			for child in children.iter().flatten() {
				self.remove_dom(parent, child, false)?;
			}
		}
		for child in children.iter_mut().flatten() {
			run_unmount_hooks(child, reason);
		}
		children.clear();
		Ok(())
	}

	fn remove_dom(&mut self, parent: &D::Node, state: &StateNode<D::Node>, single_child: bool) -> Result<(), Error> {
		match &state.kind {
			StateKind::Text(node) | StateKind::Element { node, .. } => self.dom.remove_child(parent, node),
			StateKind::Fragment(children) | StateKind::Keyed(children) => {
				if single_child {
					trace!("Clearing parent");
					self.dom.clear_children(parent)
				} else {
					for child in children.iter().flatten() {
						self.remove_dom(parent, child, false)?;
					}
					Ok(())
				}
			}
			StateKind::Component { child, .. }
			| StateKind::Stateless { child }
			| StateKind::Events { child, .. }
			| StateKind::Ref { child, .. }
			| StateKind::Context { child, .. } => match child {
				Some(child) => self.remove_dom(parent, child, single_child),
				None => Ok(()),
			},
		}
	}
}

/// Runs unmount callbacks and clears refs, descendants first. Subtrees without [`NodeFlags::DEEP_UNMOUNT`] are skipped.
fn run_unmount_hooks<N>(state: &mut StateNode<N>, reason: UnmountReason) {
	if state.flags.contains(NodeFlags::DEEP_UNMOUNT) {
		for child in state.children_mut() {
			run_unmount_hooks(child, reason);
		}
	}
	if state.flags.contains(NodeFlags::UNMOUNT) {
		match &mut state.kind {
			StateKind::Component { instance, .. } => {
				trace!(name = instance.name(), "Running unmount callbacks");
				instance.run_unmount(reason);
			}
			StateKind::Ref { cell, .. } => cell.clear(),
			_ => (),
		}
	}
}
