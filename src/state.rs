//! The mirror of the last rendered operation tree, holding DOM node handles and component instances.

use crate::{component::ComponentInstance, context::Context, flags::NodeFlags, op::EventHandler, op::NodeRef, op::Op};
use std::rc::Rc;

/// One node of the state tree. `N` is the DOM backend's node handle.
#[derive(Debug)]
pub struct StateNode<N> {
	pub(crate) flags: NodeFlags,
	pub(crate) op: Op,
	pub(crate) kind: StateKind<N>,
}

#[derive(Debug)]
pub enum StateKind<N> {
	Text(N),
	Element { node: N, children: Option<Box<StateNode<N>>> },
	Component { instance: Box<ComponentInstance>, child: Option<Box<StateNode<N>>> },
	Stateless { child: Option<Box<StateNode<N>>> },
	/// Entries are [`None`] where the operation was [`None`].
	Fragment(Vec<Option<StateNode<N>>>),
	Keyed(Vec<Option<StateNode<N>>>),
	Events { handlers: Rc<[EventHandler]>, child: Option<Box<StateNode<N>>> },
	Ref { cell: NodeRef, child: Option<Box<StateNode<N>>> },
	/// `context` is the merged context the child was last rendered with.
	Context { context: Context, child: Option<Box<StateNode<N>>> },
}

impl<N> StateNode<N> {
	pub(crate) fn new(own_flags: NodeFlags, op: Op, kind: StateKind<N>) -> Self {
		let mut node = Self { flags: own_flags.own(), op, kind };
		node.refresh_deep_flags();
		node
	}

	#[must_use]
	pub fn flags(&self) -> NodeFlags {
		self.flags
	}

	/// The operation this node was last rendered from.
	#[must_use]
	pub fn op(&self) -> &Op {
		&self.op
	}

	#[must_use]
	pub fn kind(&self) -> &StateKind<N> {
		&self.kind
	}

	/// The first DOM node of this subtree in document order, if it has any.
	#[must_use]
	pub fn dom_node(&self) -> Option<&N> {
		match &self.kind {
			StateKind::Text(node) | StateKind::Element { node, .. } => Some(node),
			StateKind::Fragment(children) | StateKind::Keyed(children) => children.iter().flatten().find_map(StateNode::dom_node),
			StateKind::Component { child, .. }
			| StateKind::Stateless { child }
			| StateKind::Events { child, .. }
			| StateKind::Ref { child, .. }
			| StateKind::Context { child, .. } => child.as_deref().and_then(StateNode::dom_node),
		}
	}

	/// Event handlers attached to this node, for event dispatchers walking the state tree.
	#[must_use]
	pub fn event_handlers(&self) -> Option<&[EventHandler]> {
		match &self.kind {
			StateKind::Events { handlers, .. } => Some(&handlers[..]),
			_ => None,
		}
	}

	/// Direct children in document order.
	pub fn children(&self) -> impl Iterator<Item = &StateNode<N>> {
		let (single, many): (Option<&StateNode<N>>, &[Option<StateNode<N>>]) = match &self.kind {
			StateKind::Text(_) => (None, &[][..]),
			StateKind::Fragment(children) | StateKind::Keyed(children) => (None, &children[..]),
			StateKind::Element { children: child, .. }
			| StateKind::Component { child, .. }
			| StateKind::Stateless { child }
			| StateKind::Events { child, .. }
			| StateKind::Ref { child, .. }
			| StateKind::Context { child, .. } => (child.as_deref(), &[][..]),
		};
		single.into_iter().chain(many.iter().flatten())
	}

	pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut StateNode<N>> {
		let (single, many): (Option<&mut StateNode<N>>, &mut [Option<StateNode<N>>]) = match &mut self.kind {
			StateKind::Text(_) => (None, &mut [][..]),
			StateKind::Fragment(children) | StateKind::Keyed(children) => (None, &mut children[..]),
			StateKind::Element { children: child, .. }
			| StateKind::Component { child, .. }
			| StateKind::Stateless { child }
			| StateKind::Events { child, .. }
			| StateKind::Ref { child, .. }
			| StateKind::Context { child, .. } => (child.as_deref_mut(), &mut [][..]),
		};
		single.into_iter().chain(many.iter_mut().flatten())
	}

	/// Replaces the deep flags with the union of the children's propagated flags.
	pub(crate) fn refresh_deep_flags(&mut self) {
		let mut flags = self.flags.own();
		for child in self.children() {
			flags |= child.flags.propagated();
		}
		self.flags = flags;
	}
}
