use super::{Cursor, Env, Reconciler};
use crate::{
	attributes::update_attributes,
	component::UnmountReason,
	dom::Dom,
	flags::NodeFlags,
	op::{props_eq, ElementOp, Op, OpKind},
	state::{StateKind, StateNode},
	Error,
};
use std::rc::Rc;
use tracing::{debug, trace, trace_span};

impl<D: Dom> Reconciler<D> {
	/// Updates, mounts, replaces or unmounts the content of `slot` so that it matches `next`.
	#[allow(clippy::too_many_arguments)]
	pub(crate) fn update_at(
		&mut self,
		at: &mut Cursor<D::Node>,
		slot: &mut Option<StateNode<D::Node>>,
		next: Option<&Op>,
		env: Env<'_>,
		move_node: bool,
		single_child: bool,
	) -> Result<(), Error> {
		if let (Some(state), Some(next)) = (slot.as_mut(), next) {
			if self.patch(at, state, next, env, move_node, single_child)? {
				return Ok(());
			}
		}
		self.replace(at, slot, next, env, single_child)
	}

	/// [`Reconciler::update_at`] for boxed children, reusing the allocation when the node is patched in place.
	#[allow(clippy::too_many_arguments)]
	pub(crate) fn update_child(
		&mut self,
		at: &mut Cursor<D::Node>,
		child: &mut Option<Box<StateNode<D::Node>>>,
		next: Option<&Op>,
		env: Env<'_>,
		move_node: bool,
		single_child: bool,
	) -> Result<(), Error> {
		if let (Some(state), Some(next)) = (child.as_deref_mut(), next) {
			if self.patch(at, state, next, env, move_node, single_child)? {
				return Ok(());
			}
		}
		let mut slot = child.take().map(|state| *state);
		self.replace(at, &mut slot, next, env, single_child)?;
		*child = slot.map(Box::new);
		Ok(())
	}

	/// Everything [`Reconciler::patch`] can't do in place.
	fn replace(&mut self, at: &mut Cursor<D::Node>, slot: &mut Option<StateNode<D::Node>>, next: Option<&Op>, env: Env<'_>, single_child: bool) -> Result<(), Error> {
		match (slot.take(), next) {
			(None, None) => Ok(()),
			(Some(mut state), None) => self.unmount_node(&at.parent, &mut state, single_child, UnmountReason::Removed),
			(None, Some(next)) => {
				*slot = Some(self.mount_at(at, next, env)?);
				Ok(())
			}
			(Some(mut state), Some(next)) => {
				debug!(prev = ?state.op, ?next, "Replacing node of different kind");
				match &state.kind {
					// Text nodes never have unmount side effects.
					StateKind::Text(node) => self.dom.remove_child(&at.parent, node)?,
					_ => self.unmount_node(&at.parent, &mut state, single_child, UnmountReason::Replaced)?,
				}
				*slot = Some(self.mount_at(at, next, env)?);
				Ok(())
			}
		}
	}

	/// Updates `state` in place. Returns `false` without doing anything if `next` is of a different kind.
	#[allow(clippy::too_many_arguments)]
	fn patch(&mut self, at: &mut Cursor<D::Node>, state: &mut StateNode<D::Node>, next: &Op, env: Env<'_>, move_node: bool, single_child: bool) -> Result<bool, Error> {
		let env = env.enter(&self.config)?;

		if state.op.ptr_eq(next) {
			self.dirty_check_entered(at, state, env, move_node, single_child)?;
			return Ok(true);
		}

		if let StateKind::Text(node) = &state.kind {
			let text = match next.kind() {
				OpKind::Text(text) => text,
				_ => return Ok(false),
			};
			let span = trace_span!("Diffing text");
			let _enter = span.enter();

			if !matches!(state.op.kind(), OpKind::Text(prev) if prev == text) {
				if cfg!(feature = "dangerous-logging") {
					trace!(%text, "Updating text");
				}
				self.dom.set_text(node, &text.to_string())?;
			}
			if move_node {
				self.dom.insert_before(&at.parent, node, at.next.as_ref())?;
			}
			at.next = Some(node.clone());
			state.op = next.clone();
			return Ok(true);
		}

		if !state.op.same_kind(next) {
			return Ok(false);
		}

		let prev = core::mem::replace(&mut state.op, next.clone());
		match (prev.kind(), next.kind()) {
			(OpKind::Component(a), OpKind::Component(b)) => {
				let span = trace_span!("Diffing component", name = b.descriptor.name());
				let _enter = span.enter();

				if let StateKind::Component { instance, .. } = &mut state.kind {
					if instance.take_invalidated() {
						state.flags.insert(NodeFlags::DIRTY);
					}
				}
				if state.flags.contains(NodeFlags::DIRTY) || (!props_eq(&a.props, &b.props) && b.descriptor.should_update(&*a.props, &*b.props)) {
					self.render_component(at, state, env, move_node, single_child)?;
				} else {
					trace!("Props unchanged or update declined");
					self.dirty_check_entered(at, state, env, move_node, single_child)?;
				}
				return Ok(true);
			}

			(OpKind::Stateless(a), OpKind::Stateless(b)) => {
				let span = trace_span!("Diffing stateless component", name = b.descriptor.name());
				let _enter = span.enter();

				if !props_eq(&a.props, &b.props) && b.descriptor.should_update(&*a.props, &*b.props) {
					self.render_component(at, state, env, move_node, single_child)?;
				} else {
					trace!("Props unchanged or update declined");
					self.dirty_check_entered(at, state, env, move_node, single_child)?;
				}
				return Ok(true);
			}

			_ => (),
		}

		match (prev.kind(), next.kind(), &mut state.kind) {
			(OpKind::Element(a), OpKind::Element(b), StateKind::Element { node, children }) => {
				let span = trace_span!("Diffing element", tag = b.ty.tag());
				let _enter = span.enter();
				self.update_element(at, node, children, a, b, env, move_node)?;
			}

			(OpKind::Fragment(_), OpKind::Fragment(b), StateKind::Fragment(children)) => {
				let span = trace_span!("Diffing fragment", "children.len()" = children.len(), "b.len()" = b.len());
				let _enter = span.enter();

				if children.len() == b.len() {
					for (child, op) in children.iter_mut().zip(b).rev() {
						self.update_at(at, child, op.as_ref(), env, move_node, false)?;
					}
				} else {
					debug!("Fragment length changed, remounting all entries");
					self.unmount_children(&at.parent, children, single_child, UnmountReason::Replaced)?;
					*children = self.mount_entries(at, &b[..], Option::as_ref, env)?;
				}
			}

			(OpKind::Keyed(a), OpKind::Keyed(b), StateKind::Keyed(children)) => {
				self.update_keyed(at, children, a, b, env, move_node, single_child)?;
			}

			(OpKind::Events(_), OpKind::Events(b), StateKind::Events { handlers, child }) => {
				*handlers = b.handlers.clone();
				self.update_child(at, child, b.child.as_ref(), env, move_node, single_child)?;
			}

			(OpKind::Ref(a), OpKind::Ref(b), StateKind::Ref { cell, child }) => {
				self.update_child(at, child, b.child.as_ref(), env, move_node, single_child)?;
				if !a.cell.ptr_eq(&b.cell) {
					a.cell.clear();
					*cell = b.cell.clone();
				}
				cell.set(child.as_deref().and_then(StateNode::dom_node).cloned());
			}

			(OpKind::Context(a), OpKind::Context(b), StateKind::Context { context, child }) => {
				let dirty_context = env.dirty_context || !a.value.ptr_eq(&b.value);
				if dirty_context {
					trace!("Context changed");
					*context = env.context.merge(&b.value);
				}
				let env = Env {
					context: &*context,
					dirty_context,
					..env
				};
				self.update_child(at, child, b.child.as_ref(), env, move_node, single_child)?;
			}

			_ => unreachable!("state node kind doesn't match its operation"),
		}

		state.refresh_deep_flags();
		Ok(true)
	}

	#[allow(clippy::too_many_arguments)]
	fn update_element(
		&mut self,
		at: &mut Cursor<D::Node>,
		node: &D::Node,
		children: &mut Option<Box<StateNode<D::Node>>>,
		a: &ElementOp,
		b: &ElementOp,
		env: Env<'_>,
		move_node: bool,
	) -> Result<(), Error> {
		if move_node {
			self.dom.insert_before(&at.parent, node, at.next.as_ref())?;
		}

		if a.class_str() != b.class_str() {
			self.dom.set_class_name(node, b.class_str(), b.ty.is_svg())?;
		}

		let same_attributes = match (&a.attributes, &b.attributes) {
			(Some(a), Some(b)) => Rc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		};
		if !same_attributes {
			update_attributes(&mut self.dom, node, a.attributes.as_deref(), b.attributes.as_deref())?;
		}

		let mut inner = Cursor::new(node.clone());
		match (&a.children, &b.children) {
			(None, None) => (),
			(Some(a), Some(b)) if a.ptr_eq(b) => {
				if let Some(children) = children.as_deref_mut() {
					if children.flags.propagated().contains(NodeFlags::DEEP_DIRTY_CHECK) {
						self.dirty_check_at(&mut inner, children, env, false, true)?;
					}
				}
			}
			(_, next) => self.update_child(&mut inner, children, next.as_ref(), env, false, true)?,
		}

		at.next = Some(node.clone());
		Ok(())
	}

	/// Re-renders a (stateful or stateless) component with the props of its current operation.
	pub(crate) fn render_component(&mut self, at: &mut Cursor<D::Node>, state: &mut StateNode<D::Node>, env: Env<'_>, move_node: bool, single_child: bool) -> Result<(), Error> {
		let (rendered, child) = match (state.op.kind(), &mut state.kind) {
			(OpKind::Component(op), StateKind::Component { instance, child }) => (instance.render(&*op.props), child),
			(OpKind::Stateless(op), StateKind::Stateless { child }) => (op.descriptor.render(&*op.props), child),
			_ => unreachable!("`render_component` called on a non-component"),
		};
		trace!("Rendered component");
		self.update_child(at, child, rendered.as_ref(), env, move_node, single_child)?;
		state.flags.remove(NodeFlags::DIRTY);
		state.refresh_deep_flags();
		Ok(())
	}
}
