use super::{Cursor, Env, Reconciler};
use crate::{
	attributes::update_attributes,
	dom::Dom,
	flags::NodeFlags,
	op::{ElementOp, ElementProto, ElementType, Op, OpKind},
	state::{StateKind, StateNode},
	Error,
};
use core::iter;
use std::rc::Rc;
use tracing::{trace, trace_span};

impl<D: Dom> Reconciler<D> {
	/// Creates the DOM for `op` and inserts it before the cursor, which then points at its first DOM node.
	pub(crate) fn mount_at(&mut self, at: &mut Cursor<D::Node>, op: &Op, env: Env<'_>) -> Result<StateNode<D::Node>, Error> {
		let env = env.enter(&self.config)?;
		match op.kind() {
			OpKind::Text(text) => {
				let span = trace_span!("Mounting text");
				let _enter = span.enter();
				if cfg!(feature = "dangerous-logging") {
					trace!(%text);
				}

				let node = self.dom.create_text(&text.to_string())?;
				self.dom.insert_before(&at.parent, &node, at.next.as_ref())?;
				at.next = Some(node.clone());
				Ok(StateNode::new(NodeFlags::empty(), op.clone(), StateKind::Text(node)))
			}

			OpKind::Element(element) => {
				let span = trace_span!("Mounting element", tag = element.ty.tag());
				let _enter = span.enter();

				let node = self.create_element(element)?;
				let children = match &element.children {
					Some(children) => {
						let mut inner = Cursor::new(node.clone());
						Some(Box::new(self.mount_at(&mut inner, children, env)?))
					}
					None => None,
				};
				self.dom.insert_before(&at.parent, &node, at.next.as_ref())?;
				at.next = Some(node.clone());
				Ok(StateNode::new(NodeFlags::empty(), op.clone(), StateKind::Element { node, children }))
			}

			OpKind::Component(component) => {
				let span = trace_span!("Mounting component", name = component.descriptor.name());
				let _enter = span.enter();

				let mut instance = Box::new(component.descriptor.instantiate(env.context));
				let rendered = instance.render(&*component.props);
				let child = self.mount_boxed(at, rendered.as_ref(), env)?;
				Ok(StateNode::new(instance.flags(), op.clone(), StateKind::Component { instance, child }))
			}

			OpKind::Stateless(component) => {
				let span = trace_span!("Mounting stateless component", name = component.descriptor.name());
				let _enter = span.enter();

				let rendered = component.descriptor.render(&*component.props);
				let child = self.mount_boxed(at, rendered.as_ref(), env)?;
				Ok(StateNode::new(NodeFlags::empty(), op.clone(), StateKind::Stateless { child }))
			}

			OpKind::Fragment(children) => {
				let span = trace_span!("Mounting fragment", "children.len()" = children.len());
				let _enter = span.enter();

				let children = self.mount_entries(at, &children[..], Option::as_ref, env)?;
				Ok(StateNode::new(NodeFlags::empty(), op.clone(), StateKind::Fragment(children)))
			}

			OpKind::Keyed(entries) => {
				let span = trace_span!("Mounting keyed", "entries.len()" = entries.len());
				let _enter = span.enter();

				let children = self.mount_entries(at, &entries[..], |entry| entry.op.as_ref(), env)?;
				Ok(StateNode::new(NodeFlags::empty(), op.clone(), StateKind::Keyed(children)))
			}

			OpKind::Events(events) => {
				let child = self.mount_boxed(at, events.child.as_ref(), env)?;
				Ok(StateNode::new(
					NodeFlags::empty(),
					op.clone(),
					StateKind::Events {
						handlers: events.handlers.clone(),
						child,
					},
				))
			}

			OpKind::Ref(node_ref) => {
				let child = self.mount_boxed(at, node_ref.child.as_ref(), env)?;
				node_ref.cell.set(child.as_deref().and_then(StateNode::dom_node).cloned());
				Ok(StateNode::new(
					NodeFlags::UNMOUNT,
					op.clone(),
					StateKind::Ref {
						cell: node_ref.cell.clone(),
						child,
					},
				))
			}

			OpKind::Context(provider) => {
				let context = env.context.merge(&provider.value);
				let child = self.mount_boxed(at, provider.child.as_ref(), Env { context: &context, ..env })?;
				Ok(StateNode::new(NodeFlags::empty(), op.clone(), StateKind::Context { context, child }))
			}
		}
	}

	pub(crate) fn mount_optional(&mut self, at: &mut Cursor<D::Node>, op: Option<&Op>, env: Env<'_>) -> Result<Option<StateNode<D::Node>>, Error> {
		op.map(|op| self.mount_at(at, op, env)).transpose()
	}

	pub(crate) fn mount_boxed(&mut self, at: &mut Cursor<D::Node>, op: Option<&Op>, env: Env<'_>) -> Result<Option<Box<StateNode<D::Node>>>, Error> {
		Ok(self.mount_optional(at, op, env)?.map(Box::new))
	}

	/// Mounts a list right to left, so that the entries end up in order before the cursor.
	pub(crate) fn mount_entries<T>(
		&mut self,
		at: &mut Cursor<D::Node>,
		entries: &[T],
		op_of: impl Fn(&T) -> Option<&Op>,
		env: Env<'_>,
	) -> Result<Vec<Option<StateNode<D::Node>>>, Error> {
		let mut children: Vec<Option<StateNode<D::Node>>> = iter::repeat_with(|| None).take(entries.len()).collect();
		for (slot, entry) in children.iter_mut().zip(entries).rev() {
			*slot = self.mount_optional(at, op_of(entry), env)?;
		}
		Ok(children)
	}

	/// A detached element with the class name and attributes of `element`, but no children.
	pub(crate) fn create_element(&mut self, element: &ElementOp) -> Result<D::Node, Error> {
		let svg = element.ty.is_svg();
		let node = match &element.ty {
			ElementType::Html(tag) => self.dom.create_element(tag, false)?,
			ElementType::Svg(tag) => self.dom.create_element(tag, true)?,
			ElementType::Proto(proto) => {
				let template = self.proto_node(proto)?;
				self.dom.clone_node(&template)?
			}
		};

		let class_name = element.class_str();
		if !class_name.is_empty() {
			self.dom.set_class_name(&node, class_name, svg)?;
		}
		if let Some(attributes) = &element.attributes {
			update_attributes(&mut self.dom, &node, None, Some(attributes))?;
		}
		Ok(node)
	}

	fn proto_node(&mut self, proto: &Rc<ElementProto>) -> Result<D::Node, Error> {
		let key = Rc::as_ptr(proto);
		if let Some((_, node)) = self.protos.get(&key) {
			return Ok(node.clone());
		}

		trace!(tag = proto.template.ty.tag(), "Creating prototype element");
		let node = self.create_element(&proto.template)?;
		self.protos.insert(key, (proto.clone(), node.clone()));
		Ok(node)
	}
}
