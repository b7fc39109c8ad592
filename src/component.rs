//! Component descriptors and the per-instance hook bundle.
//!
//! A stateful [`Component`] is described by a *setup* closure. It runs once per mount, may register hooks
//! through [`Hooks`] and returns the update closure that turns props into an operation tree.
//! A [`StatelessComponent`] is only a render function.

use crate::{
	context::Context,
	flags::NodeFlags,
	op::{ComponentOp, Op, OpKind, StatelessOp},
};
use core::{
	any::Any,
	cell::Cell,
	fmt::{self, Debug, Formatter},
	marker::PhantomData,
};
use std::{borrow::Cow, rc::Rc};

/// Why an unmount callback runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmountReason {
	/// The component's position is gone.
	Removed,
	/// The position was re-mounted from scratch, either with a different kind of operation or because the
	/// surrounding fragment changed its length.
	Replaced,
}

type Render = Box<dyn FnMut(&dyn Any) -> Option<Op>>;
type Setup = Rc<dyn Fn(&mut Hooks<'_>) -> Render>;
type ShouldUpdate = Rc<dyn Fn(&dyn Any, &dyn Any) -> bool>;

fn typed_props<P: 'static>(props: &dyn Any) -> &P {
	match props.downcast_ref() {
		Some(props) => props,
		None => unreachable!("props don't match the component descriptor they were created with"),
	}
}

pub(crate) struct ComponentDescriptor {
	name: Cow<'static, str>,
	setup: Setup,
	should_update: Option<ShouldUpdate>,
}

impl ComponentDescriptor {
	pub(crate) fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn should_update(&self, prev: &dyn Any, next: &dyn Any) -> bool {
		self.should_update.as_ref().map_or(true, |should_update| should_update(prev, next))
	}
}

/// A stateful component taking props of type `P`.
///
/// The descriptor's identity is the component's type: operations created from clones of the same
/// [`Component`] are patched, operations from different ones replace each other.
pub struct Component<P> {
	descriptor: Rc<ComponentDescriptor>,
	_props: PhantomData<fn(&P)>,
}

impl<P: 'static> Component<P> {
	/// ```
	/// use ivy_dom::{Component, Op};
	///
	/// let greeting = Component::new("Greeting", |_hooks| |name: &String| Some(Op::text(format!("Hello, {}!", name))));
	/// let op = greeting.op(String::from("world"));
	/// ```
	pub fn new<S, R>(name: impl Into<Cow<'static, str>>, setup: S) -> Self
	where
		S: Fn(&mut Hooks<'_>) -> R + 'static,
		R: FnMut(&P) -> Option<Op> + 'static,
	{
		let setup: Setup = Rc::new(move |hooks: &mut Hooks<'_>| -> Render {
			let mut render = setup(hooks);
			Box::new(move |props: &dyn Any| render(typed_props(props)))
		});
		Self {
			descriptor: Rc::new(ComponentDescriptor {
				name: name.into(),
				setup,
				should_update: None,
			}),
			_props: PhantomData,
		}
	}

	/// A new component type that only re-renders on changed props if `should_update(prev, next)` is `true`.
	///
	/// Invalidation and dirty-check predicates still force a re-render.
	#[must_use]
	pub fn with_should_update(&self, should_update: impl Fn(&P, &P) -> bool + 'static) -> Self {
		Self {
			descriptor: Rc::new(ComponentDescriptor {
				name: self.descriptor.name.clone(),
				setup: self.descriptor.setup.clone(),
				should_update: Some(Rc::new(move |prev: &dyn Any, next: &dyn Any| should_update(typed_props(prev), typed_props(next)))),
			}),
			_props: PhantomData,
		}
	}

	/// Pass the same [`Rc`] again to mark the props as unchanged.
	#[must_use]
	pub fn op(&self, props: impl Into<Rc<P>>) -> Op {
		let props: Rc<P> = props.into();
		Op::new(OpKind::Component(ComponentOp {
			descriptor: self.descriptor.clone(),
			props,
		}))
	}
}

impl<P> Clone for Component<P> {
	fn clone(&self) -> Self {
		Self {
			descriptor: self.descriptor.clone(),
			_props: PhantomData,
		}
	}
}

impl<P> Debug for Component<P> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Component").field(&self.descriptor.name).finish()
	}
}

pub(crate) struct StatelessDescriptor {
	name: Cow<'static, str>,
	render: Rc<dyn Fn(&dyn Any) -> Option<Op>>,
	should_update: Option<ShouldUpdate>,
}

impl StatelessDescriptor {
	pub(crate) fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn render(&self, props: &dyn Any) -> Option<Op> {
		(self.render)(props)
	}

	pub(crate) fn should_update(&self, prev: &dyn Any, next: &dyn Any) -> bool {
		self.should_update.as_ref().map_or(true, |should_update| should_update(prev, next))
	}
}

/// A component without instance state: props in, operation tree out.
pub struct StatelessComponent<P> {
	descriptor: Rc<StatelessDescriptor>,
	_props: PhantomData<fn(&P)>,
}

impl<P: 'static> StatelessComponent<P> {
	pub fn new(name: impl Into<Cow<'static, str>>, render: impl Fn(&P) -> Option<Op> + 'static) -> Self {
		Self {
			descriptor: Rc::new(StatelessDescriptor {
				name: name.into(),
				render: Rc::new(move |props: &dyn Any| render(typed_props(props))),
				should_update: None,
			}),
			_props: PhantomData,
		}
	}

	/// See [`Component::with_should_update`].
	#[must_use]
	pub fn with_should_update(&self, should_update: impl Fn(&P, &P) -> bool + 'static) -> Self {
		Self {
			descriptor: Rc::new(StatelessDescriptor {
				name: self.descriptor.name.clone(),
				render: self.descriptor.render.clone(),
				should_update: Some(Rc::new(move |prev: &dyn Any, next: &dyn Any| should_update(typed_props(prev), typed_props(next)))),
			}),
			_props: PhantomData,
		}
	}

	#[must_use]
	pub fn op(&self, props: impl Into<Rc<P>>) -> Op {
		let props: Rc<P> = props.into();
		Op::new(OpKind::Stateless(StatelessOp {
			descriptor: self.descriptor.clone(),
			props,
		}))
	}
}

impl<P> Clone for StatelessComponent<P> {
	fn clone(&self) -> Self {
		Self {
			descriptor: self.descriptor.clone(),
			_props: PhantomData,
		}
	}
}

impl<P> Debug for StatelessComponent<P> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("StatelessComponent").field(&self.descriptor.name).finish()
	}
}

/// Marks a mounted component as dirty. The next render or dirty check re-renders it.
#[derive(Debug, Clone, Default)]
pub struct Invalidator(Rc<Cell<bool>>);

impl Invalidator {
	pub fn invalidate(&self) {
		self.0.set(true)
	}

	#[must_use]
	pub fn is_invalidated(&self) -> bool {
		self.0.get()
	}
}

/// Registration surface for a stateful component's setup closure.
pub struct Hooks<'a> {
	context: &'a Context,
	dirty_check: Option<Box<dyn FnMut(&Context) -> bool>>,
	unmount: Vec<Box<dyn FnMut(UnmountReason)>>,
	invalidator: Option<Invalidator>,
}

impl<'a> Hooks<'a> {
	pub(crate) fn new(context: &'a Context) -> Self {
		Self {
			context,
			dirty_check: None,
			unmount: Vec::new(),
			invalidator: None,
		}
	}

	/// The context the component is mounted in.
	#[must_use]
	pub fn context(&self) -> &Context {
		self.context
	}

	/// Runs during dirty checks. Returning `true` re-renders the component with its current props.
	///
	/// Registering a second predicate replaces the first.
	pub fn dirty_check(&mut self, predicate: impl FnMut(&Context) -> bool + 'static) {
		self.dirty_check = Some(Box::new(predicate));
	}

	/// Runs when the component is unmounted, after the callbacks of its descendants and in registration order.
	pub fn on_unmount(&mut self, callback: impl FnMut(UnmountReason) + 'static) {
		self.unmount.push(Box::new(callback));
	}

	/// All calls return handles to the same flag.
	pub fn invalidator(&mut self) -> Invalidator {
		self.invalidator.get_or_insert_with(Invalidator::default).clone()
	}

	pub(crate) fn into_instance(self, name: Cow<'static, str>, render: Render) -> ComponentInstance {
		ComponentInstance {
			name,
			render,
			dirty_check: self.dirty_check,
			unmount: self.unmount,
			invalidator: self.invalidator,
		}
	}
}

impl ComponentDescriptor {
	pub(crate) fn instantiate(&self, context: &Context) -> ComponentInstance {
		let mut hooks = Hooks::new(context);
		let render = (self.setup)(&mut hooks);
		hooks.into_instance(self.name.clone(), render)
	}
}

/// The state of one mounted stateful component.
pub struct ComponentInstance {
	name: Cow<'static, str>,
	render: Render,
	dirty_check: Option<Box<dyn FnMut(&Context) -> bool>>,
	unmount: Vec<Box<dyn FnMut(UnmountReason)>>,
	invalidator: Option<Invalidator>,
}

impl ComponentInstance {
	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The self flags this instance needs on its state node.
	pub(crate) fn flags(&self) -> NodeFlags {
		let mut flags = NodeFlags::empty();
		if self.dirty_check.is_some() || self.invalidator.is_some() {
			flags |= NodeFlags::DIRTY_CHECK;
		}
		if !self.unmount.is_empty() {
			flags |= NodeFlags::UNMOUNT;
		}
		flags
	}

	pub(crate) fn render(&mut self, props: &dyn Any) -> Option<Op> {
		if let Some(invalidator) = &self.invalidator {
			invalidator.0.set(false);
		}
		(self.render)(props)
	}

	pub(crate) fn take_invalidated(&mut self) -> bool {
		self.invalidator.as_ref().map_or(false, |invalidator| invalidator.0.replace(false))
	}

	pub(crate) fn run_dirty_check(&mut self, context: &Context) -> bool {
		self.dirty_check.as_mut().map_or(false, |dirty_check| dirty_check(context))
	}

	pub(crate) fn run_unmount(&mut self, reason: UnmountReason) {
		for callback in &mut self.unmount {
			callback(reason)
		}
	}
}

impl Debug for ComponentInstance {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ComponentInstance")
			.field("name", &self.name)
			.field("dirty_check", &self.dirty_check.is_some())
			.field("unmount", &self.unmount.len())
			.field("invalidator", &self.invalidator)
			.finish()
	}
}
