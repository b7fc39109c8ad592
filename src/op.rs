//! The immutable operation tree an application hands to each render.
//!
//! An [`Op`] is a reference-counted handle. Reusing a handle (or a clone of it) in the next render tells the
//! reconciler that the subtree is unchanged, which reduces its work to a dirty check.

use crate::{
	attributes::Attributes,
	component::{ComponentDescriptor, StatelessDescriptor},
	context::Context,
	Error,
};
use core::{
	any::Any,
	cell::RefCell,
	fmt::{self, Debug, Display, Formatter},
};
use hashbrown::HashSet;
use std::{borrow::Cow, rc::Rc};

#[derive(Clone)]
pub struct Op(Rc<OpKind>);

pub enum OpKind {
	Text(Text),
	Element(ElementOp),
	Component(ComponentOp),
	Stateless(StatelessOp),
	Fragment(Vec<Option<Op>>),
	Keyed(Vec<KeyedEntry>),
	Events(EventsOp),
	Ref(RefOp),
	Context(ContextOp),
}

impl Op {
	#[must_use]
	pub fn new(kind: OpKind) -> Self {
		Self(Rc::new(kind))
	}

	#[must_use]
	pub fn kind(&self) -> &OpKind {
		&self.0
	}

	/// Whether both handles refer to the same operation.
	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	#[must_use]
	pub fn text(text: impl Into<Text>) -> Self {
		Self::new(OpKind::Text(text.into()))
	}

	#[must_use]
	pub fn fragment<I>(children: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<Option<Op>>,
	{
		Self::new(OpKind::Fragment(children.into_iter().map(Into::into).collect()))
	}

	/// A list whose entries are matched by key instead of by position.
	///
	/// # Errors
	///
	/// [`Error::DuplicateKey`] if any key occurs more than once.
	pub fn keyed<I, K, O>(entries: I) -> Result<Self, Error>
	where
		I: IntoIterator<Item = (K, O)>,
		K: Into<Key>,
		O: Into<Option<Op>>,
	{
		let entries: Vec<KeyedEntry> = entries
			.into_iter()
			.map(|(key, op)| KeyedEntry {
				key: key.into(),
				op: op.into(),
			})
			.collect();

		if let Some(duplicate) = first_duplicate(&entries) {
			return Err(Error::DuplicateKey(duplicate.clone()));
		}
		Ok(Self::new(OpKind::Keyed(entries)))
	}

	/// Attaches event handlers to the subtree. Dispatching them is up to the application's event system.
	#[must_use]
	pub fn events(handlers: impl IntoIterator<Item = EventHandler>, child: impl Into<Option<Op>>) -> Self {
		Self::new(OpKind::Events(EventsOp {
			handlers: handlers.into_iter().collect(),
			child: child.into(),
		}))
	}

	/// Writes the first DOM node of `child` into `cell` after every pass that visits it.
	#[must_use]
	pub fn node_ref(cell: NodeRef, child: impl Into<Option<Op>>) -> Self {
		Self::new(OpKind::Ref(RefOp { cell, child: child.into() }))
	}

	/// Provides `value` to every component below, layered over the context this operation is rendered in.
	///
	/// `value` is compared by identity, so keep reusing the same [`Context`] while it doesn't change.
	#[must_use]
	pub fn context(value: Context, child: impl Into<Option<Op>>) -> Self {
		Self::new(OpKind::Context(ContextOp { value, child: child.into() }))
	}

	/// Whether a state node mounted from `self` can be patched to `other` instead of being replaced.
	pub(crate) fn same_kind(&self, other: &Self) -> bool {
		match (self.kind(), other.kind()) {
			(OpKind::Text(_), OpKind::Text(_))
			| (OpKind::Fragment(_), OpKind::Fragment(_))
			| (OpKind::Keyed(_), OpKind::Keyed(_))
			| (OpKind::Events(_), OpKind::Events(_))
			| (OpKind::Ref(_), OpKind::Ref(_))
			| (OpKind::Context(_), OpKind::Context(_)) => true,
			(OpKind::Element(a), OpKind::Element(b)) => a.ty == b.ty,
			(OpKind::Component(a), OpKind::Component(b)) => Rc::ptr_eq(&a.descriptor, &b.descriptor),
			(OpKind::Stateless(a), OpKind::Stateless(b)) => Rc::ptr_eq(&a.descriptor, &b.descriptor),
			_ => false,
		}
	}
}

impl From<ElementOp> for Op {
	fn from(element: ElementOp) -> Self {
		Self::new(OpKind::Element(element))
	}
}

impl From<Text> for Op {
	fn from(text: Text) -> Self {
		Self::text(text)
	}
}

impl Debug for Op {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self.kind() {
			OpKind::Text(text) => {
				if cfg!(feature = "dangerous-logging") {
					f.debug_tuple("Text").field(text).finish()
				} else {
					f.write_str("Text")
				}
			}
			OpKind::Element(element) => element.fmt(f),
			OpKind::Component(component) => f.debug_tuple("Component").field(&component.descriptor.name()).finish(),
			OpKind::Stateless(component) => f.debug_tuple("Stateless").field(&component.descriptor.name()).finish(),
			OpKind::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
			OpKind::Keyed(entries) => f.debug_tuple("Keyed").field(entries).finish(),
			OpKind::Events(events) => f.debug_struct("Events").field("handlers", &events.handlers.len()).field("child", &events.child).finish(),
			OpKind::Ref(node_ref) => f.debug_tuple("Ref").field(&node_ref.child).finish(),
			OpKind::Context(context) => f.debug_struct("Context").field("value", &context.value).field("child", &context.child).finish(),
		}
	}
}

/// Text content. Compared by value, so the same text may be rebuilt for every render.
#[derive(Debug, Clone, PartialEq)]
pub enum Text {
	Str(Rc<str>),
	Number(f64),
}

impl Display for Text {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Text::Str(text) => f.write_str(text),
			Text::Number(number) => Display::fmt(number, f),
		}
	}
}

impl From<&str> for Text {
	fn from(text: &str) -> Self {
		Self::Str(text.into())
	}
}

impl From<String> for Text {
	fn from(text: String) -> Self {
		Self::Str(text.into())
	}
}

impl From<Rc<str>> for Text {
	fn from(text: Rc<str>) -> Self {
		Self::Str(text)
	}
}

impl From<f64> for Text {
	fn from(number: f64) -> Self {
		Self::Number(number)
	}
}

impl From<i32> for Text {
	fn from(number: i32) -> Self {
		Self::Number(number.into())
	}
}

impl From<u32> for Text {
	fn from(number: u32) -> Self {
		Self::Number(number.into())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
	Int(i64),
	Str(Rc<str>),
}

impl Display for Key {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Key::Int(key) => Display::fmt(key, f),
			Key::Str(key) => Debug::fmt(key, f),
		}
	}
}

impl From<i64> for Key {
	fn from(key: i64) -> Self {
		Self::Int(key)
	}
}

impl From<i32> for Key {
	fn from(key: i32) -> Self {
		Self::Int(key.into())
	}
}

impl From<u32> for Key {
	fn from(key: u32) -> Self {
		Self::Int(key.into())
	}
}

impl From<&str> for Key {
	fn from(key: &str) -> Self {
		Self::Str(key.into())
	}
}

impl From<String> for Key {
	fn from(key: String) -> Self {
		Self::Str(key.into())
	}
}

#[derive(Debug, Clone)]
pub struct KeyedEntry {
	pub key: Key,
	pub op: Option<Op>,
}

fn first_duplicate(entries: &[KeyedEntry]) -> Option<&Key> {
	let mut seen = HashSet::with_capacity(entries.len());
	entries.iter().map(|entry| &entry.key).find(|&key| !seen.insert(key))
}

/// What kind of element to create.
///
/// Plain tags compare by name, prototypes by identity.
#[derive(Debug, Clone)]
pub enum ElementType {
	Html(Cow<'static, str>),
	Svg(Cow<'static, str>),
	Proto(Rc<ElementProto>),
}

impl ElementType {
	#[must_use]
	pub fn tag(&self) -> &str {
		match self {
			ElementType::Html(tag) | ElementType::Svg(tag) => tag,
			ElementType::Proto(proto) => proto.template.ty.tag(),
		}
	}

	#[must_use]
	pub fn is_svg(&self) -> bool {
		match self {
			ElementType::Html(_) => false,
			ElementType::Svg(_) => true,
			ElementType::Proto(proto) => proto.template.ty.is_svg(),
		}
	}
}

impl PartialEq for ElementType {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(ElementType::Html(a), ElementType::Html(b)) | (ElementType::Svg(a), ElementType::Svg(b)) => a == b,
			(ElementType::Proto(a), ElementType::Proto(b)) => Rc::ptr_eq(a, b),
			_ => false,
		}
	}
}

/// An element whose DOM node is created once per reconciler and then cloned for every mount.
///
/// Only the template's type, class name and attributes are used, its children are ignored.
/// Each reconciler that mounted a prototype keeps it (and its template node) alive until
/// [`Reconciler::clear_prototypes`](`crate::Reconciler::clear_prototypes`).
#[derive(Debug)]
pub struct ElementProto {
	pub(crate) template: ElementOp,
}

impl ElementProto {
	#[must_use]
	pub fn new(template: ElementOp) -> ElementType {
		ElementType::Proto(Rc::new(Self { template }))
	}
}

#[derive(Debug, Clone)]
pub struct ElementOp {
	pub ty: ElementType,
	/// [`None`] and `""` both mean "no class".
	pub class_name: Option<Cow<'static, str>>,
	pub attributes: Option<Rc<Attributes>>,
	pub children: Option<Op>,
}

impl ElementOp {
	#[must_use]
	pub fn new(ty: ElementType) -> Self {
		Self {
			ty,
			class_name: None,
			attributes: None,
			children: None,
		}
	}

	#[must_use]
	pub fn class(mut self, class_name: impl Into<Cow<'static, str>>) -> Self {
		self.class_name = Some(class_name.into());
		self
	}

	#[must_use]
	pub fn attributes(mut self, attributes: impl Into<Rc<Attributes>>) -> Self {
		self.attributes = Some(attributes.into());
		self
	}

	#[must_use]
	pub fn children(mut self, children: impl Into<Option<Op>>) -> Self {
		self.children = children.into();
		self
	}

	pub(crate) fn class_str(&self) -> &str {
		self.class_name.as_deref().unwrap_or("")
	}
}

/// Shorthand for an [`ElementOp`] of an HTML element.
#[must_use]
pub fn html(tag: impl Into<Cow<'static, str>>) -> ElementOp {
	ElementOp::new(ElementType::Html(tag.into()))
}

/// Shorthand for an [`ElementOp`] of an SVG element.
#[must_use]
pub fn svg(tag: impl Into<Cow<'static, str>>) -> ElementOp {
	ElementOp::new(ElementType::Svg(tag.into()))
}

pub struct ComponentOp {
	pub(crate) descriptor: Rc<ComponentDescriptor>,
	pub(crate) props: Rc<dyn Any>,
}

pub struct StatelessOp {
	pub(crate) descriptor: Rc<StatelessDescriptor>,
	pub(crate) props: Rc<dyn Any>,
}

/// Props are compared by identity: the same [`Rc`] means "unchanged".
pub(crate) fn props_eq(a: &Rc<dyn Any>, b: &Rc<dyn Any>) -> bool {
	Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

pub struct EventsOp {
	pub handlers: Rc<[EventHandler]>,
	pub child: Option<Op>,
}

/// An event name and its callback. The event value's type is up to the dispatcher.
#[derive(Clone)]
pub struct EventHandler {
	pub event: Cow<'static, str>,
	callback: Rc<dyn Fn(&dyn Any)>,
}

impl EventHandler {
	#[must_use]
	pub fn new(event: impl Into<Cow<'static, str>>, callback: impl Fn(&dyn Any) + 'static) -> Self {
		Self {
			event: event.into(),
			callback: Rc::new(callback),
		}
	}

	pub fn call(&self, event: &dyn Any) {
		(self.callback)(event)
	}
}

impl Debug for EventHandler {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventHandler").field("event", &self.event).finish_non_exhaustive()
	}
}

pub struct RefOp {
	pub cell: NodeRef,
	pub child: Option<Op>,
}

/// Receives the first DOM node of a subtree. Cleared when the subtree is unmounted.
#[derive(Clone, Default)]
pub struct NodeRef(Rc<RefCell<Option<Box<dyn Any>>>>);

impl NodeRef {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The current node, if it is a `N`.
	#[must_use]
	pub fn get<N: Clone + 'static>(&self) -> Option<N> {
		self.0.borrow().as_ref().and_then(|node| node.downcast_ref::<N>()).cloned()
	}

	#[must_use]
	pub fn is_set(&self) -> bool {
		self.0.borrow().is_some()
	}

	pub(crate) fn set<N: 'static>(&self, node: Option<N>) {
		*self.0.borrow_mut() = node.map(|node| Box::new(node) as Box<dyn Any>);
	}

	pub(crate) fn clear(&self) {
		self.0.borrow_mut().take();
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Debug for NodeRef {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("NodeRef").field(&self.is_set()).finish()
	}
}

pub struct ContextOp {
	pub value: Context,
	pub child: Option<Op>,
}
