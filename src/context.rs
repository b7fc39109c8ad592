use core::{
	any::Any,
	fmt::{self, Debug, Formatter},
};
use hashbrown::HashMap;
use std::{borrow::Cow, rc::Rc};

/// Named values handed down the tree by [`Op::context`](`crate::Op::context`) providers.
///
/// Cloning is cheap. Providers never mutate a [`Context`] they received; [`Context::merge`] creates a new one.
#[derive(Clone, Default)]
pub struct Context(Rc<HashMap<Cow<'static, str>, Rc<dyn Any>>>);

impl Context {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insertion.
	#[must_use]
	pub fn with<T: Any>(mut self, name: impl Into<Cow<'static, str>>, value: T) -> Self {
		Rc::make_mut(&mut self.0).insert(name.into(), Rc::new(value));
		self
	}

	#[must_use]
	pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
		self.0.get(name).and_then(|value| value.downcast_ref())
	}

	#[must_use]
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// `self` with every entry of `over` layered on top.
	#[must_use]
	pub fn merge(&self, over: &Self) -> Self {
		if over.is_empty() {
			return self.clone();
		}
		if self.is_empty() {
			return over.clone();
		}
		let mut merged = (*self.0).clone();
		merged.extend(over.0.iter().map(|(name, value)| (name.clone(), value.clone())));
		Self(Rc::new(merged))
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Debug for Context {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.0.keys()).finish()
	}
}
