//! Element attributes and inline styles, and the key-by-key diff between two sets of them.

use crate::{dom::Dom, Error};
use core::fmt::{self, Display, Formatter};
use std::{borrow::Cow, rc::Rc};
use tracing::{instrument, trace};

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
	Str(Rc<str>),
	Number(f64),
	/// `true` sets an empty attribute, `false` leaves it absent.
	Bool(bool),
	/// Diffed per property instead of as one `style` attribute string.
	Style(Style),
}

impl AttrValue {
	/// The attribute value to write, or [`None`] if the attribute must be absent.
	fn attribute_value(&self) -> Option<Cow<'_, str>> {
		match self {
			AttrValue::Str(value) => Some(Cow::Borrowed(value)),
			AttrValue::Number(value) => Some(Cow::Owned(value.to_string())),
			AttrValue::Bool(true) => Some(Cow::Borrowed("")),
			AttrValue::Bool(false) | AttrValue::Style(_) => None,
		}
	}
}

impl From<&str> for AttrValue {
	fn from(value: &str) -> Self {
		Self::Str(value.into())
	}
}

impl From<String> for AttrValue {
	fn from(value: String) -> Self {
		Self::Str(value.into())
	}
}

impl From<Rc<str>> for AttrValue {
	fn from(value: Rc<str>) -> Self {
		Self::Str(value)
	}
}

impl From<f64> for AttrValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<i32> for AttrValue {
	fn from(value: i32) -> Self {
		Self::Number(value.into())
	}
}

impl From<bool> for AttrValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Style> for AttrValue {
	fn from(value: Style) -> Self {
		Self::Style(value)
	}
}

impl Display for AttrValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			AttrValue::Str(value) => value.fmt(f),
			AttrValue::Number(value) => value.fmt(f),
			AttrValue::Bool(value) => value.fmt(f),
			AttrValue::Style(style) => {
				for (property, value) in &style.0 {
					write!(f, "{}: {};", property, value)?;
				}
				Ok(())
			}
		}
	}
}

/// Inline CSS properties in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style(Vec<(Cow<'static, str>, Cow<'static, str>)>);

impl Style {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with(mut self, property: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
		self.0.push((property.into(), value.into()));
		self
	}

	#[must_use]
	pub fn get(&self, property: &str) -> Option<&str> {
		self.0.iter().find(|(p, _)| p == property).map(|(_, value)| &**value)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(property, value)| (&**property, &**value))
	}
}

/// Element attributes in declaration order.
///
/// Shared behind an [`Rc`] by [`ElementOp`](`crate::op::ElementOp`), so that an unchanged set can be
/// recognised by identity and skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(Cow<'static, str>, AttrValue)>);

impl Attributes {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) -> Self {
		self.0.push((name.into(), value.into()));
		self
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&AttrValue> {
		self.0.iter().find(|(n, _)| n == name).map(|(_, value)| value)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
		self.0.iter().map(|(name, value)| (&**name, value))
	}
}

/// Brings the attributes of `element` from `prev` to `next`.
///
/// Keys only in `prev` are removed, keys only in `next` are added and keys in both are written if their value changed.
/// Entries that are equal and at the same position at the start or end of both lists are skipped without lookup.
#[instrument(skip_all)]
pub fn update_attributes<D: Dom + ?Sized>(dom: &mut D, element: &D::Node, prev: Option<&Attributes>, next: Option<&Attributes>) -> Result<(), Error> {
	let mut a = prev.map_or(&[][..], |prev| &prev.0[..]);
	let mut b = next.map_or(&[][..], |next| &next.0[..]);

	while !a.is_empty() && a.first() == b.first() {
		a = &a[1..];
		b = &b[1..];
	}
	while !a.is_empty() && a.last() == b.last() {
		a = &a[..a.len() - 1];
		b = &b[..b.len() - 1];
	}

	let mut matched = 0;
	for (name, value) in a {
		let next_value = b.iter().find(|(n, _)| n == name).map(|(_, value)| value);
		if next_value.is_some() {
			matched += 1;
		}
		update_attribute(dom, element, name, Some(value), next_value)?;
	}
	if matched < b.len() {
		for (name, value) in b {
			if !a.iter().any(|(n, _)| n == name) {
				update_attribute(dom, element, name, None, Some(value))?;
			}
		}
	}
	Ok(())
}

fn update_attribute<D: Dom + ?Sized>(dom: &mut D, element: &D::Node, name: &str, prev: Option<&AttrValue>, next: Option<&AttrValue>) -> Result<(), Error> {
	if prev == next {
		return Ok(());
	}
	if cfg!(feature = "dangerous-logging") {
		trace!(name, ?prev, ?next, "Updating attribute");
	} else {
		trace!(name, "Updating attribute");
	}

	match (prev, next) {
		(Some(AttrValue::Style(a)), Some(AttrValue::Style(b))) => update_style(dom, element, Some(a), Some(b)),
		(Some(AttrValue::Style(a)), next) => {
			update_style(dom, element, Some(a), None)?;
			match next.and_then(AttrValue::attribute_value) {
				Some(value) => dom.set_attribute(element, name, &value),
				None => Ok(()),
			}
		}
		(prev, Some(AttrValue::Style(b))) => {
			if prev.and_then(AttrValue::attribute_value).is_some() {
				dom.remove_attribute(element, name)?;
			}
			update_style(dom, element, None, Some(b))
		}
		(prev, next) => match next.and_then(AttrValue::attribute_value) {
			Some(value) => dom.set_attribute(element, name, &value),
			None if prev.and_then(AttrValue::attribute_value).is_some() => dom.remove_attribute(element, name),
			None => Ok(()),
		},
	}
}

/// Per-property version of [`update_attributes`] for inline styles.
pub fn update_style<D: Dom + ?Sized>(dom: &mut D, element: &D::Node, prev: Option<&Style>, next: Option<&Style>) -> Result<(), Error> {
	let a = prev.map_or(&[][..], |prev| &prev.0[..]);
	let b = next.map_or(&[][..], |next| &next.0[..]);

	let mut matched = 0;
	for (property, value) in a {
		match b.iter().find(|(p, _)| p == property) {
			Some((_, next_value)) => {
				matched += 1;
				if next_value != value {
					dom.set_style(element, property, next_value)?;
				}
			}
			None => dom.remove_style(element, property)?,
		}
	}
	if matched < b.len() {
		for (property, value) in b {
			if !a.iter().any(|(p, _)| p == property) {
				dom.set_style(element, property, value)?;
			}
		}
	}
	Ok(())
}
