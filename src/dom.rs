//! The DOM mutation surface the reconciler drives.
//!
//! [`web::WebDom`] talks to a browser through [`web_sys`], [`memory::MemoryDom`] keeps an inspectable tree in memory.

use crate::Error;
use core::fmt::Debug;

pub mod memory;
pub mod web;

/// A DOM implementation.
///
/// Node handles are cheap to clone and compare equal when they refer to the same node.
/// All methods mirror the DOM operations of the same (or similar) name and fail with [`Error::Dom`].
pub trait Dom {
	type Node: Clone + PartialEq + Debug + 'static;

	/// `document.createElement(tag)` or, for `svg`, `document.createElementNS(SVG_NAMESPACE, tag)`.
	fn create_element(&mut self, tag: &str, svg: bool) -> Result<Self::Node, Error>;

	fn create_text(&mut self, text: &str) -> Result<Self::Node, Error>;

	/// Shallow clone: attributes and styles are copied, child nodes are not.
	fn clone_node(&mut self, node: &Self::Node) -> Result<Self::Node, Error>;

	/// Inserts `node` into `parent` before `next`, or as last child if `next` is [`None`].
	///
	/// If `node` is already attached anywhere, it is moved.
	fn insert_before(&mut self, parent: &Self::Node, node: &Self::Node, next: Option<&Self::Node>) -> Result<(), Error>;

	fn remove_child(&mut self, parent: &Self::Node, node: &Self::Node) -> Result<(), Error>;

	/// `parent.textContent = ""`.
	fn clear_children(&mut self, parent: &Self::Node) -> Result<(), Error>;

	/// `nodeValue` of a text node.
	fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<(), Error>;

	/// `className` for HTML elements, the `class` attribute for SVG ones.
	/// An empty `class_name` removes the class.
	fn set_class_name(&mut self, element: &Self::Node, class_name: &str, svg: bool) -> Result<(), Error>;

	fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> Result<(), Error>;

	fn remove_attribute(&mut self, element: &Self::Node, name: &str) -> Result<(), Error>;

	fn set_style(&mut self, element: &Self::Node, property: &str, value: &str) -> Result<(), Error>;

	fn remove_style(&mut self, element: &Self::Node, property: &str) -> Result<(), Error>;
}
