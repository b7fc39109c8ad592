//! An in-memory [`Dom`] for tests and headless rendering.
//!
//! Nodes live in an arena and are never freed, so a [`NodeId`] stays valid for the lifetime of its [`MemoryDom`].
//! Every mutation is counted in [`DomOps`], which makes the cost of a render observable.

use crate::{dom::Dom, Error};
use core::fmt::Write as _;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// Mutation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomOps {
	pub create_element: usize,
	pub create_text: usize,
	pub clone_node: usize,
	/// Insertions of nodes that had no parent.
	pub insert: usize,
	/// Insertions of nodes that were already attached.
	pub moves: usize,
	pub remove: usize,
	pub clear: usize,
	pub set_text: usize,
	pub set_class_name: usize,
	/// Attribute and style writes and removals.
	pub attribute: usize,
}

impl DomOps {
	/// Sum of all counters.
	#[must_use]
	pub fn total(&self) -> usize {
		self.create_element + self.create_text + self.clone_node + self.insert + self.moves + self.remove + self.clear + self.set_text + self.set_class_name + self.attribute
	}
}

#[derive(Debug, Clone)]
enum NodeData {
	Element {
		tag: String,
		svg: bool,
		attributes: Vec<(String, String)>,
		style: Vec<(String, String)>,
		children: Vec<NodeId>,
	},
	Text(String),
}

#[derive(Debug, Clone)]
struct Node {
	parent: Option<NodeId>,
	data: NodeData,
}

#[derive(Debug, Default)]
pub struct MemoryDom {
	nodes: Vec<Node>,
	ops: DomOps,
}

impl MemoryDom {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// A detached `<div>` to render into. Not counted in [`DomOps`].
	pub fn create_container(&mut self) -> NodeId {
		self.push(NodeData::Element {
			tag: "div".to_owned(),
			svg: false,
			attributes: Vec::new(),
			style: Vec::new(),
			children: Vec::new(),
		})
	}

	#[must_use]
	pub fn ops(&self) -> DomOps {
		self.ops
	}

	/// Returns the counters and resets them.
	pub fn take_ops(&mut self) -> DomOps {
		core::mem::take(&mut self.ops)
	}

	#[must_use]
	pub fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.get(node).ok().and_then(|node| node.parent)
	}

	#[must_use]
	pub fn children(&self, node: NodeId) -> &[NodeId] {
		match self.get(node) {
			Ok(Node {
				data: NodeData::Element { children, .. },
				..
			}) => children,
			_ => &[],
		}
	}

	#[must_use]
	pub fn text(&self, node: NodeId) -> Option<&str> {
		match self.get(node) {
			Ok(Node { data: NodeData::Text(text), .. }) => Some(text.as_str()),
			_ => None,
		}
	}

	#[must_use]
	pub fn tag(&self, node: NodeId) -> Option<&str> {
		match self.get(node) {
			Ok(Node {
				data: NodeData::Element { tag, .. }, ..
			}) => Some(tag.as_str()),
			_ => None,
		}
	}

	#[must_use]
	pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
		match self.get(node) {
			Ok(Node {
				data: NodeData::Element { attributes, .. },
				..
			}) => attributes.iter().find(|(n, _)| n == name).map(|(_, value)| value.as_str()),
			_ => None,
		}
	}

	#[must_use]
	pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
		match self.get(node) {
			Ok(Node { data: NodeData::Element { style, .. }, .. }) => style.iter().find(|(p, _)| p == property).map(|(_, value)| value.as_str()),
			_ => None,
		}
	}

	/// Serialises the children of `node` as HTML.
	#[must_use]
	pub fn inner_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		for &child in self.children(node) {
			self.write_html(&mut html, child);
		}
		html
	}

	#[must_use]
	pub fn outer_html(&self, node: NodeId) -> String {
		let mut html = String::new();
		self.write_html(&mut html, node);
		html
	}

	fn write_html(&self, html: &mut String, node: NodeId) {
		let node = match self.get(node) {
			Ok(node) => node,
			Err(_) => return,
		};
		match &node.data {
			NodeData::Text(text) => escape(html, text, false),
			NodeData::Element {
				tag,
				attributes,
				style,
				children,
				..
			} => {
				html.push('<');
				html.push_str(tag);
				for (name, value) in attributes {
					html.push(' ');
					html.push_str(name);
					if !value.is_empty() {
						html.push_str("=\"");
						escape(html, value, true);
						html.push('"');
					}
				}
				if !style.is_empty() {
					html.push_str(" style=\"");
					for (i, (property, value)) in style.iter().enumerate() {
						if i > 0 {
							html.push(' ');
						}
						let _ = write!(html, "{}: {};", property, value);
					}
					html.push('"');
				}
				html.push('>');
				for &child in children {
					self.write_html(html, child);
				}
				html.push_str("</");
				html.push_str(tag);
				html.push('>');
			}
		}
	}

	fn push(&mut self, data: NodeData) -> NodeId {
		#[allow(clippy::cast_possible_truncation)]
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(Node { parent: None, data });
		id
	}

	fn get(&self, node: NodeId) -> Result<&Node, Error> {
		self.nodes.get(node.0 as usize).ok_or_else(|| Error::dom("lookup", format!("unknown node {:?}", node)))
	}

	fn get_mut(&mut self, node: NodeId) -> Result<&mut Node, Error> {
		self.nodes.get_mut(node.0 as usize).ok_or_else(|| Error::dom("lookup", format!("unknown node {:?}", node)))
	}

	fn element_children_mut(&mut self, operation: &'static str, node: NodeId) -> Result<&mut Vec<NodeId>, Error> {
		match &mut self.get_mut(node)?.data {
			NodeData::Element { children, .. } => Ok(children),
			NodeData::Text(_) => Err(Error::dom(operation, format!("{:?} is not an element", node))),
		}
	}

	fn element_mut(&mut self, operation: &'static str, node: NodeId) -> Result<(&mut Vec<(String, String)>, &mut Vec<(String, String)>), Error> {
		match &mut self.get_mut(node)?.data {
			NodeData::Element { attributes, style, .. } => Ok((attributes, style)),
			NodeData::Text(_) => Err(Error::dom(operation, format!("{:?} is not an element", node))),
		}
	}

	fn detach(&mut self, node: NodeId) -> Result<(), Error> {
		if let Some(parent) = self.get_mut(node)?.parent.take() {
			self.element_children_mut("detach", parent)?.retain(|&child| child != node);
		}
		Ok(())
	}
}

fn escape(html: &mut String, text: &str, attribute: bool) {
	for c in text.chars() {
		match c {
			'&' => html.push_str("&amp;"),
			'<' => html.push_str("&lt;"),
			'>' => html.push_str("&gt;"),
			'"' if attribute => html.push_str("&quot;"),
			c => html.push(c),
		}
	}
}

fn set_entry(entries: &mut Vec<(String, String)>, name: &str, value: &str) {
	match entries.iter_mut().find(|(n, _)| n == name) {
		Some((_, existing)) => value.clone_into(existing),
		None => entries.push((name.to_owned(), value.to_owned())),
	}
}

impl Dom for MemoryDom {
	type Node = NodeId;

	fn create_element(&mut self, tag: &str, svg: bool) -> Result<NodeId, Error> {
		self.ops.create_element += 1;
		Ok(self.push(NodeData::Element {
			tag: tag.to_owned(),
			svg,
			attributes: Vec::new(),
			style: Vec::new(),
			children: Vec::new(),
		}))
	}

	fn create_text(&mut self, text: &str) -> Result<NodeId, Error> {
		self.ops.create_text += 1;
		Ok(self.push(NodeData::Text(text.to_owned())))
	}

	fn clone_node(&mut self, node: &NodeId) -> Result<NodeId, Error> {
		self.ops.clone_node += 1;
		let data = match &self.get(*node)?.data {
			NodeData::Element { tag, svg, attributes, style, .. } => NodeData::Element {
				tag: tag.clone(),
				svg: *svg,
				attributes: attributes.clone(),
				style: style.clone(),
				children: Vec::new(),
			},
			NodeData::Text(text) => NodeData::Text(text.clone()),
		};
		Ok(self.push(data))
	}

	fn insert_before(&mut self, parent: &NodeId, node: &NodeId, next: Option<&NodeId>) -> Result<(), Error> {
		if let Some(next) = next {
			if self.get(*next)?.parent != Some(*parent) {
				return Err(Error::dom("insert_before", format!("{:?} is not a child of {:?}", next, parent)));
			}
		}
		if next == Some(node) {
			self.ops.moves += 1;
			return Ok(());
		}
		if self.get(*node)?.parent.is_some() {
			self.ops.moves += 1;
			self.detach(*node)?;
		} else {
			self.ops.insert += 1;
		}

		let children = self.element_children_mut("insert_before", *parent)?;
		let index = match next {
			Some(next) => children.iter().position(|child| child == next).unwrap_or(children.len()),
			None => children.len(),
		};
		children.insert(index, *node);
		self.get_mut(*node)?.parent = Some(*parent);
		trace!(?parent, ?node, index, "Inserted node");
		Ok(())
	}

	fn remove_child(&mut self, parent: &NodeId, node: &NodeId) -> Result<(), Error> {
		if self.get(*node)?.parent != Some(*parent) {
			return Err(Error::dom("remove_child", format!("{:?} is not a child of {:?}", node, parent)));
		}
		self.ops.remove += 1;
		self.detach(*node)
	}

	fn clear_children(&mut self, parent: &NodeId) -> Result<(), Error> {
		self.ops.clear += 1;
		let children = core::mem::take(self.element_children_mut("clear_children", *parent)?);
		for child in children {
			self.get_mut(child)?.parent = None;
		}
		Ok(())
	}

	fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), Error> {
		self.ops.set_text += 1;
		match &mut self.get_mut(*node)?.data {
			NodeData::Text(existing) => {
				text.clone_into(existing);
				Ok(())
			}
			NodeData::Element { .. } => Err(Error::dom("set_text", format!("{:?} is not a text node", node))),
		}
	}

	/// An empty `class_name` removes the `class` attribute, so that serialisations don't depend on history.
	fn set_class_name(&mut self, element: &NodeId, class_name: &str, _svg: bool) -> Result<(), Error> {
		self.ops.set_class_name += 1;
		let (attributes, _) = self.element_mut("set_class_name", *element)?;
		if class_name.is_empty() {
			attributes.retain(|(name, _)| name != "class");
		} else {
			set_entry(attributes, "class", class_name);
		}
		Ok(())
	}

	fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> Result<(), Error> {
		self.ops.attribute += 1;
		let (attributes, _) = self.element_mut("set_attribute", *element)?;
		set_entry(attributes, name, value);
		Ok(())
	}

	fn remove_attribute(&mut self, element: &NodeId, name: &str) -> Result<(), Error> {
		self.ops.attribute += 1;
		let (attributes, _) = self.element_mut("remove_attribute", *element)?;
		attributes.retain(|(n, _)| n != name);
		Ok(())
	}

	fn set_style(&mut self, element: &NodeId, property: &str, value: &str) -> Result<(), Error> {
		self.ops.attribute += 1;
		let (_, style) = self.element_mut("set_style", *element)?;
		set_entry(style, property, value);
		Ok(())
	}

	fn remove_style(&mut self, element: &NodeId, property: &str) -> Result<(), Error> {
		self.ops.attribute += 1;
		let (_, style) = self.element_mut("remove_style", *element)?;
		style.retain(|(p, _)| p != property);
		Ok(())
	}
}
