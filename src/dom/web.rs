//! [`Dom`] implementation for browsers, through [`web_sys`].

use crate::{dom::Dom, Error};
use tracing::{instrument, warn};
use wasm_bindgen::{JsCast, JsValue};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Creates nodes in `document` and mutates them in place.
#[derive(Debug, Clone)]
pub struct WebDom {
	document: web_sys::Document,
}

impl WebDom {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self { document }
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}
}

fn js_error(operation: &'static str) -> impl FnOnce(JsValue) -> Error {
	move |error| {
		let message = match error.dyn_ref::<js_sys::Error>() {
			Some(error) => String::from(error.message()),
			None => format!("{:?}", error),
		};
		Error::dom(operation, message)
	}
}

fn as_element<'a>(operation: &'static str, node: &'a web_sys::Node) -> Result<&'a web_sys::Element, Error> {
	node.dyn_ref::<web_sys::Element>()
		.ok_or_else(|| Error::dom(operation, format!("expected an element but found {:?}", node)))
}

fn style(operation: &'static str, node: &web_sys::Node) -> Result<web_sys::CssStyleDeclaration, Error> {
	if let Some(element) = node.dyn_ref::<web_sys::HtmlElement>() {
		Ok(element.style())
	} else if let Some(element) = node.dyn_ref::<web_sys::SvgElement>() {
		Ok(element.style())
	} else {
		Err(Error::dom(operation, format!("expected an HTML or SVG element but found {:?}", node)))
	}
}

impl Dom for WebDom {
	type Node = web_sys::Node;

	#[instrument(skip(self))]
	fn create_element(&mut self, tag: &str, svg: bool) -> Result<web_sys::Node, Error> {
		let element = if svg {
			self.document.create_element_ns(Some(SVG_NAMESPACE), tag)
		} else {
			self.document.create_element(tag)
		};
		element.map(Into::into).map_err(js_error("create_element"))
	}

	fn create_text(&mut self, text: &str) -> Result<web_sys::Node, Error> {
		Ok(self.document.create_text_node(text).into())
	}

	fn clone_node(&mut self, node: &web_sys::Node) -> Result<web_sys::Node, Error> {
		node.clone_node().map_err(js_error("clone_node"))
	}

	fn insert_before(&mut self, parent: &web_sys::Node, node: &web_sys::Node, next: Option<&web_sys::Node>) -> Result<(), Error> {
		parent.insert_before(node, next).map(drop).map_err(js_error("insert_before"))
	}

	fn remove_child(&mut self, parent: &web_sys::Node, node: &web_sys::Node) -> Result<(), Error> {
		parent.remove_child(node).map(drop).map_err(js_error("remove_child"))
	}

	fn clear_children(&mut self, parent: &web_sys::Node) -> Result<(), Error> {
		parent.set_text_content(None);
		Ok(())
	}

	fn set_text(&mut self, node: &web_sys::Node, text: &str) -> Result<(), Error> {
		node.set_node_value(Some(text));
		Ok(())
	}

	fn set_class_name(&mut self, element: &web_sys::Node, class_name: &str, svg: bool) -> Result<(), Error> {
		let element = as_element("set_class_name", element)?;
		if svg {
			// `SVGElement.className` is an `SVGAnimatedString`.
			if class_name.is_empty() {
				element.remove_attribute("class").map_err(js_error("set_class_name"))
			} else {
				element.set_attribute("class", class_name).map_err(js_error("set_class_name"))
			}
		} else {
			element.set_class_name(class_name);
			Ok(())
		}
	}

	fn set_attribute(&mut self, element: &web_sys::Node, name: &str, value: &str) -> Result<(), Error> {
		as_element("set_attribute", element)?
			.set_attribute(name, value)
			.map_err(js_error("set_attribute"))
	}

	fn remove_attribute(&mut self, element: &web_sys::Node, name: &str) -> Result<(), Error> {
		as_element("remove_attribute", element)?
			.remove_attribute(name)
			.map_err(js_error("remove_attribute"))
	}

	fn set_style(&mut self, element: &web_sys::Node, property: &str, value: &str) -> Result<(), Error> {
		style("set_style", element)?.set_property(property, value).map_err(js_error("set_style"))
	}

	fn remove_style(&mut self, element: &web_sys::Node, property: &str) -> Result<(), Error> {
		let removed = style("remove_style", element)?.remove_property(property).map_err(js_error("remove_style"))?;
		if removed.is_empty() {
			warn!(property, "Removed style property that wasn't set");
		}
		Ok(())
	}
}
