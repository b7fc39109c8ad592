#![cfg(target_arch = "wasm32")]

use ivy_dom::{
	attributes::{Attributes, Style},
	op::{html, svg, NodeRef},
	Op,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

use web_harness_::web_root;

#[wasm_bindgen_test]
fn text() {
	let (mut root, container) = web_root();
	root.render(Op::text("Hello ivy-dom!")).unwrap();
	assert_eq!(container.inner_html(), "Hello ivy-dom!");

	root.render(Op::text("Bye!")).unwrap();
	assert_eq!(container.inner_html(), "Bye!");
}

#[wasm_bindgen_test]
fn element_with_attributes() {
	let (mut root, container) = web_root();
	root.render(Op::from(
		html("div")
			.class("box")
			.attributes(Attributes::new().with("id", "a").with("hidden", true).with("style", Style::new().with("top", "1px")))
			.children(Op::text("content")),
	))
	.unwrap();
	assert_eq!(container.inner_html(), r#"<div class="box" id="a" hidden="" style="top: 1px;">content</div>"#);

	root.render(Op::from(html("div").attributes(Attributes::new().with("id", "b")).children(Op::text("content")))).unwrap();
	let element = container.first_element_child().unwrap();
	assert_eq!(element.get_attribute("id").as_deref(), Some("b"));
	assert_eq!(element.class_name(), "");
	assert!(!element.has_attribute("hidden"));
	assert_eq!(element.text_content().as_deref(), Some("content"));
}

#[wasm_bindgen_test]
fn svg_element() {
	let (mut root, container) = web_root();
	root.render(Op::from(svg("svg").class("icon"))).unwrap();

	let element = container.first_element_child().unwrap();
	assert_eq!(element.namespace_uri().as_deref(), Some("http://www.w3.org/2000/svg"));
	assert_eq!(element.get_attribute("class").as_deref(), Some("icon"));
}

#[wasm_bindgen_test]
fn keyed_reorder_keeps_nodes() {
	let list = |keys: &[u32]| Op::keyed(keys.iter().map(|&key| (key, Op::from(html("i").children(Op::text(key)))))).unwrap();

	let (mut root, container) = web_root();
	root.render(list(&[0, 1, 2, 3])).unwrap();
	let first = container.first_child().unwrap();

	root.render(list(&[3, 2, 1, 0])).unwrap();
	assert_eq!(container.inner_html(), "<i>3</i><i>2</i><i>1</i><i>0</i>");
	assert!(container.last_child().unwrap().is_same_node(Some(&first)));
}

#[wasm_bindgen_test]
fn node_ref() {
	let cell = NodeRef::new();

	let (mut root, container) = web_root();
	root.render(Op::node_ref(cell.clone(), Op::from(html("span")))).unwrap();

	let node: web_sys::Node = cell.get().unwrap();
	assert_eq!(node.dyn_into::<web_sys::Element>().unwrap().tag_name(), "SPAN");
	assert!(container.first_child().is_some());

	root.unmount().unwrap();
	assert!(!cell.is_set());
	assert_eq!(container.child_element_count(), 0);
}
