use harness_::{div, first_child, html_of, root, text};

use ivy_dom::{
	attributes::{Attributes, Style},
	op::{html, svg, EventHandler, NodeRef},
	Op,
};
use std::{any::Any, cell::Cell, rc::Rc};

fn tree() -> Op {
	div(Op::fragment(vec![
		Op::from(html("h1").class("title").children(text("Title"))),
		Op::from(html("p").attributes(Attributes::new().with("id", "body")).children(text("Body"))),
	]))
}

#[test]
fn same_op_is_a_noop() {
	let op = tree();

	let mut root = root();
	root.render(op.clone()).unwrap();
	root.dom_mut().take_ops();

	root.render(op).unwrap();
	assert_eq!(root.dom().ops().total(), 0);
}

#[test]
fn equal_rebuilt_tree_is_a_noop() {
	let mut root = root();
	root.render(tree()).unwrap();
	let html = html_of(&root);
	root.dom_mut().take_ops();

	root.render(tree()).unwrap();
	assert_eq!(html_of(&root), html);
	// Attributes are rebuilt too, but diffing equal values writes nothing.
	assert_eq!(root.dom().ops().total(), 0);
}

#[test]
fn text_content_changes_in_place() {
	let mut root = root();
	root.render(text("abc")).unwrap();
	let node = first_child(&root);
	root.dom_mut().take_ops();

	root.render(Op::text(10)).unwrap();
	assert_eq!(html_of(&root), "10");
	assert_eq!(first_child(&root), node);

	let ops = root.dom().ops();
	assert_eq!(ops.create_text, 0);
	assert_eq!(ops.set_text, 1);
	assert_eq!(ops.total(), 1);
}

#[test]
fn attribute_diff() {
	let mut root = root();
	root.render(Op::from(html("div").attributes(
		Attributes::new().with("id", "a").with("title", "t").with("hidden", true).with("style", Style::new().with("top", "1px")),
	)))
	.unwrap();
	assert_eq!(html_of(&root), r#"<div id="a" title="t" hidden style="top: 1px;"></div>"#);
	root.dom_mut().take_ops();

	root.render(Op::from(html("div").attributes(
		Attributes::new()
			.with("id", "b")
			.with("hidden", false)
			.with("data-x", 1)
			.with("style", Style::new().with("top", "2px").with("left", "0")),
	)))
	.unwrap();
	assert_eq!(html_of(&root), r#"<div id="b" data-x="1" style="top: 2px; left: 0;"></div>"#);

	// id, title, hidden, top, left and data-x.
	assert_eq!(root.dom().ops().attribute, 6);
}

#[test]
fn shared_attributes_are_skipped() {
	let attributes = Rc::new(Attributes::new().with("id", "x"));

	let mut root = root();
	root.render(Op::from(html("div").attributes(attributes.clone()).children(text("a")))).unwrap();
	root.dom_mut().take_ops();

	root.render(Op::from(html("div").attributes(attributes).children(text("b")))).unwrap();
	let ops = root.dom().ops();
	assert_eq!(ops.attribute, 0);
	assert_eq!(ops.set_text, 1);
}

#[test]
fn style_attribute_switches_representation() {
	let mut root = root();
	root.render(Op::from(html("div").attributes(Attributes::new().with("style", Style::new().with("color", "red"))))).unwrap();
	assert_eq!(html_of(&root), r#"<div style="color: red;"></div>"#);

	root.render(Op::from(html("div"))).unwrap();
	assert_eq!(html_of(&root), "<div></div>");
}

#[test]
fn class_name_changes() {
	let mut root = root();
	root.render(Op::from(html("div").class("a"))).unwrap();
	root.dom_mut().take_ops();

	root.render(Op::from(html("div").class("b"))).unwrap();
	assert_eq!(html_of(&root), r#"<div class="b"></div>"#);
	assert_eq!(root.dom().ops().set_class_name, 1);

	root.render(Op::from(html("div"))).unwrap();
	assert_eq!(html_of(&root), "<div></div>");
}

#[test]
fn different_tag_replaces_element() {
	let mut root = root();
	root.render(div(text("a"))).unwrap();
	let node = first_child(&root);

	root.render(Op::from(html("span").children(text("a")))).unwrap();
	assert_eq!(html_of(&root), "<span>a</span>");
	assert_ne!(first_child(&root), node);
}

#[test]
fn html_and_svg_elements_of_the_same_tag_are_different() {
	let mut root = root();
	root.render(Op::from(html("a"))).unwrap();
	let node = first_child(&root);

	root.render(Op::from(svg("a"))).unwrap();
	assert_ne!(first_child(&root), node);
}

#[test]
fn text_replaced_by_element() {
	let mut root = root();
	root.render(Op::fragment(vec![text("a"), text("b")])).unwrap();
	root.dom_mut().take_ops();

	root.render(Op::fragment(vec![div(None), text("b")])).unwrap();
	assert_eq!(html_of(&root), "<div></div>b");
	let ops = root.dom().ops();
	assert_eq!(ops.remove, 1);
	assert_eq!(ops.create_element, 1);
	assert_eq!(ops.insert, 1);
}

#[test]
fn sole_fragment_replaced_by_element_clears_the_container() {
	let mut root = root();
	root.render(Op::fragment(vec![text("a"), text("b")])).unwrap();
	root.dom_mut().take_ops();

	root.render(div(text("c"))).unwrap();
	assert_eq!(html_of(&root), "<div>c</div>");
	let ops = root.dom().ops();
	assert_eq!(ops.clear, 1);
	assert_eq!(ops.remove, 0);

	root.render(Op::keyed(vec![(1, text("x")), (2, text("y"))]).unwrap()).unwrap();
	root.dom_mut().take_ops();
	root.render(div(None)).unwrap();
	assert_eq!(html_of(&root), "<div></div>");
	let ops = root.dom().ops();
	assert_eq!(ops.clear, 1);
	assert_eq!(ops.remove, 0);
}

#[test]
fn event_handlers_are_replaced_and_the_child_diffed() {
	let clicks = Rc::new(Cell::new(0));
	let on_click = |step: u32| {
		let clicks = clicks.clone();
		EventHandler::new("click", move |_: &dyn Any| clicks.set(clicks.get() + step))
	};

	let mut root = root();
	root.render(Op::events(vec![on_click(1)], text("a"))).unwrap();
	let node = first_child(&root);
	let handlers = root.state().unwrap().event_handlers().unwrap();
	assert_eq!(handlers.len(), 1);
	handlers[0].call(&());
	assert_eq!(clicks.get(), 1);
	root.dom_mut().take_ops();

	root.render(Op::events(vec![on_click(10), EventHandler::new("input", |_: &dyn Any| ())], text("b"))).unwrap();
	assert_eq!(html_of(&root), "b");
	assert_eq!(first_child(&root), node);
	let ops = root.dom().ops();
	assert_eq!(ops.set_text, 1);
	assert_eq!(ops.total(), 1);

	let handlers = root.state().unwrap().event_handlers().unwrap();
	assert_eq!(handlers.iter().map(|handler| &*handler.event).collect::<Vec<_>>(), ["click", "input"]);
	handlers[0].call(&());
	assert_eq!(clicks.get(), 11);

	root.render(div(None)).unwrap();
	assert!(root.state().unwrap().event_handlers().is_none());
}

#[test]
fn element_children_appear_and_disappear() {
	let mut root = root();
	root.render(div(None)).unwrap();
	root.render(div(text("child"))).unwrap();
	assert_eq!(html_of(&root), "<div>child</div>");

	root.render(div(None)).unwrap();
	assert_eq!(html_of(&root), "<div></div>");
}

#[test]
fn fragment_entries_update_positionally() {
	let mut root = root();
	root.render(Op::fragment(vec![Some(text("a")), None, Some(text("c"))])).unwrap();
	root.dom_mut().take_ops();

	root.render(Op::fragment(vec![None, Some(text("b")), Some(text("c"))])).unwrap();
	assert_eq!(html_of(&root), "bc");
	let ops = root.dom().ops();
	assert_eq!(ops.remove, 1);
	assert_eq!(ops.create_text, 1);
	assert_eq!(ops.insert, 1);
}

#[test]
fn fragment_length_change_remounts() {
	let mut root = root();
	root.render(Op::fragment(vec![text("a"), text("b")])).unwrap();
	let node = first_child(&root);
	root.dom_mut().take_ops();

	root.render(Op::fragment(vec![text("a"), text("b"), text("c")])).unwrap();
	assert_eq!(html_of(&root), "abc");
	assert_ne!(first_child(&root), node);

	let ops = root.dom().ops();
	assert_eq!(ops.clear, 1);
	assert_eq!(ops.create_text, 3);
}

#[test]
fn fragment_length_change_between_siblings() {
	let list = |items: &[&'static str]| div(Op::fragment(vec![text("["), Op::fragment(items.iter().map(|&item| text(item)).collect::<Vec<_>>()), text("]")]));

	let mut root = root();
	root.render(list(&["a", "b"])).unwrap();
	root.dom_mut().take_ops();

	root.render(list(&["c"])).unwrap();
	assert_eq!(html_of(&root), "<div>[c]</div>");
	let ops = root.dom().ops();
	assert_eq!(ops.clear, 0);
	assert_eq!(ops.remove, 2);
}

#[test]
fn clearing_the_root() {
	let mut root = root();
	root.render(tree()).unwrap();
	root.render(None).unwrap();
	assert_eq!(html_of(&root), "");
	assert!(root.state().is_none());
}

#[test]
fn node_ref_moves_with_its_child() {
	let cell = NodeRef::new();

	let mut root = root();
	root.render(Op::node_ref(cell.clone(), text("a"))).unwrap();
	let a = first_child(&root);
	assert_eq!(cell.get(), Some(a));

	root.render(Op::node_ref(cell.clone(), div(None))).unwrap();
	assert_ne!(cell.get(), Some(a));
	assert_eq!(cell.get(), Some(first_child(&root)));

	let other = NodeRef::new();
	root.render(Op::node_ref(other.clone(), div(None))).unwrap();
	assert!(!cell.is_set());
	assert_eq!(other.get(), Some(first_child(&root)));

	root.render(None).unwrap();
	assert!(!other.is_set());
}
