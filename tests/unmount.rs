use harness_::{div, html_of, root, text};

use ivy_dom::{flags::NodeFlags, op::NodeRef, Component, Hooks, Op, UnmountReason};
use std::{cell::RefCell, rc::Rc};

type Log = Rc<RefCell<Vec<String>>>;

/// A component that logs `"{name}1"` and `"{name}2"` when unmounted, rendering `child`.
fn logging(name: &'static str, log: &Log) -> Component<Option<Op>> {
	let log = log.clone();
	Component::new(name, move |hooks: &mut Hooks<'_>| {
		for i in 1..=2 {
			let log = log.clone();
			hooks.on_unmount(move |_| log.borrow_mut().push(format!("{}{}", name, i)));
		}
		|child: &Option<Op>| child.clone()
	})
}

#[test]
fn callbacks_run_children_first_in_registration_order() {
	let log = Log::default();
	let parent = logging("P", &log);
	let child = logging("C", &log);

	let mut root = root();
	root.render(parent.op(Some(div(child.op(None))))).unwrap();
	root.unmount().unwrap();

	assert_eq!(*log.borrow(), ["C1", "C2", "P1", "P2"]);
	assert_eq!(html_of(&root), "");
	assert!(root.state().is_none());
}

#[test]
fn removed_component_sees_removed() {
	let reasons = Rc::new(RefCell::new(Vec::new()));
	let component = {
		let reasons = reasons.clone();
		Component::new("Leaf", move |hooks: &mut Hooks<'_>| {
			let reasons = reasons.clone();
			hooks.on_unmount(move |reason| reasons.borrow_mut().push(reason));
			|_: &()| Some(Op::text("leaf"))
		})
	};

	let mut root = root();
	root.render(Op::keyed(vec![(1, Some(component.op(()))), (2, Some(text("x")))]).unwrap()).unwrap();
	root.render(Op::keyed(vec![(2, Some(text("x")))]).unwrap()).unwrap();
	assert_eq!(html_of(&root), "x");
	assert_eq!(*reasons.borrow(), [UnmountReason::Removed]);
}

#[test]
fn fragment_length_change_reports_replaced() {
	let reasons = Rc::new(RefCell::new(Vec::new()));
	let component = {
		let reasons = reasons.clone();
		Component::new("Leaf", move |hooks: &mut Hooks<'_>| {
			let reasons = reasons.clone();
			hooks.on_unmount(move |reason| reasons.borrow_mut().push(reason));
			|_: &()| None::<Op>
		})
	};

	let mut root = root();
	root.render(Op::fragment(vec![component.op(())])).unwrap();
	root.render(Op::fragment(vec![component.op(()), text("more")])).unwrap();
	assert_eq!(*reasons.borrow(), [UnmountReason::Replaced]);
}

#[test]
fn subtrees_without_side_effects_are_not_walked_but_removed() {
	let log = Log::default();
	let component = logging("L", &log);

	let mut root = root();
	root.render(div(Op::fragment(vec![div(text("a")), div(component.op(None))]))).unwrap();

	let state = root.state().unwrap();
	assert!(state.flags().contains(NodeFlags::DEEP_UNMOUNT));
	let fragment = state.children().next().unwrap();
	assert!(!fragment.children().next().unwrap().flags().contains(NodeFlags::DEEP_UNMOUNT));

	root.dom_mut().take_ops();
	root.render(None).unwrap();
	assert_eq!(*log.borrow(), ["L1", "L2"]);
	assert_eq!(html_of(&root), "");
	// Only the outer element is detached. Its descendants go with it.
	assert_eq!(root.dom().ops().remove, 1);
}

#[test]
fn single_child_unmount_clears_the_parent() {
	let mut root = root();
	root.render(div(Op::fragment(vec![text("a"), text("b"), text("c")]))).unwrap();
	root.dom_mut().take_ops();

	root.render(div(None)).unwrap();
	assert_eq!(html_of(&root), "<div></div>");
	let ops = root.dom().ops();
	assert_eq!(ops.clear, 1);
	assert_eq!(ops.remove, 0);
}

#[test]
fn refs_are_cleared_on_unmount() {
	let cell = NodeRef::new();

	let mut root = root();
	root.render(div(Op::node_ref(cell.clone(), text("a")))).unwrap();
	assert!(cell.is_set());

	root.unmount().unwrap();
	assert!(!cell.is_set());
}

#[test]
fn unmount_of_empty_root() {
	let mut root = root();
	root.unmount().unwrap();
	assert_eq!(root.dom().ops().total(), 0);
}
