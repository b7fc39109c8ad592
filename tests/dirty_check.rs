use harness_::{div, html_of, root, text};

use ivy_dom::{dom::memory::MemoryDom, flags::NodeFlags, Component, Config, Context, Hooks, Invalidator, Op, Root};
use std::{
	cell::{Cell, RefCell},
	rc::Rc,
};

/// A counter whose value lives in the component and whose invalidator is handed out through `handle`.
fn counter(handle: &Rc<RefCell<Option<(Invalidator, Rc<Cell<u32>>)>>>, renders: &Rc<Cell<usize>>) -> Component<()> {
	let (handle, renders) = (handle.clone(), renders.clone());
	Component::new("Counter", move |hooks: &mut Hooks<'_>| {
		let count = Rc::new(Cell::new(0));
		*handle.borrow_mut() = Some((hooks.invalidator(), count.clone()));
		let renders = renders.clone();
		move |_: &()| {
			renders.set(renders.get() + 1);
			Some(Op::text(count.get()))
		}
	})
}

fn increment(handle: &Rc<RefCell<Option<(Invalidator, Rc<Cell<u32>>)>>>) {
	let handle = handle.borrow();
	let (invalidator, count) = handle.as_ref().unwrap();
	count.set(count.get() + 1);
	invalidator.invalidate();
}

#[test]
fn invalidated_component_rerenders_on_dirty_check() {
	let (handle, renders) = (Rc::default(), Rc::default());
	let counter = counter(&handle, &renders);

	let mut root = root();
	root.render(div(Op::fragment(vec![text("count: "), counter.op(())]))).unwrap();
	assert_eq!(html_of(&root), "<div>count: 0</div>");

	increment(&handle);
	root.dom_mut().take_ops();
	root.dirty_check().unwrap();
	assert_eq!(html_of(&root), "<div>count: 1</div>");
	assert_eq!(renders.get(), 2);

	let ops = root.dom().ops();
	assert_eq!(ops.set_text, 1);
	assert_eq!(ops.total(), 1);
}

#[test]
fn dirty_check_without_changes_does_nothing() {
	let (handle, renders) = (Rc::default(), Rc::default());
	let counter = counter(&handle, &renders);

	let mut root = root();
	root.render(counter.op(())).unwrap();
	root.dom_mut().take_ops();

	root.dirty_check().unwrap();
	root.dirty_check().unwrap();
	assert_eq!(renders.get(), 1);
	assert_eq!(root.dom().ops().total(), 0);
}

#[test]
fn invalidated_component_rerenders_below_reused_op() {
	let (handle, renders) = (Rc::default(), Rc::default());
	let counter = counter(&handle, &renders);
	let content = counter.op(());

	let mut root = root();
	root.render(div(content.clone())).unwrap();

	increment(&handle);
	root.render(div(content)).unwrap();
	assert_eq!(html_of(&root), "<div>1</div>");
	assert_eq!(renders.get(), 2);
}

#[test]
fn invalidation_is_consumed_by_rerender() {
	let (handle, renders) = (Rc::default(), Rc::default());
	let counter = counter(&handle, &renders);
	let props = Rc::new(());

	let mut root = root();
	root.render(counter.op(props.clone())).unwrap();

	increment(&handle);
	root.render(counter.op(props)).unwrap();
	assert_eq!(html_of(&root), "1");
	assert_eq!(renders.get(), 2);

	root.dirty_check().unwrap();
	assert_eq!(renders.get(), 2);
}

#[test]
fn predicate_decides_about_rerender() {
	let source = Rc::new(Cell::new(1));
	let watcher = {
		let source = source.clone();
		Component::new("Watcher", move |hooks: &mut Hooks<'_>| {
			let seen = Rc::new(Cell::new(source.get()));
			hooks.dirty_check({
				let (source, seen) = (source.clone(), seen.clone());
				move |_: &Context| source.get() != seen.get()
			});
			let source = source.clone();
			move |_: &()| {
				seen.set(source.get());
				Some(Op::text(source.get()))
			}
		})
	};

	let mut root = root();
	root.render(div(watcher.op(()))).unwrap();
	root.dom_mut().take_ops();

	root.dirty_check().unwrap();
	assert_eq!(root.dom().ops().total(), 0);

	source.set(2);
	root.dirty_check().unwrap();
	assert_eq!(html_of(&root), "<div>2</div>");
}

#[test]
fn deep_flags_track_dirty_checked_descendants() {
	let (handle, renders) = (Rc::default(), Rc::default());
	let counter = counter(&handle, &renders);

	let mut root = root();
	root.render(div(Op::fragment(vec![div(text("static")), div(counter.op(()))]))).unwrap();

	let state = root.state().unwrap();
	assert!(state.flags().contains(NodeFlags::DEEP_DIRTY_CHECK));
	assert!(!state.flags().contains(NodeFlags::DIRTY_CHECK));

	let fragment = state.children().next().unwrap();
	let children: Vec<_> = fragment.children().collect();
	assert!(!children[0].flags().contains(NodeFlags::DEEP_DIRTY_CHECK));
	assert!(children[1].flags().contains(NodeFlags::DEEP_DIRTY_CHECK));

	root.render(div(Op::fragment(vec![div(text("static")), div(text("gone"))]))).unwrap();
	assert!(!root.state().unwrap().flags().contains(NodeFlags::DEEP_DIRTY_CHECK));
}

#[test]
fn dirty_check_on_empty_root() {
	let mut root = root();
	root.dirty_check().unwrap();
	assert_eq!(html_of(&root), "");
}

#[test]
fn propagated_flags_lift_self_bits() {
	assert_eq!((NodeFlags::DIRTY | NodeFlags::DIRTY_CHECK).propagated(), NodeFlags::DEEP_DIRTY_CHECK);
	assert_eq!((NodeFlags::UNMOUNT | NodeFlags::DEEP_DIRTY_CHECK).propagated(), NodeFlags::DEEP_DIRTY_CHECK | NodeFlags::DEEP_UNMOUNT);
	assert_eq!((NodeFlags::DIRTY | NodeFlags::DEEP_UNMOUNT).own(), NodeFlags::DIRTY);
	assert!(NodeFlags::empty().propagated().is_empty());
}

#[test]
fn reused_subtree_counts_each_level_once() {
	let (invalidator, renders) = (Rc::new(RefCell::new(None)), Rc::new(Cell::new(0)));
	let empty = {
		let (invalidator, renders) = (invalidator.clone(), renders.clone());
		Component::new("Empty", move |hooks: &mut Hooks<'_>| {
			*invalidator.borrow_mut() = Some(hooks.invalidator());
			let renders = renders.clone();
			move |_: &()| -> Option<Op> {
				renders.set(renders.get() + 1);
				None
			}
		})
	};

	let mut dom = MemoryDom::new();
	let container = dom.create_container();
	let mut root = Root::with_config(dom, container, Config { depth_limit: 4 });

	// Three elements and the component use up the whole budget.
	let tree = div(div(div(empty.op(()))));
	root.render(tree.clone()).unwrap();
	root.render(tree.clone()).unwrap();
	assert_eq!(renders.get(), 1);

	invalidator.borrow().as_ref().unwrap().invalidate();
	root.render(tree).unwrap();
	assert_eq!(renders.get(), 2);
	assert_eq!(html_of(&root), "<div><div><div></div></div></div>");
}
