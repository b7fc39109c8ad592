use harness_::{div, html_of, root};

use ivy_dom::{dom::memory::MemoryDom, Component, Context, Hooks, Op, Root};
use std::{cell::RefCell, rc::Rc};

/// Renders the `theme` it sees at setup and re-renders whenever the context's `theme` differs from that.
fn themed() -> Component<()> {
	Component::new("Themed", |hooks: &mut Hooks<'_>| {
		let theme = Rc::new(RefCell::new(theme_of(hooks.context())));
		hooks.dirty_check({
			let theme = theme.clone();
			move |context: &Context| {
				let current = theme_of(context);
				let changed = *theme.borrow() != current;
				*theme.borrow_mut() = current;
				changed
			}
		});
		move |_: &()| Some(Op::text(theme.borrow().as_str()))
	})
}

fn theme_of(context: &Context) -> String {
	context.get::<String>("theme").cloned().unwrap_or_else(|| "none".to_owned())
}

#[test]
fn providers_layer_values() {
	let outer = Context::new().with("theme", String::from("dark")).with("lang", String::from("en"));
	let inner = Context::new().with("theme", String::from("light"));

	let merged = outer.merge(&inner);
	assert_eq!(merged.get::<String>("theme").map(String::as_str), Some("light"));
	assert_eq!(merged.get::<String>("lang").map(String::as_str), Some("en"));
	assert_eq!(merged.len(), 2);
	assert!(outer.merge(&Context::new()).ptr_eq(&outer));
	assert!(Context::new().merge(&inner).ptr_eq(&inner));
}

#[test]
fn lookups_check_the_type() {
	let context = Context::new().with("size", 3_u32);
	assert_eq!(context.get::<u32>("size"), Some(&3));
	assert_eq!(context.get::<String>("size"), None);
	assert!(context.contains("size"));
	assert!(!context.contains("missing"));
}

#[test]
fn components_read_the_provided_context() {
	let themed = themed();

	let mut root = root();
	root.render(Op::fragment(vec![
		Op::context(Context::new().with("theme", String::from("dark")), div(themed.op(()))),
		themed.op(()),
	]))
	.unwrap();
	assert_eq!(html_of(&root), "<div>dark</div>none");
}

#[test]
fn root_context_is_the_outermost_layer() {
	let mut dom = MemoryDom::new();
	let container = dom.create_container();
	let mut root = Root::new(dom, container).with_context(Context::new().with("theme", String::from("root")));

	root.render(themed().op(())).unwrap();
	assert_eq!(root.dom().inner_html(container), "root");
}

#[test]
fn changed_provider_value_reaches_reused_subtree() {
	let themed = themed();
	let content = div(themed.op(()));

	let mut root = root();
	root.render(Op::context(Context::new().with("theme", String::from("dark")), content.clone())).unwrap();
	assert_eq!(html_of(&root), "<div>dark</div>");

	root.render(Op::context(Context::new().with("theme", String::from("light")), content)).unwrap();
	assert_eq!(html_of(&root), "<div>light</div>");
}

#[test]
fn unchanged_provider_value_is_not_remerged() {
	let themed = themed();
	let value = Context::new().with("theme", String::from("dark"));

	let mut root = root();
	root.render(Op::context(value.clone(), div(themed.op(())))).unwrap();
	root.dom_mut().take_ops();

	root.render(Op::context(value, div(themed.op(())))).unwrap();
	assert_eq!(html_of(&root), "<div>dark</div>");
	assert_eq!(root.dom().ops().total(), 0);
}
