#![doc(html_root_url = "https://docs.rs/ivy-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! A keyed virtual DOM reconciler.
//!
//! Applications describe their UI as an immutable [`Op`] tree. A [`Root`] mounts the first tree into a
//! container and then patches the DOM to each following tree, keeping DOM nodes and [`Component`] instances
//! alive wherever the new tree allows it.
//!
//! Reusing an [`Op`] handle marks a subtree as unchanged. Keyed lists ([`Op::keyed`]) move the smallest
//! possible number of DOM nodes. Components re-render when their props change, when they are invalidated or
//! when their dirty-check predicate asks for it.
//!
//! ```
//! use ivy_dom::{dom::memory::MemoryDom, op::html, Op, Root};
//!
//! let mut dom = MemoryDom::new();
//! let container = dom.create_container();
//! let mut root = Root::new(dom, container);
//!
//! root.render(Op::from(html("p").class("greeting").children(Op::text("Hello!")))).unwrap();
//! assert_eq!(root.dom().inner_html(container), r#"<p class="greeting">Hello!</p>"#);
//! ```

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod attributes;
pub mod component;
mod config;
pub mod context;
pub mod dom;
mod error;
pub mod flags;
pub mod lis;
pub mod op;
mod reconciler;
mod root;
pub mod state;

pub use component::{Component, Hooks, Invalidator, StatelessComponent, UnmountReason};
pub use config::Config;
pub use context::Context;
pub use error::Error;
pub use op::{Key, Op};
pub use reconciler::Reconciler;
pub use root::Root;
pub use state::StateNode;
