use crate::{
	config::Config,
	context::Context,
	dom::Dom,
	op::Op,
	reconciler::Reconciler,
	state::StateNode,
	Error,
};
use tracing::instrument;

/// A container element with one rendered operation tree in it.
///
/// This is what a scheduler drives: [`Root::render`] when there is new input, [`Root::dirty_check`] when
/// components were invalidated or may want to re-render on their own.
#[derive(Debug)]
pub struct Root<D: Dom> {
	reconciler: Reconciler<D>,
	container: D::Node,
	context: Context,
	state: Option<StateNode<D::Node>>,
}

impl<D: Dom> Root<D> {
	/// `container`'s existing children are left alone until the first render that needs to clear it.
	#[must_use]
	pub fn new(dom: D, container: D::Node) -> Self {
		Self::with_config(dom, container, Config::default())
	}

	#[must_use]
	pub fn with_config(dom: D, container: D::Node, config: Config) -> Self {
		Self {
			reconciler: Reconciler::with_config(dom, config),
			container,
			context: Context::new(),
			state: None,
		}
	}

	/// The context every component in this root sees unless a provider overrides it.
	///
	/// Takes effect for components that are mounted or dirty-checked afterwards.
	#[must_use]
	pub fn with_context(mut self, context: Context) -> Self {
		self.context = context;
		self
	}

	/// Renders `op`, or clears the container if it is [`None`].
	///
	/// # Errors
	///
	/// Iff the DOM backend fails or `op` nests deeper than [`Config::depth_limit`].
	/// The rendered state is lost in that case, but the container keeps whatever DOM the pass produced.
	#[instrument(skip_all)]
	pub fn render(&mut self, op: impl Into<Option<Op>>) -> Result<(), Error> {
		let op = op.into();
		let state = self.state.take();
		self.state = self.reconciler.update(&self.container, state, op.as_ref(), &self.context, false, true)?;
		Ok(())
	}

	/// Re-renders invalidated components and those whose dirty-check predicate returns `true`.
	///
	/// # Errors
	///
	/// See [`Root::render`].
	#[instrument(skip_all)]
	pub fn dirty_check(&mut self) -> Result<(), Error> {
		match &mut self.state {
			Some(state) => self.reconciler.dirty_check(&self.container, state, &self.context, false, true),
			None => Ok(()),
		}
	}

	/// Removes everything and runs all unmount callbacks.
	///
	/// # Errors
	///
	/// Iff the DOM backend fails, in which case no unmount callbacks run.
	#[instrument(skip_all)]
	pub fn unmount(&mut self) -> Result<(), Error> {
		match self.state.take() {
			Some(state) => self.reconciler.unmount(&self.container, state, true),
			None => Ok(()),
		}
	}

	#[must_use]
	pub fn state(&self) -> Option<&StateNode<D::Node>> {
		self.state.as_ref()
	}

	#[must_use]
	pub fn container(&self) -> &D::Node {
		&self.container
	}

	#[must_use]
	pub fn dom(&self) -> &D {
		self.reconciler.dom()
	}

	pub fn dom_mut(&mut self) -> &mut D {
		self.reconciler.dom_mut()
	}

	/// See [`Reconciler::clear_prototypes`].
	pub fn clear_prototypes(&mut self) {
		self.reconciler.clear_prototypes();
	}
}
