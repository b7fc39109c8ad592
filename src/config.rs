/// Per-[`Reconciler`](`crate::Reconciler`) settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
	/// How many nested state nodes a single pass may descend through before failing with
	/// [`Error::DepthLimit`](`crate::Error::DepthLimit`) instead of overflowing the stack.
	///
	/// The default fits a 1 MiB stack (the wasm32 default) in unoptimised builds.
	/// Raise it only together with the stack size of the rendering thread.
	pub depth_limit: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self { depth_limit: 64 }
	}
}
