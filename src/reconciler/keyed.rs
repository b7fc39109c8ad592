use super::{Cursor, Env, Reconciler};
use crate::{
	component::UnmountReason,
	dom::Dom,
	lis::longest_increasing_subsequence,
	op::{Key, KeyedEntry},
	state::StateNode,
	Error,
};
use core::iter;
use hashbrown::HashMap;
use tracing::{debug, trace, trace_span};

impl<D: Dom> Reconciler<D> {
	/// Reconciles a keyed list, reusing the state of entries whose key is still present and moving as few
	/// DOM nodes as possible.
	///
	/// 1. Entries with equal keys at the end of both lists are updated right away, entries with equal keys at
	///    the start are only counted. Their updates must run last because of the right-to-left cursor.
	/// 2. If one side is exhausted, the rest of the other is mounted or unmounted.
	/// 3. Otherwise, old entries are matched by key. Unmatched old entries are unmounted. If the matched entries
	///    kept their relative order, everything is updated in place. If not, the longest increasing subsequence
	///    of their old positions stays put and all other matched entries are moved.
	#[allow(clippy::too_many_arguments)]
	#[allow(clippy::too_many_lines)]
	pub(crate) fn update_keyed(
		&mut self,
		at: &mut Cursor<D::Node>,
		children: &mut Vec<Option<StateNode<D::Node>>>,
		a: &[KeyedEntry],
		b: &[KeyedEntry],
		env: Env<'_>,
		move_node: bool,
		single_child: bool,
	) -> Result<(), Error> {
		let span = trace_span!("Diffing keyed", "a.len()" = a.len(), "b.len()" = b.len());
		let _enter = span.enter();

		if cfg!(any(debug_assertions, feature = "debug-checks")) {
			assert_eq!(children.len(), a.len(), "keyed state doesn't match its previous operation");
		}

		if b.is_empty() {
			if !a.is_empty() {
				self.unmount_children(&at.parent, children, single_child, UnmountReason::Removed)?;
			}
			return Ok(());
		}
		if a.is_empty() {
			*children = self.mount_entries(at, b, |entry| entry.op.as_ref(), env)?;
			return Ok(());
		}

		let mut old = core::mem::take(children);
		let mut result: Vec<Option<StateNode<D::Node>>> = iter::repeat_with(|| None).take(b.len()).collect();

		// Exclusive ends of the still unmatched middle ranges `start..a_end` and `start..b_end`.
		let mut start = 0;
		let mut a_end = a.len();
		let mut b_end = b.len();

		while start < a_end && start < b_end && a[a_end - 1].key == b[b_end - 1].key {
			a_end -= 1;
			b_end -= 1;
			let mut state = old[a_end].take();
			self.update_at(at, &mut state, b[b_end].op.as_ref(), env, move_node, false)?;
			result[b_end] = state;
		}
		while start < a_end && start < b_end && a[start].key == b[start].key {
			start += 1;
		}
		trace!(start, a_end, b_end, "Trimmed common prefix and suffix");

		if start == a_end {
			for i in (start..b_end).rev() {
				result[i] = self.mount_optional(at, b[i].op.as_ref(), env)?;
			}
		} else if start == b_end {
			for mut state in old[start..a_end].iter_mut().filter_map(Option::take) {
				self.unmount_node(&at.parent, &mut state, false, UnmountReason::Removed)?;
			}
		} else {
			let a_len = a_end - start;
			let b_len = b_end - start;

			// For each new entry in the middle range, its old position if it has one.
			let mut sources: Vec<Option<usize>> = vec![None; b_len];
			let key_index: HashMap<&Key, usize> = (start..b_end).map(|j| (&b[j].key, j)).collect();

			let mut moved = false;
			let mut last = 0;
			let mut updated = 0;
			for (i, entry) in a.iter().enumerate().take(a_end).skip(start) {
				if updated == b_len {
					break;
				}
				if let Some(&j) = key_index.get(&entry.key) {
					if last > j {
						moved = true;
					} else {
						last = j;
					}
					sources[j - start] = Some(i);
					result[j] = old[i].take();
					updated += 1;
				}
			}

			if a_len == a.len() && updated == 0 {
				debug!("No keys in common, remounting all entries");
				self.unmount_children(&at.parent, &mut old, single_child, UnmountReason::Removed)?;
				for i in (0..b.len()).rev() {
					result[i] = self.mount_optional(at, b[i].op.as_ref(), env)?;
				}
			} else {
				for mut state in old[start..a_end].iter_mut().filter_map(Option::take) {
					self.unmount_node(&at.parent, &mut state, false, UnmountReason::Removed)?;
				}

				if move_node || !moved {
					for i in (start..b_end).rev() {
						if sources[i - start].is_some() {
							self.update_at(at, &mut result[i], b[i].op.as_ref(), env, move_node, false)?;
						} else {
							result[i] = self.mount_optional(at, b[i].op.as_ref(), env)?;
						}
					}
				} else {
					let stable = longest_increasing_subsequence(&sources);
					trace!(matched = updated, stable = stable.len(), "Moving entries outside the longest increasing subsequence");
					let mut stable = stable.iter().rev().peekable();
					for i in (start..b_end).rev() {
						let position = i - start;
						if sources[position].is_some() {
							let in_place = stable.peek() == Some(&&position);
							if in_place {
								stable.next();
							}
							self.update_at(at, &mut result[i], b[i].op.as_ref(), env, !in_place, false)?;
						} else {
							result[i] = self.mount_optional(at, b[i].op.as_ref(), env)?;
						}
					}
				}
			}
		}

		for i in (0..start).rev() {
			let mut state = old[i].take();
			self.update_at(at, &mut state, b[i].op.as_ref(), env, move_node, false)?;
			result[i] = state;
		}

		*children = result;
		Ok(())
	}
}
