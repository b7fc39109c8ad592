//! Longest increasing subsequence, used to keep the largest possible set of keyed entries in place.

/// Returns the positions (indices into `sources`) of one longest strictly increasing subsequence of the
/// [`Some`] values in `sources`, in ascending order.
///
/// [`None`] entries mark keyed entries without a previous position. They are skipped entirely and never
/// appear in the result.
///
/// Runs in *O(n log n)* with patience sorting: `tails[k]` holds the position of the smallest value that
/// ends an increasing run of length `k + 1`, `predecessors` links each placed position to the one before it.
///
/// ```
/// use ivy_dom::lis::longest_increasing_subsequence;
///
/// assert_eq!(longest_increasing_subsequence(&[Some(0), Some(2), Some(1), Some(3)]), vec![0, 2, 3]);
/// assert_eq!(longest_increasing_subsequence(&[None, Some(4), None, Some(5)]), vec![1, 3]);
/// ```
#[must_use]
pub fn longest_increasing_subsequence(sources: &[Option<usize>]) -> Vec<usize> {
	let mut predecessors: Vec<Option<usize>> = vec![None; sources.len()];
	let mut tails: Vec<usize> = Vec::new();

	for (position, value) in sources.iter().enumerate() {
		let value = match *value {
			Some(value) => value,
			None => continue,
		};
		let value_at = |position: usize| sources[position].unwrap_or(usize::MAX);

		match tails.last() {
			None => tails.push(position),
			Some(&last) if value_at(last) < value => {
				predecessors[position] = Some(last);
				tails.push(position);
			}
			Some(_) => {
				// Some tail is >= value because the last one is.
				let u = tails.partition_point(|&tail| value_at(tail) < value);
				if value < value_at(tails[u]) {
					if u > 0 {
						predecessors[position] = Some(tails[u - 1]);
					}
					tails[u] = position;
				}
			}
		}
	}

	let mut result = vec![0; tails.len()];
	let mut next = tails.last().copied();
	for slot in result.iter_mut().rev() {
		match next {
			Some(position) => {
				*slot = position;
				next = predecessors[position];
			}
			None => break,
		}
	}
	result
}
