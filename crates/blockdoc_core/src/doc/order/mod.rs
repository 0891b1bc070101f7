use tracing::{debug, warn};

use crate::doc::{BitSet, CategoryMasks, DocError, Graph, Result};

/// Bijection between old and new block indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOrder {
	new_to_old: Vec<u32>,
	old_to_new: Vec<u32>,
}

impl BlockOrder {
	/// Order that keeps every block in place.
	pub fn identity(len: usize) -> Self {
		let seq: Vec<u32> = (0..len as u32).collect();
		Self {
			new_to_old: seq.clone(),
			old_to_new: seq,
		}
	}

	/// Build from a sequence listing, for each new position, the old index placed there.
	pub fn from_new_to_old(new_to_old: Vec<u32>) -> Result<Self> {
		let len = new_to_old.len();
		let mut old_to_new = vec![u32::MAX; len];
		for (new, old) in new_to_old.iter().enumerate() {
			let slot = old_to_new.get_mut(*old as usize).ok_or(DocError::NotAPermutation { index: *old })?;
			if *slot != u32::MAX {
				return Err(DocError::NotAPermutation { index: *old });
			}
			*slot = new as u32;
		}
		Ok(Self { new_to_old, old_to_new })
	}

	/// Number of blocks covered.
	pub fn len(&self) -> usize {
		self.new_to_old.len()
	}

	/// Whether the order covers no blocks.
	pub fn is_empty(&self) -> bool {
		self.new_to_old.is_empty()
	}

	/// Old index placed at each new position.
	pub fn new_to_old(&self) -> &[u32] {
		&self.new_to_old
	}

	/// New position of each old index.
	pub fn old_to_new(&self) -> &[u32] {
		&self.old_to_new
	}

	/// New position of the block at `old`.
	pub fn new_index(&self, old: usize) -> Option<u32> {
		self.old_to_new.get(old).copied()
	}

	/// Order that undoes this one.
	pub fn inverse(&self) -> Self {
		Self {
			new_to_old: self.old_to_new.clone(),
			old_to_new: self.new_to_old.clone(),
		}
	}

	/// Whether no block moves.
	pub fn is_identity(&self) -> bool {
		self.new_to_old.iter().enumerate().all(|(new, old)| new == *old as usize)
	}
}

enum Visit {
	Add(usize),
	Emit(usize),
}

/// Compute the serialization order of every block.
///
/// Blocks are visited depth-first from each root in root order. A constraint's
/// entities come first, then attachment children, then the block itself, then
/// its remaining children. Fails with [`DocError::CorruptGraph`] when some block
/// is unreachable through child links, and with [`DocError::ReentrantConstraint`]
/// when a constraint is owned below one of its own entities.
pub fn compute_serialization_order(graph: &Graph, masks: &CategoryMasks) -> Result<BlockOrder> {
	let count = graph.len();
	let mut visited = BitSet::new(count);
	let mut emitted = BitSet::new(count);
	let mut out: Vec<u32> = Vec::with_capacity(count);
	let mut stack = Vec::new();
	let mut dangling = 0_usize;

	for root in &graph.roots {
		let root = *root as usize;
		if root >= count {
			warn!(root, count, "root index out of range, skipped");
			continue;
		}

		stack.push(Visit::Add(root));
		while let Some(step) = stack.pop() {
			let idx = match step {
				Visit::Emit(idx) => {
					emitted.insert(idx);
					out.push(idx as u32);
					continue;
				}
				Visit::Add(idx) => idx,
			};
			if !visited.insert(idx) {
				continue;
			}

			let block = &graph.blocks[idx];
			let mut before = Vec::new();
			let mut after = Vec::new();
			for target in block.child_targets() {
				match graph.type_of(target) {
					Some(ty) if masks.precedes_parent(ty) => before.push(target),
					Some(_) => after.push(target),
					None => dangling += 1,
				}
			}

			stack.extend(after.into_iter().rev().map(Visit::Add));
			stack.push(Visit::Emit(idx));
			stack.extend(before.into_iter().rev().map(Visit::Add));
			if masks.is_constraint(block.type_id) {
				let entities: Vec<usize> = block.link_targets(masks.entities_field()).into_iter().filter(|target| *target < count).collect();
				if let Some(entity) = entities.iter().copied().find(|entity| visited.contains(*entity) && !emitted.contains(*entity)) {
					warn!(constraint = idx, entity, "failed to sanitize block order, constraint owned below its entity");
					return Err(DocError::ReentrantConstraint { constraint: idx, entity });
				}
				stack.extend(entities.into_iter().rev().map(Visit::Add));
			}
		}
	}

	if dangling > 0 {
		warn!(dangling, "child links past the end of the block list were not followed");
	}

	if out.len() != count {
		let unreachable: Vec<u32> = (0..count).filter(|idx| !visited.contains(*idx)).map(|idx| idx as u32).collect();
		warn!(ordered = out.len(), expected = count, "failed to sanitize block order, corrupt block tree?");
		return Err(DocError::CorruptGraph {
			expected: count,
			ordered: out.len(),
			unreachable,
		});
	}

	BlockOrder::from_new_to_old(out)
}

/// Compute the serialization order and return the reindexed graph.
///
/// `graph` is never modified; on error nothing has been remapped.
pub fn sanitize_block_order(graph: &Graph, masks: &CategoryMasks) -> Result<Graph> {
	let order = compute_serialization_order(graph, masks)?;
	let moved = order.new_to_old().iter().enumerate().filter(|(new, old)| *new != **old as usize).count();
	debug!(blocks = graph.len(), moved, "block order computed");
	graph.reordered(&order)
}

impl Graph {
	/// Copy of this graph with blocks moved by `order` and every link remapped.
	///
	/// Link values past the end of the block list are left as they are.
	pub fn reordered(&self, order: &BlockOrder) -> Result<Graph> {
		let count = self.len();
		if order.len() != count {
			return Err(DocError::OrderLengthMismatch { expected: count, got: order.len() });
		}

		let remap = |target: usize| order.old_to_new.get(target).copied();
		let mut blocks = Vec::with_capacity(count);
		for old in &order.new_to_old {
			let mut block = self.blocks[*old as usize].clone();
			block.for_each_link_mut(|link| {
				if let Some(new) = link.index().and_then(remap) {
					link.target = new as i32;
				}
			});
			blocks.push(block);
		}

		let roots = self.roots.iter().map(|root| remap(*root as usize).unwrap_or(*root)).collect();

		Ok(Graph {
			version: self.version,
			types: self.types.clone(),
			blocks,
			roots,
		})
	}

	/// Replace this graph with its reordered copy in one step.
	pub fn apply_order(&mut self, order: &BlockOrder) -> Result<()> {
		*self = self.reordered(order)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests;
