use std::fmt;
use std::sync::Arc;

use crate::doc::{BitSet, Block, DocError, Field, Link, Result, TypeId, TypeRegistry, Value};

/// Document version header values that select format-dependent behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocVersion {
	/// Packed format version, one byte per dotted component (`20.2.0.7` = `0x14020007`).
	pub number: u32,
	/// Producer-specific user version.
	pub user_version: u32,
	/// Producer feature level (user version 2 / stream version).
	pub feature_level: u32,
}

impl DocVersion {
	/// Parse a dotted `a.b.c.d` version into its packed form.
	pub fn parse_dotted(input: &str) -> Option<u32> {
		let mut out = 0_u32;
		let mut parts = 0;
		for part in input.split('.') {
			if parts == 4 {
				return None;
			}
			out = (out << 8) | u32::from(part.trim().parse::<u8>().ok()?);
			parts += 1;
		}
		(parts == 4).then_some(out)
	}

	/// Render the packed version as `a.b.c.d`.
	pub fn dotted(&self) -> String {
		let [a, b, c, d] = self.number.to_be_bytes();
		format!("{a}.{b}.{c}.{d}")
	}
}

impl fmt::Display for DocVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (user {}, feature level {})", self.dotted(), self.user_version, self.feature_level)
	}
}

/// In-memory document: block arena, root list, version, and type registry.
///
/// Links are plain arena indices; a block's identity is its position in `blocks`.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
	/// Version header.
	pub version: DocVersion,
	/// Shared type registry for every block's `type_id` and link expectation.
	pub types: Arc<TypeRegistry>,
	/// Blocks in serialization order.
	pub blocks: Vec<Block>,
	/// Root block indices in fixed order.
	pub roots: Vec<u32>,
}

impl Graph {
	/// Create an empty graph.
	pub fn new(types: Arc<TypeRegistry>, version: DocVersion) -> Self {
		Self {
			version,
			types,
			blocks: Vec::new(),
			roots: Vec::new(),
		}
	}

	/// Number of blocks.
	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	/// Whether the graph has no blocks.
	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}

	/// Block at `index`.
	pub fn block(&self, index: usize) -> Option<&Block> {
		self.blocks.get(index)
	}

	/// Block at `index`, failing when out of range.
	pub fn require_block(&self, index: usize) -> Result<&Block> {
		self.blocks.get(index).ok_or(DocError::BlockOutOfRange { index, count: self.blocks.len() })
	}

	/// Mutable block at `index`, failing when out of range.
	pub fn require_block_mut(&mut self, index: usize) -> Result<&mut Block> {
		let count = self.blocks.len();
		self.blocks.get_mut(index).ok_or(DocError::BlockOutOfRange { index, count })
	}

	/// Current type of the block at `index`.
	pub fn type_of(&self, index: usize) -> Option<TypeId> {
		self.blocks.get(index).map(|block| block.type_id)
	}

	/// Type name of the block at `index`.
	pub fn type_name_of(&self, index: usize) -> &str {
		match self.type_of(index) {
			Some(ty) => self.types.name(ty),
			None => "<none>",
		}
	}

	/// Append a block and return its index.
	pub fn push_block(&mut self, block: Block) -> u32 {
		self.blocks.push(block);
		(self.blocks.len() - 1) as u32
	}

	/// Blocks not referenced as a child by any block, in index order.
	pub fn derive_roots(&self) -> Vec<u32> {
		let mut owned = BitSet::new(self.blocks.len());
		for block in &self.blocks {
			for target in block.child_targets() {
				owned.insert(target);
			}
		}
		(0..self.blocks.len()).filter(|idx| !owned.contains(*idx)).map(|idx| idx as u32).collect()
	}

	/// Block counts per type name, sorted by name.
	pub fn type_histogram(&self) -> Vec<(&str, usize)> {
		let mut counts = vec![0_usize; self.types.len()];
		for block in &self.blocks {
			if let Some(slot) = counts.get_mut(block.type_id.index()) {
				*slot += 1;
			}
		}
		let mut out: Vec<(&str, usize)> = self.types.ids().filter(|id| counts[id.index()] > 0).map(|id| (self.types.name(id), counts[id.index()])).collect();
		out.sort();
		out
	}
}

/// Incremental graph construction resolving type names against a registry.
pub struct GraphBuilder {
	graph: Graph,
	roots: Option<Vec<u32>>,
}

impl GraphBuilder {
	/// Start an empty graph over `types`.
	pub fn new(types: impl Into<Arc<TypeRegistry>>) -> Self {
		Self {
			graph: Graph::new(types.into(), DocVersion::default()),
			roots: None,
		}
	}

	/// Set the version header.
	pub fn version(mut self, version: DocVersion) -> Self {
		self.graph.version = version;
		self
	}

	/// Fix the root list instead of deriving it at build time.
	pub fn roots(mut self, roots: Vec<u32>) -> Self {
		self.roots = Some(roots);
		self
	}

	/// Append a block of type `type_name`.
	pub fn block(&mut self, type_name: &str, fields: Vec<Field>) -> Result<u32> {
		let type_id = self.graph.types.require(type_name)?;
		Ok(self.graph.push_block(Block::new(type_id, fields)))
	}

	/// Ownership link expecting `expected`.
	pub fn child(&self, target: i32, expected: Option<&str>) -> Result<Link> {
		Ok(Link::child(target, self.expected(expected)?))
	}

	/// Weak link expecting `expected`.
	pub fn pointer(&self, target: i32, expected: Option<&str>) -> Result<Link> {
		Ok(Link::pointer(target, self.expected(expected)?))
	}

	/// Count field plus link array field, the layout used by reference arrays.
	pub fn counted_links(count_name: &str, array_name: &str, links: Vec<Link>) -> [Field; 2] {
		[
			Field::new(count_name, Value::Int(links.len() as i64)),
			Field::new(array_name, Value::Array(links.into_iter().map(Value::Link).collect())),
		]
	}

	/// Finish the graph, deriving roots when none were fixed.
	pub fn build(self) -> Graph {
		let mut graph = self.graph;
		graph.roots = match self.roots {
			Some(roots) => roots,
			None => graph.derive_roots(),
		};
		graph
	}

	fn expected(&self, name: Option<&str>) -> Result<Option<TypeId>> {
		name.map(|name| self.graph.types.require(name)).transpose()
	}
}
