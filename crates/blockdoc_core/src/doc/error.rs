use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, DocError>;

/// Errors produced while building, reordering, loading, and saving block documents.
#[derive(Debug, Error)]
pub enum DocError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Snapshot JSON could not be parsed or written.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Snapshot bytes start with neither JSON nor a zstd frame.
	#[error("unsupported compression or not a block document (magic={magic:?})")]
	UnknownMagic {
		/// First up-to-4 bytes of the stream.
		magic: [u8; 4],
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Snapshot version string is not a dotted `a.b.c.d` version.
	#[error("invalid document version: {value}")]
	InvalidVersion {
		/// Original version text.
		value: String,
	},
	/// Type name is not declared in the registry.
	#[error("unknown block type: {name}")]
	UnknownType {
		/// Requested type name.
		name: String,
	},
	/// Type name declared more than once.
	#[error("duplicate block type: {name}")]
	DuplicateType {
		/// Repeated type name.
		name: String,
	},
	/// Type inherits from itself through its parents.
	#[error("inheritance cycle through type {name}")]
	InheritanceCycle {
		/// Type where the cycle was detected.
		name: String,
	},
	/// Registry cannot address more types.
	#[error("too many block types: {count}")]
	TooManyTypes {
		/// Number of declared types.
		count: usize,
	},
	/// Serialization order did not cover every block.
	#[error("failed to sanitize block order, corrupt block tree? ordered {ordered} of {expected} blocks, unreachable={unreachable:?}")]
	CorruptGraph {
		/// Total block count.
		expected: usize,
		/// Number of blocks reached from the roots.
		ordered: usize,
		/// Blocks never reached through child links.
		unreachable: Vec<u32>,
	},
	/// Constraint was reached from inside one of its own entities, so the entity cannot precede it.
	#[error("failed to sanitize block order, corrupt block tree? constraint {constraint} is owned below its entity {entity}")]
	ReentrantConstraint {
		/// Constraint block.
		constraint: usize,
		/// Entity still being ordered when the constraint was reached.
		entity: usize,
	},
	/// Block index addressed a block past the end of the arena.
	#[error("block index {index} out of range (count={count})")]
	BlockOutOfRange {
		/// Requested block index.
		index: usize,
		/// Number of blocks in the graph.
		count: usize,
	},
	/// Order length does not match the block count.
	#[error("block order covers {got} blocks, graph has {expected}")]
	OrderLengthMismatch {
		/// Block count of the graph.
		expected: usize,
		/// Length of the supplied order.
		got: usize,
	},
	/// Order sequence repeats or skips a block.
	#[error("block order is not a permutation: index {index} repeated or out of range")]
	NotAPermutation {
		/// First offending old index.
		index: u32,
	},
	/// Field path expression syntax is invalid.
	#[error("invalid field path: {path}")]
	InvalidFieldPath {
		/// Original user-provided path string.
		path: String,
	},
	/// Field path did not resolve inside the block.
	#[error("field path not found in block {block}: {path}")]
	FieldNotFound {
		/// Block index searched.
		block: usize,
		/// Rendered path.
		path: String,
	},
	/// CLI child-order argument was invalid.
	#[error("invalid child order: {value} (expected first or last)")]
	InvalidChildOrder {
		/// User-provided value.
		value: String,
	},
}
