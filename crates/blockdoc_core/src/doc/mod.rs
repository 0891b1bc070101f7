mod bitset;
mod block;
mod check;
mod classify;
mod compact;
mod compression;
mod error;
mod file;
mod graph;
mod noneref;
mod order;
mod path;
mod sanitize;
#[cfg(test)]
mod test_support;
mod types;
mod value;

/// Dense bitset keyed by small integer ids.
pub use bitset::BitSet;
/// Block container and link traversal helpers.
pub use block::Block;
/// Link validity checks and violation records.
pub use check::{Violation, check_all_links, check_link_validity};
/// Child-link classification by geometry category.
pub use classify::{ChildOrder, FEATURE_LEVEL_GEOMETRY_LAST, classify_child_order, classify_children};
/// Link array compaction.
pub use compact::{LinkArrayRole, compact_block_link_arrays, compact_link_arrays};
/// Compression detection result.
pub use compression::{Compression, ZSTD_MAGIC};
/// Error and result aliases.
pub use error::{DocError, Result};
/// Snapshot file load/save.
pub use file::{DocumentFile, FileBlock, FileField, FileLink, FileLinkKind, FileType, FileValue, FileVersion};
/// Graph arena, version, and builder.
pub use graph::{DocVersion, Graph, GraphBuilder};
/// Required-link diagnostics.
pub use noneref::{NoneRef, NoneRefRule, NoneRefTarget, find_none_refs};
/// Serialization order computation and block reindexing.
pub use order::{BlockOrder, compute_serialization_order, sanitize_block_order};
/// Field path parser types.
pub use path::{FieldPath, PathStep};
/// Whole-document sanitize pipeline.
pub use sanitize::{SanitizeOptions, SanitizeReport, sanitize};
/// Type registry and category lookups.
pub use types::{Categories, CategoryMasks, TypeDecl, TypeId, TypeRegistry};
/// Field values and links.
pub use value::{Field, Link, LinkKind, NO_LINK, Value};
