use std::fmt;
use std::ops::ControlFlow;

use tracing::{debug, warn};

use crate::doc::{Field, FieldPath, Graph, Link, Value};

/// Link that is out of range or points at a block of the wrong type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
	/// Link addresses a block past the end of the block list.
	OutOfRange {
		/// Block holding the link.
		block: usize,
		/// Location of the link inside the block.
		field: FieldPath,
		/// Stored link value.
		target: i32,
	},
	/// Link target does not derive from the declared expected type.
	TypeMismatch {
		/// Block holding the link.
		block: usize,
		/// Location of the link inside the block.
		field: FieldPath,
		/// Stored link value.
		target: i32,
		/// Declared expected type.
		expected: Box<str>,
		/// Type of the target block.
		actual: Box<str>,
	},
}

impl Violation {
	/// Block holding the offending link.
	pub fn block(&self) -> usize {
		match self {
			Self::OutOfRange { block, .. } | Self::TypeMismatch { block, .. } => *block,
		}
	}

	/// Location of the offending link.
	pub fn field(&self) -> &FieldPath {
		match self {
			Self::OutOfRange { field, .. } | Self::TypeMismatch { field, .. } => field,
		}
	}

	/// Stored link value.
	pub fn target(&self) -> i32 {
		match self {
			Self::OutOfRange { target, .. } | Self::TypeMismatch { target, .. } => *target,
		}
	}

	/// Stable lowercase kind label.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::OutOfRange { .. } => "out_of_range",
			Self::TypeMismatch { .. } => "type_mismatch",
		}
	}
}

impl fmt::Display for Violation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::OutOfRange { block, field, target } => write!(f, "[{block}] {field}: invalid link {target}"),
			Self::TypeMismatch {
				block,
				field,
				target,
				expected,
				actual,
			} => write!(f, "[{block}] {field}: link {target} points to wrong block type (expected {expected}, got {actual})"),
		}
	}
}

/// First out-of-range or mistyped link, by block index then field order.
pub fn check_link_validity(graph: &Graph) -> Option<Violation> {
	let mut found = None;
	walk_graph(graph, &mut |violation| {
		found = Some(violation);
		ControlFlow::Break(())
	});
	if let Some(violation) = &found {
		warn!(%violation, "link check failed");
	}
	found
}

/// Every out-of-range or mistyped link, in the same order as [`check_link_validity`].
pub fn check_all_links(graph: &Graph) -> Vec<Violation> {
	let mut out = Vec::new();
	walk_graph(graph, &mut |violation| {
		out.push(violation);
		ControlFlow::Continue(())
	});
	debug!(violations = out.len(), blocks = graph.len(), "links checked");
	out
}

type Sink<'s> = dyn FnMut(Violation) -> ControlFlow<()> + 's;

fn walk_graph(graph: &Graph, sink: &mut Sink<'_>) {
	for (block, item) in graph.blocks.iter().enumerate() {
		let mut walker = LinkWalker {
			graph,
			block,
			path: FieldPath::default(),
		};
		if walker.fields(&item.fields, sink).is_break() {
			return;
		}
	}
}

struct LinkWalker<'g> {
	graph: &'g Graph,
	block: usize,
	path: FieldPath,
}

impl LinkWalker<'_> {
	fn fields(&mut self, fields: &[Field], sink: &mut Sink<'_>) -> ControlFlow<()> {
		for field in fields {
			self.path.push_field(&field.name);
			let flow = self.value(&field.value, sink);
			self.path.pop();
			if flow.is_break() {
				return flow;
			}
		}
		ControlFlow::Continue(())
	}

	fn value(&mut self, value: &Value, sink: &mut Sink<'_>) -> ControlFlow<()> {
		match value {
			Value::Link(link) => match self.check(link) {
				Some(violation) => sink(violation),
				None => ControlFlow::Continue(()),
			},
			Value::Array(items) => {
				for (idx, item) in items.iter().enumerate() {
					self.path.push_index(idx);
					let flow = self.value(item, sink);
					self.path.pop();
					if flow.is_break() {
						return flow;
					}
				}
				ControlFlow::Continue(())
			}
			Value::Group(fields) => self.fields(fields, sink),
			_ => ControlFlow::Continue(()),
		}
	}

	fn check(&self, link: &Link) -> Option<Violation> {
		let target = link.index()?;
		let Some(block) = self.graph.block(target) else {
			return Some(Violation::OutOfRange {
				block: self.block,
				field: self.path.clone(),
				target: link.target,
			});
		};

		let expected = link.expected?;
		if self.graph.types.is_a(block.type_id, expected) {
			return None;
		}
		Some(Violation::TypeMismatch {
			block: self.block,
			field: self.path.clone(),
			target: link.target,
			expected: self.graph.types.name(expected).into(),
			actual: self.graph.types.name(block.type_id).into(),
		})
	}
}
