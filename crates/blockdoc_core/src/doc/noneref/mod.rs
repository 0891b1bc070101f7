use std::fmt;

use tracing::debug;

use crate::doc::{Graph, Link, Value};

/// Field a [`NoneRefRule`] inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoneRefTarget {
	/// Link array that must not contain "no reference" entries.
	Array(Box<str>),
	/// Single link that must reference a block.
	Link(Box<str>),
}

/// Required-reference rule applied to every block of a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoneRefRule {
	/// Blocks of this type or its subtypes are inspected.
	pub category: Box<str>,
	/// Inspected field.
	pub target: NoneRefTarget,
}

impl NoneRefRule {
	/// Rule requiring `array` on `category` blocks to be free of holes.
	pub fn array(category: &str, array: &str) -> Self {
		Self {
			category: category.into(),
			target: NoneRefTarget::Array(array.into()),
		}
	}

	/// Rule requiring `link` on `category` blocks to be set.
	pub fn link(category: &str, link: &str) -> Self {
		Self {
			category: category.into(),
			target: NoneRefTarget::Link(link.into()),
		}
	}

	/// Property, extra data, and skin skeleton checks.
	pub fn defaults() -> Vec<Self> {
		vec![
			Self::array("NiAVObject", "Properties"),
			Self::array("NiObjectNET", "Extra Data List"),
			Self::link("BSSkin::Instance", "Skeleton Root"),
		]
	}
}

/// Required reference found holding "no reference".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoneRef {
	/// Offending block.
	pub block: usize,
	/// Inspected field.
	pub field: Box<str>,
	/// Number of "no reference" entries; `1` for single links.
	pub none_count: usize,
	/// Whether the field is a link array.
	pub is_array: bool,
}

impl fmt::Display for NoneRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_array {
			write!(f, "[{}] '{}' link array contains {} none refs", self.block, self.field, self.none_count)
		} else {
			write!(f, "[{}] '{}' link is none", self.block, self.field)
		}
	}
}

/// Apply `rules` to every block, in block then rule order.
pub fn find_none_refs(graph: &Graph, rules: &[NoneRefRule]) -> Vec<NoneRef> {
	let resolved: Vec<_> = rules.iter().filter_map(|rule| graph.types.id(&rule.category).map(|ty| (ty, &rule.target))).collect();

	let mut out = Vec::new();
	for (idx, block) in graph.blocks.iter().enumerate() {
		for (category, target) in &resolved {
			if !graph.types.is_a(block.type_id, *category) {
				continue;
			}
			match target {
				NoneRefTarget::Array(name) => {
					let Some(Value::Array(items)) = block.find(name) else {
						continue;
					};
					let none_count = items.iter().filter(|item| item.as_link().is_some_and(Link::is_none)).count();
					if none_count > 0 {
						out.push(NoneRef {
							block: idx,
							field: name.clone(),
							none_count,
							is_array: true,
						});
					}
				}
				NoneRefTarget::Link(name) => {
					if block.find(name).and_then(Value::as_link).is_some_and(Link::is_none) {
						out.push(NoneRef {
							block: idx,
							field: name.clone(),
							none_count: 1,
							is_array: false,
						});
					}
				}
			}
		}
	}
	debug!(found = out.len(), "none refs scanned");
	out
}
