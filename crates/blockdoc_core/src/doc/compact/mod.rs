use tracing::debug;

use crate::doc::{Block, Field, Graph, Value};

/// Count field paired with the link array it sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkArrayRole {
	/// Scalar element-count field.
	pub count: Box<str>,
	/// Link array field.
	pub array: Box<str>,
}

impl LinkArrayRole {
	/// Pair `count` with `array`.
	pub fn new(count: &str, array: &str) -> Self {
		Self {
			count: count.into(),
			array: array.into(),
		}
	}

	/// Ownership children of a node.
	pub fn children() -> Self {
		Self::new("Num Children", "Children")
	}

	/// Roles collapsed by the sanitize pass: children, properties, extra data, modifiers.
	pub fn defaults() -> Vec<Self> {
		vec![
			Self::children(),
			Self::new("Num Properties", "Properties"),
			Self::new("Num Extra Data List", "Extra Data List"),
			Self::new("Num Modifiers", "Modifiers"),
		]
	}
}

/// Remove "no reference" entries from every role array of every block.
///
/// Returns the number of removed entries; a second run always removes none.
pub fn compact_link_arrays(graph: &mut Graph, roles: &[LinkArrayRole]) -> usize {
	let removed: usize = graph.blocks.iter_mut().map(|block| compact_block_link_arrays(block, roles)).sum();
	debug!(removed, blocks = graph.blocks.len(), "link arrays compacted");
	removed
}

/// Compact one block, including role pairs nested inside field groups.
pub fn compact_block_link_arrays(block: &mut Block, roles: &[LinkArrayRole]) -> usize {
	compact_fields(&mut block.fields, roles)
}

fn compact_fields(fields: &mut [Field], roles: &[LinkArrayRole]) -> usize {
	let mut removed = 0;
	for role in roles {
		let count_idx = fields.iter().position(|field| field.name == role.count);
		let array_idx = fields.iter().position(|field| field.name == role.array);
		let (Some(count_idx), Some(array_idx)) = (count_idx, array_idx) else {
			continue;
		};

		let Value::Array(items) = &mut fields[array_idx].value else {
			continue;
		};
		let before = items.len();
		items.retain(|item| !item.as_link().is_some_and(|link| link.is_none()));
		let len = items.len();
		removed += before - len;

		fields[count_idx].value = Value::Int(len as i64);
	}

	for field in fields.iter_mut() {
		if let Value::Group(inner) = &mut field.value {
			removed += compact_fields(inner, roles);
		}
	}
	removed
}

#[cfg(test)]
mod tests;
