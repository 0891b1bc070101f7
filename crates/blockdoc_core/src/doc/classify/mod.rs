use std::str::FromStr;

use tracing::debug;

use crate::doc::{CategoryMasks, DocError, DocVersion, Graph, LinkArrayRole, Result, Value};

/// Feature level at which geometry children moved after other children.
pub const FEATURE_LEVEL_GEOMETRY_LAST: u32 = 83;

/// Oldest packed format version whose child arrays are reordered.
const MIN_CLASSIFY_VERSION: u32 = 0x1400_0004;

/// Placement of geometry children inside a child-link array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOrder {
	/// Geometry before other children (feature level below 83).
	GeometryFirst,
	/// Geometry after other children (feature level 83 and above).
	GeometryLast,
}

impl ChildOrder {
	/// Order selected by a document's feature level.
	pub fn for_version(version: &DocVersion) -> Self {
		if version.feature_level < FEATURE_LEVEL_GEOMETRY_LAST {
			Self::GeometryFirst
		} else {
			Self::GeometryLast
		}
	}

	/// Whether child arrays of this document version are reordered at all.
	pub fn applies_to(version: &DocVersion) -> bool {
		version.number >= MIN_CLASSIFY_VERSION && version.feature_level > 0
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::GeometryFirst => "geometry_first",
			Self::GeometryLast => "geometry_last",
		}
	}
}

impl FromStr for ChildOrder {
	type Err = DocError;

	fn from_str(value: &str) -> Result<Self> {
		match value {
			"first" | "geometry_first" => Ok(Self::GeometryFirst),
			"last" | "geometry_last" => Ok(Self::GeometryLast),
			_ => Err(DocError::InvalidChildOrder { value: value.to_owned() }),
		}
	}
}

/// Stable partition of `items` into geometry and non-geometry buckets.
pub fn classify_children<T: Clone>(items: &[T], is_geometry: impl Fn(&T) -> bool, order: ChildOrder) -> Vec<T> {
	let (geometry, other): (Vec<T>, Vec<T>) = items.iter().cloned().partition(|item| is_geometry(item));
	match order {
		ChildOrder::GeometryFirst => geometry.into_iter().chain(other).collect(),
		ChildOrder::GeometryLast => other.into_iter().chain(geometry).collect(),
	}
}

/// Rewrite one block's `Children` array in `order`, updating `Num Children`.
///
/// Entries that are not links, hold "no reference", or point outside the graph
/// stay in the non-geometry bucket. Returns whether the block changed.
pub fn classify_child_order(graph: &mut Graph, block: usize, order: ChildOrder, masks: &CategoryMasks) -> Result<bool> {
	let role = LinkArrayRole::children();
	let current = graph.require_block(block)?;
	let (Some(count_idx), Some(array_idx)) = (
		current.fields.iter().position(|field| field.name == role.count),
		current.fields.iter().position(|field| field.name == role.array),
	) else {
		return Ok(false);
	};
	let Value::Array(items) = &current.fields[array_idx].value else {
		return Ok(false);
	};

	let is_geometry = |item: &Value| {
		item.as_link()
			.and_then(|link| link.index())
			.and_then(|target| graph.type_of(target))
			.is_some_and(|ty| masks.is_geometry(ty))
	};
	let sorted = classify_children(items, is_geometry, order);
	let count = sorted.len() as i64;

	let target = graph.require_block_mut(block)?;
	let mut changed = false;
	if let Value::Array(items) = &mut target.fields[array_idx].value {
		if *items != sorted {
			*items = sorted;
			changed = true;
		}
	}
	let count_field = &mut target.fields[count_idx].value;
	if count_field.as_int() != Some(count) {
		*count_field = Value::Int(count);
		changed = true;
	}

	if changed {
		debug!(block, order = order.as_str(), "child links reclassified");
	}
	Ok(changed)
}

#[cfg(test)]
mod tests;
