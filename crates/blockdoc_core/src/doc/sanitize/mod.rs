use tracing::debug;

use crate::doc::{BlockOrder, Categories, ChildOrder, Graph, LinkArrayRole, Result, classify_child_order, compact_link_arrays, compute_serialization_order};

/// Steps and parameters of the whole-document sanitize pass.
#[derive(Debug, Clone)]
pub struct SanitizeOptions {
	/// Type categories for classification and ordering.
	pub categories: Categories,
	/// Link arrays collapsed after reordering.
	pub roles: Vec<LinkArrayRole>,
	/// Reorder child-link arrays by geometry category.
	pub classify_children: bool,
	/// Force a child order instead of deriving it from the document version.
	pub child_order: Option<ChildOrder>,
	/// Recompute the serialization order of all blocks.
	pub reorder_blocks: bool,
}

impl Default for SanitizeOptions {
	fn default() -> Self {
		Self {
			categories: Categories::default(),
			roles: LinkArrayRole::defaults(),
			classify_children: true,
			child_order: None,
			reorder_blocks: true,
		}
	}
}

/// What a sanitize pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeReport {
	/// Child order applied, when classification ran.
	pub child_order: Option<ChildOrder>,
	/// Blocks whose child arrays changed, by index before reordering.
	pub reclassified: Vec<usize>,
	/// Serialization order applied, when reordering ran.
	pub order: Option<BlockOrder>,
	/// Blocks that changed position.
	pub moved: usize,
	/// "No reference" entries dropped from link arrays.
	pub removed_none_links: usize,
}

/// Classify child links, reorder blocks, and compact link arrays.
///
/// Works on a copy that replaces `graph` only when every step succeeded, so a
/// corrupt block tree leaves `graph` untouched.
pub fn sanitize(graph: &mut Graph, options: &SanitizeOptions) -> Result<SanitizeReport> {
	let masks = options.categories.resolve(&graph.types);
	let mut work = graph.clone();
	let mut report = SanitizeReport::default();

	if options.classify_children {
		let version = work.version;
		let order = options
			.child_order
			.or_else(|| ChildOrder::applies_to(&version).then(|| ChildOrder::for_version(&version)));
		if let Some(order) = order {
			for idx in 0..work.len() {
				if classify_child_order(&mut work, idx, order, &masks)? {
					report.reclassified.push(idx);
				}
			}
			report.child_order = Some(order);
		}
	}

	if options.reorder_blocks {
		let order = compute_serialization_order(&work, &masks)?;
		report.moved = order.new_to_old().iter().enumerate().filter(|(new, old)| *new != **old as usize).count();
		work = work.reordered(&order)?;
		report.order = Some(order);
	}

	report.removed_none_links = compact_link_arrays(&mut work, &options.roles);

	*graph = work;
	debug!(
		reclassified = report.reclassified.len(),
		moved = report.moved,
		removed = report.removed_none_links,
		"sanitize committed"
	);
	Ok(report)
}
