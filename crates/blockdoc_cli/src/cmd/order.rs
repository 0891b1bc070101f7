use std::path::PathBuf;

use blockdoc::doc::{ChildOrder, Result, SanitizeOptions, compute_serialization_order, sanitize};

use crate::cmd::util::{emit_json, load};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Order the child-link arrays as stored instead of classifying them first.
	#[arg(long = "no-classify")]
	pub no_classify: bool,
	/// Force geometry children `first` or `last` regardless of document version.
	#[arg(long = "child-order")]
	pub child_order: Option<ChildOrder>,
	#[arg(long)]
	pub json: bool,
}

/// Print the serialization order the sanitize pass would apply with the same flags.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		no_classify,
		child_order,
		json,
	} = args;

	let mut graph = load(&path)?.graph;
	// classification only, block indices stay as loaded
	let options = SanitizeOptions {
		classify_children: !no_classify,
		child_order,
		reorder_blocks: false,
		roles: Vec::new(),
		..SanitizeOptions::default()
	};
	sanitize(&mut graph, &options)?;
	let masks = options.categories.resolve(&graph.types);
	let order = compute_serialization_order(&graph, &masks)?;
	let moved = order.new_to_old().iter().enumerate().filter(|(new, old)| *new != **old as usize).count();

	if json {
		emit_json(&OrderJson {
			path: path.display().to_string(),
			moved,
			new_to_old: order.new_to_old().to_vec(),
			blocks: order
				.new_to_old()
				.iter()
				.enumerate()
				.map(|(new, old)| OrderEntryJson {
					new,
					old: *old,
					type_name: graph.type_name_of(*old as usize).to_owned(),
				})
				.collect(),
		})?;
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("moved: {moved}");
	println!("order:");
	for (new, old) in order.new_to_old().iter().enumerate() {
		let marker = if new == *old as usize { ' ' } else { '*' };
		println!("  {marker}{new:>4} <- {old:<4} {}", graph.type_name_of(*old as usize));
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct OrderJson {
	path: String,
	moved: usize,
	new_to_old: Vec<u32>,
	blocks: Vec<OrderEntryJson>,
}

#[derive(serde::Serialize)]
struct OrderEntryJson {
	new: usize,
	old: u32,
	#[serde(rename = "type")]
	type_name: String,
}
