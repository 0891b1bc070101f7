use std::path::PathBuf;

use blockdoc::doc::{ChildOrder, Result};

use crate::cmd::util::{Loaded, emit_json, load};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print version header, block counts, roots, and type histogram.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let Loaded { graph, compression } = load(&path)?;
	let child_order = ChildOrder::applies_to(&graph.version).then(|| ChildOrder::for_version(&graph.version));
	let histogram = graph.type_histogram();

	if json {
		emit_json(&InfoJson {
			path: path.display().to_string(),
			compression: compression.as_str(),
			version: graph.version.dotted(),
			user_version: graph.version.user_version,
			feature_level: graph.version.feature_level,
			child_order: child_order.map(ChildOrder::as_str),
			block_count: graph.len(),
			type_count: graph.types.len(),
			roots: graph.roots.clone(),
			types: histogram
				.iter()
				.map(|(name, count)| TypeCountJson {
					name: (*name).to_owned(),
					count: *count,
				})
				.collect(),
		})?;
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("compression: {}", compression.as_str());
	println!("version: {}", graph.version.dotted());
	println!("user_version: {}", graph.version.user_version);
	println!("feature_level: {}", graph.version.feature_level);
	println!("child_order: {}", child_order.map_or("unchanged", ChildOrder::as_str));
	println!("block_count: {}", graph.len());
	println!("type_count: {}", graph.types.len());
	let roots: Vec<String> = graph.roots.iter().map(|root| root.to_string()).collect();
	println!("roots: [{}]", roots.join(", "));

	println!("block_types:");
	for (name, count) in histogram {
		println!("  {name}: {count}");
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	compression: &'static str,
	version: String,
	user_version: u32,
	feature_level: u32,
	child_order: Option<&'static str>,
	block_count: usize,
	type_count: usize,
	roots: Vec<u32>,
	types: Vec<TypeCountJson>,
}

#[derive(serde::Serialize)]
struct TypeCountJson {
	name: String,
	count: usize,
}
