use std::path::PathBuf;

use blockdoc::doc::{ChildOrder, DocumentFile, Result, SanitizeOptions, sanitize};
use tracing::info;

use crate::cmd::util::{emit_json, load};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Write the sanitized document here; `.zst` selects zstd compression.
	#[arg(long)]
	pub out: Option<PathBuf>,
	/// Leave child-link arrays in their stored order.
	#[arg(long = "no-classify")]
	pub no_classify: bool,
	/// Force geometry children `first` or `last` regardless of document version.
	#[arg(long = "child-order")]
	pub child_order: Option<ChildOrder>,
	#[arg(long)]
	pub json: bool,
}

/// Run the sanitize pass and optionally save the result.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		out,
		no_classify,
		child_order,
		json,
	} = args;

	let mut graph = load(&path)?.graph;
	let options = SanitizeOptions {
		classify_children: !no_classify,
		child_order,
		..SanitizeOptions::default()
	};
	let report = sanitize(&mut graph, &options)?;

	if let Some(out) = &out {
		DocumentFile::from_graph(&graph).save(out)?;
		info!(out = %out.display(), "sanitized document written");
	}

	let new_to_old = report.order.as_ref().map(|order| order.new_to_old().to_vec()).unwrap_or_default();
	if json {
		emit_json(&SanitizeJson {
			path: path.display().to_string(),
			out: out.as_ref().map(|out| out.display().to_string()),
			child_order: report.child_order.map(ChildOrder::as_str),
			reclassified: report.reclassified.clone(),
			moved: report.moved,
			removed_none_links: report.removed_none_links,
			new_to_old,
		})?;
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("child_order: {}", report.child_order.map_or("unchanged", ChildOrder::as_str));
	println!("reclassified: {}", report.reclassified.len());
	println!("moved: {}", report.moved);
	println!("removed_none_links: {}", report.removed_none_links);
	if let Some(out) = out {
		println!("out: {}", out.display());
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct SanitizeJson {
	path: String,
	out: Option<String>,
	child_order: Option<&'static str>,
	reclassified: Vec<usize>,
	moved: usize,
	removed_none_links: usize,
	new_to_old: Vec<u32>,
}
