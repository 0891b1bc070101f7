use std::path::PathBuf;

use blockdoc::doc::{NoneRef, NoneRefRule, Result, Violation, check_all_links, check_link_validity, find_none_refs};

use crate::cmd::util::{emit_json, load};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Report every invalid link instead of stopping at the first.
	#[arg(long)]
	pub all: bool,
	#[arg(long)]
	pub json: bool,
}

/// Check links and required references; returns whether every link is valid.
///
/// Required references left empty are reported but do not fail the check.
pub fn run(args: Args) -> Result<bool> {
	let Args { path, all, json } = args;

	let graph = load(&path)?.graph;
	let violations = if all { check_all_links(&graph) } else { check_link_validity(&graph).into_iter().collect() };
	let none_refs = find_none_refs(&graph, &NoneRefRule::defaults());

	if json {
		emit_json(&CheckJson {
			path: path.display().to_string(),
			ok: violations.is_empty(),
			violations: violations.iter().map(ViolationJson::from).collect(),
			none_refs: none_refs.iter().map(NoneRefJson::from).collect(),
		})?;
		return Ok(violations.is_empty());
	}

	println!("path: {}", path.display());
	if violations.is_empty() {
		println!("links: ok");
	} else {
		println!("links: {} invalid", violations.len());
		for violation in &violations {
			println!("  {violation}");
		}
	}
	if !none_refs.is_empty() {
		println!("none_refs: {}", none_refs.len());
		for none_ref in &none_refs {
			println!("  {none_ref}");
		}
	}

	Ok(violations.is_empty())
}

#[derive(serde::Serialize)]
struct CheckJson {
	path: String,
	ok: bool,
	violations: Vec<ViolationJson>,
	none_refs: Vec<NoneRefJson>,
}

#[derive(serde::Serialize)]
struct ViolationJson {
	kind: &'static str,
	block: usize,
	field: String,
	target: i32,
	message: String,
}

impl From<&Violation> for ViolationJson {
	fn from(violation: &Violation) -> Self {
		Self {
			kind: violation.kind(),
			block: violation.block(),
			field: violation.field().to_string(),
			target: violation.target(),
			message: violation.to_string(),
		}
	}
}

#[derive(serde::Serialize)]
struct NoneRefJson {
	block: usize,
	field: String,
	none_count: usize,
	message: String,
}

impl From<&NoneRef> for NoneRefJson {
	fn from(none_ref: &NoneRef) -> Self {
		Self {
			block: none_ref.block,
			field: none_ref.field.to_string(),
			none_count: none_ref.none_count,
			message: none_ref.to_string(),
		}
	}
}
