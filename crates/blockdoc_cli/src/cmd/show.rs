use std::path::PathBuf;

use blockdoc::doc::{DocError, FieldPath, Result};

use crate::cmd::util::{emit_json, fields_json, load, print_value, value_json};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub block: usize,
	/// Field path inside the block, e.g. `Children[0]` or `Dimensions.x`.
	#[arg(long = "path")]
	pub field_path: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print a block's fields, or one value addressed by a field path.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		block: index,
		field_path,
		json,
	} = args;

	let graph = load(&path)?.graph;
	let block = graph.require_block(index)?;
	let type_name = graph.types.name(block.type_id);

	if let Some(expr) = field_path {
		let parsed = FieldPath::parse(&expr)?;
		let value = block.value_at(&parsed).ok_or_else(|| DocError::FieldNotFound {
			block: index,
			path: parsed.to_string(),
		})?;

		if json {
			emit_json(&serde_json::json!({
				"path": path.display().to_string(),
				"block": index,
				"type": type_name,
				"field_path": parsed.to_string(),
				"value": value_json(&graph, value),
			}))?;
			return Ok(());
		}

		println!("block: {index} ({type_name})");
		print_value(&graph, &parsed.to_string(), value, 0);
		return Ok(());
	}

	if json {
		emit_json(&serde_json::json!({
			"path": path.display().to_string(),
			"block": index,
			"type": type_name,
			"fields": fields_json(&graph, &block.fields),
		}))?;
		return Ok(());
	}

	println!("block: {index} ({type_name})");
	for field in &block.fields {
		print_value(&graph, &field.name, &field.value, 2);
	}

	Ok(())
}
