use std::path::Path;

use blockdoc::doc::{Compression, DocumentFile, Field, Graph, Link, Result, Value};
use serde_json::{Map, Value as JsonValue, json};
use tracing::info;

/// Snapshot loaded from disk together with the compression it used.
pub(crate) struct Loaded {
	pub graph: Graph,
	pub compression: Compression,
}

/// Open a snapshot and build its graph.
pub(crate) fn load(path: &Path) -> Result<Loaded> {
	let file = DocumentFile::open(path)?;
	let compression = file.compression;
	let graph = file.into_graph()?;
	info!(path = %path.display(), blocks = graph.len(), compression = compression.as_str(), "document loaded");
	Ok(Loaded { graph, compression })
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(value: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(value)?;
	println!("{text}");
	Ok(())
}

/// Render a link target with the target type, e.g. `3 (NiNode)` or `none`.
pub(crate) fn link_label(graph: &Graph, link: &Link) -> String {
	match link.index() {
		None => "none".to_owned(),
		Some(target) => format!("{target} ({})", graph.type_name_of(target)),
	}
}

/// JSON form of a field value; groups become objects, links carry their target type.
pub(crate) fn value_json(graph: &Graph, value: &Value) -> JsonValue {
	match value {
		Value::Bool(v) => json!(v),
		Value::Int(v) => json!(v),
		Value::Float(v) => json!(v),
		Value::String(v) => json!(v.as_ref()),
		Value::Link(link) => json!({
			"kind": link.kind.as_str(),
			"target": link.target,
			"target_type": link.index().and_then(|target| graph.block(target)).map(|block| graph.types.name(block.type_id)),
			"expected": link.expected.map(|ty| graph.types.name(ty)),
		}),
		Value::Array(items) => JsonValue::Array(items.iter().map(|item| value_json(graph, item)).collect()),
		Value::Group(fields) => JsonValue::Object(fields_json(graph, fields)),
	}
}

/// JSON object of `fields` keyed by field name.
pub(crate) fn fields_json(graph: &Graph, fields: &[Field]) -> Map<String, JsonValue> {
	let mut out = Map::new();
	for field in fields {
		out.insert(field.name.to_string(), value_json(graph, &field.value));
	}
	out
}

/// Print `value` as indented text lines.
pub(crate) fn print_value(graph: &Graph, label: &str, value: &Value, indent: usize) {
	let pad = " ".repeat(indent);
	match value {
		Value::Bool(v) => println!("{pad}{label}: {v}"),
		Value::Int(v) => println!("{pad}{label}: {v}"),
		Value::Float(v) => println!("{pad}{label}: {v}"),
		Value::String(v) => println!("{pad}{label}: {v:?}"),
		Value::Link(link) => println!("{pad}{label}: {} -> {}", link.kind.as_str(), link_label(graph, link)),
		Value::Array(items) => {
			println!("{pad}{label}: [{}]", items.len());
			for (idx, item) in items.iter().enumerate() {
				print_value(graph, &format!("[{idx}]"), item, indent + 2);
			}
		}
		Value::Group(fields) => {
			println!("{pad}{label}:");
			for field in fields {
				print_value(graph, &field.name, &field.value, indent + 2);
			}
		}
	}
}
