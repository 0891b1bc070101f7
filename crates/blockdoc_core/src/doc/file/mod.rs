use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::doc::compression::{decode_bytes, encode_bytes};
use crate::doc::{Block, Compression, DocError, DocVersion, Field, Graph, Link, LinkKind, Result, TypeDecl, TypeId, TypeRegistry, Value};

/// Serialized document snapshot: version header, type tree, roots, and blocks.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentFile {
	/// Version header.
	pub version: FileVersion,
	/// Type declarations, in any order.
	pub types: Vec<FileType>,
	/// Root block indices; derived from child links when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub roots: Option<Vec<u32>>,
	/// Blocks in serialization order.
	pub blocks: Vec<FileBlock>,
	/// Compression the snapshot was read with.
	#[serde(skip)]
	pub compression: Compression,
}

/// Version header with the format version in dotted form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileVersion {
	/// Dotted format version, e.g. `20.0.0.5`.
	pub number: String,
	/// Producer-specific user version.
	#[serde(default)]
	pub user_version: u32,
	/// Producer feature level.
	#[serde(default)]
	pub feature_level: u32,
}

/// Type declaration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileType {
	/// Type name.
	pub name: String,
	/// Direct parent type names.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub parents: Vec<String>,
}

/// Serialized block.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FileBlock {
	/// Block type name.
	#[serde(rename = "type")]
	pub type_name: String,
	/// Fields in declaration order.
	#[serde(default)]
	pub fields: Vec<FileField>,
}

/// Serialized field.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FileField {
	/// Field name.
	pub name: String,
	/// Field payload.
	pub value: FileValue,
}

/// Serialized field payload, tagged by value kind.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileValue {
	/// Boolean scalar.
	Bool(bool),
	/// Integer scalar.
	Int(i64),
	/// Floating point scalar.
	Float(f64),
	/// Text scalar.
	String(String),
	/// Block reference.
	Link(FileLink),
	/// Homogeneous array.
	Array(Vec<FileValue>),
	/// Nested field group.
	Group(Vec<FileField>),
}

/// Serialized link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileLink {
	/// Edge semantics.
	pub kind: FileLinkKind,
	/// Minimal target type name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expected: Option<String>,
	/// Target block index, negative for "no reference".
	pub target: i32,
}

/// Serialized link kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileLinkKind {
	/// Ownership edge.
	Child,
	/// Weak reference.
	Pointer,
}

impl DocumentFile {
	/// Read a snapshot, detecting zstd compression.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let raw = fs::read(path)?;
		Self::parse(raw)
	}

	/// Parse snapshot bytes, detecting zstd compression.
	pub fn parse(raw: Vec<u8>) -> Result<Self> {
		let (compression, bytes) = decode_bytes(raw)?;
		let mut file: Self = serde_json::from_slice(&bytes)?;
		file.compression = compression;
		Ok(file)
	}

	/// Write the snapshot as pretty JSON, zstd-compressed when `path` ends in `.zst`.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let mode = if path.extension().is_some_and(|ext| ext == "zst") {
			Compression::Zstd
		} else {
			Compression::None
		};
		fs::write(path, self.to_bytes(mode)?)?;
		debug!(path = %path.display(), compression = mode.as_str(), blocks = self.blocks.len(), "snapshot saved");
		Ok(())
	}

	/// Encode the snapshot as pretty JSON with `mode` compression.
	pub fn to_bytes(&self, mode: Compression) -> Result<Vec<u8>> {
		let mut json = serde_json::to_vec_pretty(self)?;
		json.push(b'\n');
		encode_bytes(json, mode)
	}

	/// Resolve type names and build the in-memory graph.
	pub fn into_graph(self) -> Result<Graph> {
		let number = DocVersion::parse_dotted(&self.version.number).ok_or_else(|| DocError::InvalidVersion {
			value: self.version.number.clone(),
		})?;
		let version = DocVersion {
			number,
			user_version: self.version.user_version,
			feature_level: self.version.feature_level,
		};

		let decls = self
			.types
			.iter()
			.map(|ty| {
				let parents: Vec<&str> = ty.parents.iter().map(String::as_str).collect();
				TypeDecl::new(&ty.name, &parents)
			})
			.collect();
		let types = Arc::new(TypeRegistry::build(decls)?);

		let mut graph = Graph::new(types.clone(), version);
		for block in self.blocks {
			let type_id = types.require(&block.type_name)?;
			let fields = fields_from_file(&types, block.fields)?;
			graph.push_block(Block::new(type_id, fields));
		}
		graph.roots = match self.roots {
			Some(roots) => roots,
			None => graph.derive_roots(),
		};
		debug!(blocks = graph.len(), roots = graph.roots.len(), "snapshot loaded");
		Ok(graph)
	}

	/// Snapshot of `graph`, including its type tree and root list.
	pub fn from_graph(graph: &Graph) -> Self {
		let types = graph
			.types
			.decls()
			.into_iter()
			.map(|decl| FileType {
				name: decl.name.into(),
				parents: decl.parents.into_iter().map(String::from).collect(),
			})
			.collect();
		let blocks = graph
			.blocks
			.iter()
			.map(|block| FileBlock {
				type_name: graph.types.name(block.type_id).to_owned(),
				fields: fields_to_file(&graph.types, &block.fields),
			})
			.collect();

		Self {
			version: FileVersion {
				number: graph.version.dotted(),
				user_version: graph.version.user_version,
				feature_level: graph.version.feature_level,
			},
			types,
			roots: Some(graph.roots.clone()),
			blocks,
			compression: Compression::None,
		}
	}
}

fn fields_from_file(types: &TypeRegistry, fields: Vec<FileField>) -> Result<Vec<Field>> {
	fields
		.into_iter()
		.map(|field| Ok(Field::new(&field.name, value_from_file(types, field.value)?)))
		.collect()
}

fn value_from_file(types: &TypeRegistry, value: FileValue) -> Result<Value> {
	Ok(match value {
		FileValue::Bool(v) => Value::Bool(v),
		FileValue::Int(v) => Value::Int(v),
		FileValue::Float(v) => Value::Float(v),
		FileValue::String(v) => Value::String(v.into()),
		FileValue::Link(link) => {
			let expected: Option<TypeId> = link.expected.as_deref().map(|name| types.require(name)).transpose()?;
			Value::Link(match link.kind {
				FileLinkKind::Child => Link::child(link.target, expected),
				FileLinkKind::Pointer => Link::pointer(link.target, expected),
			})
		}
		FileValue::Array(items) => Value::Array(items.into_iter().map(|item| value_from_file(types, item)).collect::<Result<_>>()?),
		FileValue::Group(fields) => Value::Group(fields_from_file(types, fields)?),
	})
}

fn fields_to_file(types: &TypeRegistry, fields: &[Field]) -> Vec<FileField> {
	fields
		.iter()
		.map(|field| FileField {
			name: field.name.to_string(),
			value: value_to_file(types, &field.value),
		})
		.collect()
}

fn value_to_file(types: &TypeRegistry, value: &Value) -> FileValue {
	match value {
		Value::Bool(v) => FileValue::Bool(*v),
		Value::Int(v) => FileValue::Int(*v),
		Value::Float(v) => FileValue::Float(*v),
		Value::String(v) => FileValue::String(v.to_string()),
		Value::Link(link) => FileValue::Link(FileLink {
			kind: match link.kind {
				LinkKind::Child => FileLinkKind::Child,
				LinkKind::Pointer => FileLinkKind::Pointer,
			},
			expected: link.expected.map(|ty| types.name(ty).to_owned()),
			target: link.target,
		}),
		Value::Array(items) => FileValue::Array(items.iter().map(|item| value_to_file(types, item)).collect()),
		Value::Group(fields) => FileValue::Group(fields_to_file(types, fields)),
	}
}
