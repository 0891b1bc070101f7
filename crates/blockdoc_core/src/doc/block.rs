use crate::doc::{Field, FieldPath, Link, PathStep, TypeId, Value};

/// One typed block of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
	/// Block type.
	pub type_id: TypeId,
	/// Fields in declaration order.
	pub fields: Vec<Field>,
}

impl Block {
	/// Build a block from a type and its fields.
	pub fn new(type_id: TypeId, fields: Vec<Field>) -> Self {
		Self { type_id, fields }
	}

	/// Top-level field by exact name.
	pub fn field(&self, name: &str) -> Option<&Field> {
		self.fields.iter().find(|field| field.name.as_ref() == name)
	}

	/// First field named `name`, searching nested groups depth-first.
	pub fn find(&self, name: &str) -> Option<&Value> {
		find_in(&self.fields, name)
	}

	/// Resolve a parsed field path.
	pub fn value_at(&self, path: &FieldPath) -> Option<&Value> {
		let mut steps = path.steps.iter();
		let Some(PathStep::Field(first)) = steps.next() else {
			return None;
		};
		let mut current = &self.field(first)?.value;
		for step in steps {
			current = match (step, current) {
				(PathStep::Field(name), Value::Group(fields)) => &fields.iter().find(|field| field.name.as_ref() == name)?.value,
				(PathStep::Index(index), Value::Array(items)) => items.get(*index)?,
				_ => return None,
			};
		}
		Some(current)
	}

	/// Visit every link of the block in field declaration order.
	pub fn for_each_link(&self, mut f: impl FnMut(&Link)) {
		for field in &self.fields {
			field.value.for_each_link(&mut f);
		}
	}

	/// Mutably visit every link of the block.
	pub fn for_each_link_mut(&mut self, mut f: impl FnMut(&mut Link)) {
		for field in &mut self.fields {
			field.value.for_each_link_mut(&mut f);
		}
	}

	/// Targets of all ownership links, skipping "no reference" entries.
	pub fn child_targets(&self) -> Vec<usize> {
		let mut out = Vec::new();
		self.for_each_link(|link| {
			if let (true, Some(target)) = (link.is_child(), link.index()) {
				out.push(target);
			}
		});
		out
	}

	/// Targets of the links held by the first field named `name`.
	pub fn link_targets(&self, name: &str) -> Vec<usize> {
		let mut out = Vec::new();
		if let Some(value) = self.find(name) {
			value.for_each_link(&mut |link: &Link| out.extend(link.index()));
		}
		out
	}
}

fn find_in<'a>(fields: &'a [Field], name: &str) -> Option<&'a Value> {
	for field in fields {
		if field.name.as_ref() == name {
			return Some(&field.value);
		}
		if let Value::Group(inner) = &field.value {
			if let Some(found) = find_in(inner, name) {
				return Some(found);
			}
		}
	}
	None
}
