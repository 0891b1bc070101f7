use std::collections::HashMap;

use tracing::debug;

use crate::doc::{BitSet, DocError, Result};

/// Dense identifier of a block type inside one [`TypeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
	/// Zero-based position in the registry.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Declared block type with its direct parent type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
	/// Type name.
	pub name: Box<str>,
	/// Direct parents, in declaration order.
	pub parents: Vec<Box<str>>,
}

impl TypeDecl {
	/// Declare `name` extending `parents`.
	pub fn new(name: &str, parents: &[&str]) -> Self {
		Self {
			name: name.into(),
			parents: parents.iter().map(|item| Box::<str>::from(*item)).collect(),
		}
	}
}

/// Closed set of block types with precomputed ancestry.
///
/// Every type's ancestor set includes the type itself, so `is_a` is reflexive.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRegistry {
	names: Vec<Box<str>>,
	parents: Vec<Vec<TypeId>>,
	ancestors: Vec<BitSet>,
	by_name: HashMap<Box<str>, TypeId>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
	Fresh,
	Active,
	Done,
}

impl TypeRegistry {
	/// Build a registry from declarations given in any order.
	pub fn build(decls: Vec<TypeDecl>) -> Result<Self> {
		if decls.len() > u32::MAX as usize {
			return Err(DocError::TooManyTypes { count: decls.len() });
		}

		let mut by_name = HashMap::with_capacity(decls.len());
		for (idx, decl) in decls.iter().enumerate() {
			if by_name.insert(decl.name.clone(), TypeId(idx as u32)).is_some() {
				return Err(DocError::DuplicateType { name: decl.name.to_string() });
			}
		}

		let mut parents = Vec::with_capacity(decls.len());
		for decl in &decls {
			let mut ids = Vec::with_capacity(decl.parents.len());
			for parent in &decl.parents {
				let id = by_name.get(parent).copied().ok_or_else(|| DocError::UnknownType { name: parent.to_string() })?;
				ids.push(id);
			}
			parents.push(ids);
		}

		let names: Vec<Box<str>> = decls.into_iter().map(|decl| decl.name).collect();
		let count = names.len();
		let mut ancestors = vec![BitSet::new(count); count];
		let mut marks = vec![Mark::Fresh; count];
		for idx in 0..count {
			resolve_ancestors(idx, &parents, &names, &mut marks, &mut ancestors)?;
		}

		debug!(types = count, "type registry built");
		Ok(Self {
			names,
			parents,
			ancestors,
			by_name,
		})
	}

	/// Number of declared types.
	pub fn len(&self) -> usize {
		self.names.len()
	}

	/// Whether no type is declared.
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	/// Look up a type by exact name.
	pub fn id(&self, name: &str) -> Option<TypeId> {
		self.by_name.get(name).copied()
	}

	/// Look up a type by name, failing on unknown names.
	pub fn require(&self, name: &str) -> Result<TypeId> {
		self.id(name).ok_or_else(|| DocError::UnknownType { name: name.to_owned() })
	}

	/// Type name for `id`.
	pub fn name(&self, id: TypeId) -> &str {
		self.names.get(id.index()).map(|item| item.as_ref()).unwrap_or("<unknown>")
	}

	/// Direct parents of `id`.
	pub fn parents(&self, id: TypeId) -> &[TypeId] {
		self.parents.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Whether `ty` is `ancestor` or derives from it.
	pub fn is_a(&self, ty: TypeId, ancestor: TypeId) -> bool {
		self.ancestors.get(ty.index()).is_some_and(|set| set.contains(ancestor.index()))
	}

	/// Whether `ty` is or derives from any member of `set`.
	pub fn is_any(&self, ty: TypeId, set: &BitSet) -> bool {
		self.ancestors.get(ty.index()).is_some_and(|ancestors| ancestors.intersects(set))
	}

	/// Collect the known names among `names` into a type set; unknown names are skipped.
	pub fn set_of<S: AsRef<str>>(&self, names: &[S]) -> BitSet {
		let mut set = BitSet::new(self.len());
		for name in names {
			match self.id(name.as_ref()) {
				Some(id) => {
					set.insert(id.index());
				}
				None => debug!(name = name.as_ref(), "category type not declared in document"),
			}
		}
		set
	}

	/// Iterate all type ids in declaration order.
	pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
		(0..self.names.len()).map(|idx| TypeId(idx as u32))
	}

	/// Rebuild the declarations this registry was built from.
	pub fn decls(&self) -> Vec<TypeDecl> {
		self.ids()
			.map(|id| TypeDecl {
				name: self.names[id.index()].clone(),
				parents: self.parents(id).iter().map(|parent| self.names[parent.index()].clone()).collect(),
			})
			.collect()
	}
}

fn resolve_ancestors(idx: usize, parents: &[Vec<TypeId>], names: &[Box<str>], marks: &mut [Mark], ancestors: &mut [BitSet]) -> Result<()> {
	match marks[idx] {
		Mark::Done => return Ok(()),
		Mark::Active => return Err(DocError::InheritanceCycle { name: names[idx].to_string() }),
		Mark::Fresh => {}
	}

	marks[idx] = Mark::Active;
	let mut set = BitSet::new(names.len());
	set.insert(idx);
	for parent in &parents[idx] {
		resolve_ancestors(parent.index(), parents, names, marks, ancestors)?;
		set.union_with(&ancestors[parent.index()]);
	}
	ancestors[idx] = set;
	marks[idx] = Mark::Done;
	Ok(())
}

/// Type names that drive ordering and classification decisions.
#[derive(Debug, Clone)]
pub struct Categories {
	/// Renderable geometry roots, grouped by child-order classification.
	pub geometry: Vec<Box<str>>,
	/// Attachment/reference-object roots serialized before their owner.
	pub attachment: Vec<Box<str>>,
	/// Physics-constraint roots whose entities precede them.
	pub constraint: Vec<Box<str>>,
	/// Pointer list naming the bodies a constraint binds.
	pub entities_field: Box<str>,
}

impl Default for Categories {
	fn default() -> Self {
		Self {
			geometry: vec!["NiTriBasedGeom".into(), "BSTriShape".into()],
			attachment: vec!["bhkRefObject".into()],
			constraint: vec!["bhkConstraint".into()],
			entities_field: "Entities".into(),
		}
	}
}

impl Categories {
	/// Precompute per-type category membership against one registry.
	pub fn resolve(&self, types: &TypeRegistry) -> CategoryMasks {
		let geometry_roots = types.set_of(&self.geometry);
		let attachment_roots = types.set_of(&self.attachment);
		let constraint_roots = types.set_of(&self.constraint);

		let mut masks = CategoryMasks {
			geometry: BitSet::new(types.len()),
			attachment: BitSet::new(types.len()),
			constraint: BitSet::new(types.len()),
			entities_field: self.entities_field.clone(),
		};
		for id in types.ids() {
			if types.is_any(id, &geometry_roots) {
				masks.geometry.insert(id.index());
			}
			if types.is_any(id, &attachment_roots) {
				masks.attachment.insert(id.index());
			}
			if types.is_any(id, &constraint_roots) {
				masks.constraint.insert(id.index());
			}
		}
		masks
	}
}

/// Category membership resolved per type id.
#[derive(Debug, Clone)]
pub struct CategoryMasks {
	geometry: BitSet,
	attachment: BitSet,
	constraint: BitSet,
	entities_field: Box<str>,
}

impl CategoryMasks {
	/// Whether `ty` is renderable geometry.
	pub fn is_geometry(&self, ty: TypeId) -> bool {
		self.geometry.contains(ty.index())
	}

	/// Whether `ty` is a physics constraint.
	pub fn is_constraint(&self, ty: TypeId) -> bool {
		self.constraint.contains(ty.index())
	}

	/// Whether a child of type `ty` is serialized before its owner.
	pub fn precedes_parent(&self, ty: TypeId) -> bool {
		self.attachment.contains(ty.index()) && !self.constraint.contains(ty.index())
	}

	/// Field holding a constraint's entity pointers.
	pub fn entities_field(&self) -> &str {
		&self.entities_field
	}
}
