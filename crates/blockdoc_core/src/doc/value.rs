use crate::doc::TypeId;

/// Stored value of a link that references no block.
pub const NO_LINK: i32 = -1;

/// Edge semantics of a link field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
	/// Ownership edge; drives serialization order and root detection.
	Child,
	/// Weak reference; only checked and used for type-specific precedence.
	Pointer,
}

impl LinkKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Child => "child",
			Self::Pointer => "pointer",
		}
	}
}

/// Block reference stored in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
	/// Edge semantics.
	pub kind: LinkKind,
	/// Minimal type the target must satisfy.
	pub expected: Option<TypeId>,
	/// Target block index, negative for "no reference".
	pub target: i32,
}

impl Link {
	/// Ownership link to `target`.
	pub fn child(target: i32, expected: Option<TypeId>) -> Self {
		Self {
			kind: LinkKind::Child,
			expected,
			target,
		}
	}

	/// Weak link to `target`.
	pub fn pointer(target: i32, expected: Option<TypeId>) -> Self {
		Self {
			kind: LinkKind::Pointer,
			expected,
			target,
		}
	}

	/// Whether this link references no block.
	pub fn is_none(&self) -> bool {
		self.target < 0
	}

	/// Target as an arena index, `None` for "no reference".
	pub fn index(&self) -> Option<usize> {
		usize::try_from(self.target).ok()
	}

	/// Whether this is an ownership link.
	pub fn is_child(&self) -> bool {
		self.kind == LinkKind::Child
	}
}

/// Field payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Boolean scalar.
	Bool(bool),
	/// Integer scalar, also used for element counts.
	Int(i64),
	/// Floating point scalar.
	Float(f64),
	/// Text scalar.
	String(Box<str>),
	/// Block reference.
	Link(Link),
	/// Fixed or variable length sequence.
	Array(Vec<Value>),
	/// Nested named fields.
	Group(Vec<Field>),
}

impl Value {
	/// Borrow as a link.
	pub fn as_link(&self) -> Option<&Link> {
		match self {
			Self::Link(link) => Some(link),
			_ => None,
		}
	}

	/// Borrow as an array.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Read an integer scalar.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(value) => Some(*value),
			_ => None,
		}
	}

	/// Stable lowercase kind label.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::Link(_) => "link",
			Self::Array(_) => "array",
			Self::Group(_) => "group",
		}
	}

	/// Visit every link below this value in declaration and element order.
	pub fn for_each_link(&self, f: &mut impl FnMut(&Link)) {
		match self {
			Self::Link(link) => f(link),
			Self::Array(items) => items.iter().for_each(|item| item.for_each_link(f)),
			Self::Group(fields) => fields.iter().for_each(|field| field.value.for_each_link(f)),
			_ => {}
		}
	}

	/// Mutably visit every link below this value.
	pub fn for_each_link_mut(&mut self, f: &mut impl FnMut(&mut Link)) {
		match self {
			Self::Link(link) => f(link),
			Self::Array(items) => items.iter_mut().for_each(|item| item.for_each_link_mut(f)),
			Self::Group(fields) => fields.iter_mut().for_each(|field| field.value.for_each_link_mut(f)),
			_ => {}
		}
	}
}

/// Named field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	/// Field identifier.
	pub name: Box<str>,
	/// Field payload.
	pub value: Value,
}

impl Field {
	/// Build a field from a name and value.
	pub fn new(name: &str, value: Value) -> Self {
		Self { name: name.into(), value }
	}
}
