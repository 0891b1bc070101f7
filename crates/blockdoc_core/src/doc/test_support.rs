use std::sync::Arc;

use crate::doc::{Field, GraphBuilder, Link, TypeDecl, TypeRegistry, Value};

/// Scene-graph and Havok type tree shared by unit tests.
pub(crate) fn scene_types() -> Arc<TypeRegistry> {
	let decls = vec![
		TypeDecl::new("NiObject", &[]),
		TypeDecl::new("NiObjectNET", &["NiObject"]),
		TypeDecl::new("NiAVObject", &["NiObjectNET"]),
		TypeDecl::new("NiNode", &["NiAVObject"]),
		TypeDecl::new("NiGeometry", &["NiAVObject"]),
		TypeDecl::new("NiTriBasedGeom", &["NiGeometry"]),
		TypeDecl::new("NiTriShape", &["NiTriBasedGeom"]),
		TypeDecl::new("NiTriStrips", &["NiTriBasedGeom"]),
		TypeDecl::new("BSTriShape", &["NiAVObject"]),
		TypeDecl::new("NiProperty", &["NiObjectNET"]),
		TypeDecl::new("NiAlphaProperty", &["NiProperty"]),
		TypeDecl::new("NiExtraData", &["NiObject"]),
		TypeDecl::new("NiCollisionObject", &["NiObject"]),
		TypeDecl::new("bhkNiCollisionObject", &["NiCollisionObject"]),
		TypeDecl::new("bhkCollisionObject", &["bhkNiCollisionObject"]),
		TypeDecl::new("bhkRefObject", &["NiObject"]),
		TypeDecl::new("bhkSerializable", &["bhkRefObject"]),
		TypeDecl::new("bhkWorldObject", &["bhkSerializable"]),
		TypeDecl::new("bhkEntity", &["bhkWorldObject"]),
		TypeDecl::new("bhkRigidBody", &["bhkEntity"]),
		TypeDecl::new("bhkShape", &["bhkSerializable"]),
		TypeDecl::new("bhkBoxShape", &["bhkShape"]),
		TypeDecl::new("bhkConstraint", &["bhkSerializable"]),
		TypeDecl::new("bhkRagdollConstraint", &["bhkConstraint"]),
		TypeDecl::new("BSSkin::Instance", &["NiObject"]),
	];
	Arc::new(TypeRegistry::build(decls).expect("scene types build"))
}

/// `Num Children` / `Children` fields holding `targets`.
pub(crate) fn children(builder: &GraphBuilder, targets: &[i32]) -> [Field; 2] {
	let links = targets
		.iter()
		.map(|target| builder.child(*target, Some("NiAVObject")).expect("NiAVObject declared"))
		.collect();
	GraphBuilder::counted_links("Num Children", "Children", links)
}

/// Single ownership link field.
pub(crate) fn child_field(builder: &GraphBuilder, name: &str, target: i32, expected: &str) -> Field {
	let link = builder.child(target, Some(expected)).expect("expected type declared");
	Field::new(name, Value::Link(link))
}

/// `Num Entities` / `Entities` pointer list of a constraint.
pub(crate) fn entities(builder: &GraphBuilder, targets: &[i32]) -> [Field; 2] {
	let links: Vec<Link> = targets
		.iter()
		.map(|target| builder.pointer(*target, Some("bhkEntity")).expect("bhkEntity declared"))
		.collect();
	GraphBuilder::counted_links("Num Entities", "Entities", links)
}
