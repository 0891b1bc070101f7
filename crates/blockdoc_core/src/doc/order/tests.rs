use crate::doc::test_support::{child_field, children, entities, scene_types};
use crate::doc::{
	BlockOrder, Categories, DocError, Field, Graph, GraphBuilder, Link, Value, compute_serialization_order, sanitize_block_order,
};

/// Two-body ragdoll scene stored in a deliberately scrambled order.
fn ragdoll_scene() -> Graph {
	let mut b = GraphBuilder::new(scene_types());

	let constraint = entities(&b, &[3, 4]);
	b.block("bhkRagdollConstraint", constraint.into()).expect("0");

	let mut root = children(&b, &[5, 6]).to_vec();
	root.push(child_field(&b, "Collision Object", 2, "NiCollisionObject"));
	b.block("NiNode", root).expect("1");

	let body = child_field(&b, "Body", 3, "bhkWorldObject");
	b.block("bhkCollisionObject", vec![body]).expect("2");

	let mut body_a = vec![child_field(&b, "Shape", 7, "bhkShape")];
	body_a.extend(GraphBuilder::counted_links(
		"Num Constraints",
		"Constraints",
		vec![b.child(0, Some("bhkSerializable")).expect("declared")],
	));
	b.block("bhkRigidBody", body_a).expect("3");

	let body_b = vec![child_field(&b, "Shape", 8, "bhkShape")];
	b.block("bhkRigidBody", body_b).expect("4");

	b.block("NiTriShape", Vec::new()).expect("5");

	let node = vec![child_field(&b, "Collision Object", 9, "NiCollisionObject")];
	b.block("NiNode", node).expect("6");

	b.block("bhkBoxShape", Vec::new()).expect("7");
	b.block("bhkBoxShape", Vec::new()).expect("8");

	let body = child_field(&b, "Body", 4, "bhkWorldObject");
	b.block("bhkCollisionObject", vec![body]).expect("9");

	b.build()
}

fn position(order: &BlockOrder, old: usize) -> u32 {
	order.new_index(old).expect("block ordered")
}

#[test]
fn roots_are_derived_from_child_links() {
	assert_eq!(ragdoll_scene().roots, vec![1]);
}

#[test]
fn ragdoll_scene_orders_attachments_before_owners() {
	let graph = ragdoll_scene();
	let masks = Categories::default().resolve(&graph.types);
	let order = compute_serialization_order(&graph, &masks).expect("scene is fully reachable");

	assert_eq!(order.new_to_old(), &[1, 5, 6, 8, 4, 9, 7, 3, 0, 2]);

	// rigid bodies before their collision objects, shapes before bodies
	assert!(position(&order, 3) < position(&order, 2));
	assert!(position(&order, 4) < position(&order, 9));
	assert!(position(&order, 7) < position(&order, 3));
	// scene children after their node
	assert!(position(&order, 1) < position(&order, 5));
	assert!(position(&order, 1) < position(&order, 6));
	// constraint after both entities
	assert!(position(&order, 3) < position(&order, 0));
	assert!(position(&order, 4) < position(&order, 0));
}

#[test]
fn constraint_pulls_entities_owned_elsewhere_forward() {
	let mut b = GraphBuilder::new(scene_types());
	let root = children(&b, &[1, 2]);
	b.block("NiNode", root.into()).expect("0");
	let a = vec![child_field(&b, "Collision Object", 3, "NiCollisionObject")];
	b.block("NiNode", a).expect("1");
	let node_b = vec![child_field(&b, "Collision Object", 7, "NiCollisionObject")];
	b.block("NiNode", node_b).expect("2");
	let body = child_field(&b, "Body", 4, "bhkWorldObject");
	b.block("bhkCollisionObject", vec![body]).expect("3");
	let constraints = GraphBuilder::counted_links("Num Constraints", "Constraints", vec![b.child(5, None).expect("untyped")]);
	b.block("bhkRigidBody", constraints.into()).expect("4");
	let ents = entities(&b, &[4, 6]);
	b.block("bhkRagdollConstraint", ents.into()).expect("5");
	b.block("bhkRigidBody", Vec::new()).expect("6");
	let body = child_field(&b, "Body", 6, "bhkWorldObject");
	b.block("bhkCollisionObject", vec![body]).expect("7");
	let graph = b.build();

	let masks = Categories::default().resolve(&graph.types);
	let order = compute_serialization_order(&graph, &masks).expect("reachable");

	assert_eq!(order.new_to_old(), &[0, 1, 4, 6, 5, 3, 2, 7]);
	assert!(position(&order, 6) < position(&order, 5), "entity 6 precedes its constraint");
	assert!(position(&order, 6) < position(&order, 7), "attachment still precedes its owner");
}

#[test]
fn constraint_owned_below_its_own_entity_is_rejected() {
	let mut b = GraphBuilder::new(scene_types());
	let body = child_field(&b, "Body", 1, "bhkWorldObject");
	b.block("NiNode", vec![body]).expect("0");
	let shape = child_field(&b, "Shape", 2, "bhkShape");
	b.block("bhkRigidBody", vec![shape]).expect("1");
	let constraints = GraphBuilder::counted_links("Num Constraints", "Constraints", vec![b.child(3, Some("bhkSerializable")).expect("declared")]);
	b.block("bhkBoxShape", constraints.into()).expect("2");
	let ents = entities(&b, &[1]);
	b.block("bhkRagdollConstraint", ents.into()).expect("3");
	let graph = b.build();
	assert_eq!(graph.roots, vec![0]);

	// body 1 is still open when its shape reaches constraint 3
	let masks = Categories::default().resolve(&graph.types);
	let err = compute_serialization_order(&graph, &masks).expect_err("entity cannot precede its constraint");
	assert!(err.to_string().contains("corrupt block tree"), "{err}");
	match err {
		DocError::ReentrantConstraint { constraint, entity } => assert_eq!((constraint, entity), (3, 1)),
		other => panic!("unexpected error {other}"),
	}
	assert!(sanitize_block_order(&graph, &masks).is_err());
}

#[test]
fn sanitize_remaps_links_and_roots() {
	let mut graph = ragdoll_scene();
	let dangling = Field::new("Skin", Value::Link(Link::pointer(99, None)));
	graph.blocks[5].fields.push(dangling);
	let masks = Categories::default().resolve(&graph.types);

	let sorted = sanitize_block_order(&graph, &masks).expect("sanitize succeeds");

	// old [1, 5, 6, 8, 4, 9, 7, 3, 0, 2]
	assert_eq!(sorted.roots, vec![0]);
	assert_eq!(sorted.type_name_of(9), "bhkCollisionObject");
	let body = sorted.blocks[9].field("Body").and_then(|field| field.value.as_link()).expect("body link");
	assert_eq!(body.target, 7);
	assert_eq!(sorted.type_name_of(7), "bhkRigidBody");

	let constraint = &sorted.blocks[8];
	assert_eq!(constraint.link_targets("Entities"), vec![7, 4]);

	let skin = sorted.blocks[1].field("Skin").and_then(|field| field.value.as_link()).expect("skin link");
	assert_eq!(skin.target, 99, "dangling link is left for the checker");
}

#[test]
fn reordering_then_inverting_restores_the_graph() {
	let graph = ragdoll_scene();
	let masks = Categories::default().resolve(&graph.types);
	let order = compute_serialization_order(&graph, &masks).expect("reachable");

	let sorted = graph.reordered(&order).expect("same length");
	assert_ne!(sorted, graph);
	let restored = sorted.reordered(&order.inverse()).expect("same length");
	assert_eq!(restored, graph);
}

#[test]
fn sorted_graph_is_a_fixed_point() {
	let graph = ragdoll_scene();
	let masks = Categories::default().resolve(&graph.types);
	let sorted = sanitize_block_order(&graph, &masks).expect("sanitize succeeds");

	let again = compute_serialization_order(&sorted, &masks).expect("reachable");
	assert!(again.is_identity());
}

#[test]
fn orphan_block_fails_without_touching_the_graph() {
	let mut b = GraphBuilder::new(scene_types()).roots(vec![0]);
	let root = children(&b, &[1]);
	b.block("NiNode", root.into()).expect("0");
	b.block("NiTriShape", Vec::new()).expect("1");
	b.block("NiNode", Vec::new()).expect("2");
	let mut graph = b.build();
	let before = graph.clone();
	let masks = Categories::default().resolve(&graph.types);

	let err = sanitize_block_order(&graph, &masks).expect_err("block 2 is unreachable");
	match err {
		DocError::CorruptGraph {
			expected,
			ordered,
			unreachable,
		} => {
			assert_eq!((expected, ordered), (3, 2));
			assert_eq!(unreachable, vec![2]);
		}
		other => panic!("unexpected error {other}"),
	}
	assert_eq!(graph, before);

	let order = BlockOrder::identity(3);
	graph.apply_order(&order).expect("identity applies");
	assert_eq!(graph, before);
}

#[test]
fn detached_cycle_is_reported_as_corrupt() {
	let mut b = GraphBuilder::new(scene_types());
	b.block("NiNode", Vec::new()).expect("0");
	let one = children(&b, &[2]);
	b.block("NiNode", one.into()).expect("1");
	let two = children(&b, &[1]);
	b.block("NiNode", two.into()).expect("2");
	let graph = b.build();
	assert_eq!(graph.roots, vec![0]);

	let masks = Categories::default().resolve(&graph.types);
	let err = compute_serialization_order(&graph, &masks).expect_err("cycle is detached");
	assert!(matches!(err, DocError::CorruptGraph { ordered: 1, .. }));
}

#[test]
fn cycle_back_to_root_terminates() {
	let mut b = GraphBuilder::new(scene_types()).roots(vec![0]);
	let zero = children(&b, &[1, 0]);
	b.block("NiNode", zero.into()).expect("0");
	let one = children(&b, &[0]);
	b.block("NiNode", one.into()).expect("1");
	let graph = b.build();

	let masks = Categories::default().resolve(&graph.types);
	let order = compute_serialization_order(&graph, &masks).expect("both reachable");
	assert_eq!(order.new_to_old(), &[0, 1]);
}

#[test]
fn deep_chain_does_not_exhaust_the_call_stack() {
	const DEPTH: usize = 200_000;
	let mut b = GraphBuilder::new(scene_types()).roots(vec![0]);
	for idx in 0..DEPTH {
		let next = if idx + 1 < DEPTH { vec![idx as i32 + 1] } else { Vec::new() };
		let fields = children(&b, &next);
		b.block("NiNode", fields.into()).expect("node");
	}
	let graph = b.build();

	let masks = Categories::default().resolve(&graph.types);
	let order = compute_serialization_order(&graph, &masks).expect("chain reachable");
	assert!(order.is_identity());
}

#[test]
fn block_order_rejects_non_permutations() {
	assert!(matches!(BlockOrder::from_new_to_old(vec![0, 0, 1]), Err(DocError::NotAPermutation { index: 0 })));
	assert!(matches!(BlockOrder::from_new_to_old(vec![0, 3]), Err(DocError::NotAPermutation { index: 3 })));

	let order = BlockOrder::from_new_to_old(vec![2, 0, 1]).expect("permutation");
	assert_eq!(order.old_to_new(), &[1, 2, 0]);
	assert_eq!(order.inverse().new_to_old(), &[1, 2, 0]);

	let graph = ragdoll_scene();
	assert!(matches!(graph.reordered(&order), Err(DocError::OrderLengthMismatch { expected: 10, got: 3 })));
}
