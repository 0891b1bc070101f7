use crate::doc::test_support::{children, scene_types};
use crate::doc::{Categories, ChildOrder, DocVersion, Field, GraphBuilder, Value, classify_child_order, classify_children};

#[test]
fn stable_partition_keeps_bucket_order() {
	let items = ["g1", "a1", "g2", "a2"];
	let is_geometry = |item: &&str| item.starts_with('g');

	assert_eq!(classify_children(&items, is_geometry, ChildOrder::GeometryLast), vec!["a1", "a2", "g1", "g2"]);
	assert_eq!(classify_children(&items, is_geometry, ChildOrder::GeometryFirst), vec!["g1", "g2", "a1", "a2"]);
}

#[test]
fn order_follows_feature_level_threshold() {
	let legacy = DocVersion {
		number: 0x1400_0007,
		user_version: 11,
		feature_level: 34,
	};
	let current = DocVersion {
		feature_level: 83,
		..legacy
	};
	assert_eq!(ChildOrder::for_version(&legacy), ChildOrder::GeometryFirst);
	assert_eq!(ChildOrder::for_version(&current), ChildOrder::GeometryLast);

	assert!(ChildOrder::applies_to(&legacy));
	assert!(!ChildOrder::applies_to(&DocVersion { feature_level: 0, ..legacy }));
	assert!(!ChildOrder::applies_to(&DocVersion {
		number: 0x0A00_0100,
		..legacy
	}));
}

#[test]
fn parses_cli_labels() {
	assert_eq!("first".parse::<ChildOrder>().expect("valid"), ChildOrder::GeometryFirst);
	assert_eq!("geometry_last".parse::<ChildOrder>().expect("valid"), ChildOrder::GeometryLast);
	assert!("middle".parse::<ChildOrder>().is_err());
}

fn mixed_children_graph() -> crate::doc::Graph {
	let mut builder = GraphBuilder::new(scene_types());
	let fields = children(&builder, &[1, 2, 3, -1, 4]);
	builder.block("NiNode", fields.into()).expect("root");
	builder.block("NiTriShape", vec![Field::new("Name", Value::String("g1".into()))]).expect("g1");
	builder.block("NiNode", vec![Field::new("Name", Value::String("a1".into()))]).expect("a1");
	builder.block("BSTriShape", vec![Field::new("Name", Value::String("g2".into()))]).expect("g2");
	builder.block("NiNode", vec![Field::new("Name", Value::String("a2".into()))]).expect("a2");
	builder.build()
}

fn child_targets(graph: &crate::doc::Graph) -> Vec<i32> {
	let block = graph.block(0).expect("root block");
	block
		.field("Children")
		.and_then(|field| field.value.as_array())
		.expect("children array")
		.iter()
		.map(|item| item.as_link().expect("link entry").target)
		.collect()
}

#[test]
fn geometry_last_moves_shapes_to_the_end_keeping_sentinels() {
	let mut graph = mixed_children_graph();
	let masks = Categories::default().resolve(&graph.types);

	let changed = classify_child_order(&mut graph, 0, ChildOrder::GeometryLast, &masks).expect("block exists");
	assert!(changed);
	assert_eq!(child_targets(&graph), vec![2, -1, 4, 1, 3]);
	assert_eq!(graph.block(0).and_then(|block| block.field("Num Children")).map(|field| &field.value), Some(&Value::Int(5)));
}

#[test]
fn geometry_first_is_stable_and_idempotent() {
	let mut graph = mixed_children_graph();
	let masks = Categories::default().resolve(&graph.types);

	assert!(classify_child_order(&mut graph, 0, ChildOrder::GeometryFirst, &masks).expect("block exists"));
	assert_eq!(child_targets(&graph), vec![1, 3, 2, -1, 4]);
	assert!(!classify_child_order(&mut graph, 0, ChildOrder::GeometryFirst, &masks).expect("block exists"));
}

#[test]
fn blocks_without_children_are_untouched_and_bad_index_errors() {
	let mut graph = mixed_children_graph();
	let masks = Categories::default().resolve(&graph.types);
	let before = graph.clone();

	assert!(!classify_child_order(&mut graph, 1, ChildOrder::GeometryLast, &masks).expect("block exists"));
	assert_eq!(graph, before);
	assert!(classify_child_order(&mut graph, 99, ChildOrder::GeometryLast, &masks).is_err());
}
